use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_keyword_round_trip() {
    for kind in PrimitiveKind::ALL {
        assert_eq!(PrimitiveKind::from_keyword(kind.keyword()), Some(kind));
        assert_eq!(PrimitiveKind::from_boxed_name(kind.boxed_name()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_keyword("String"), None);
}

#[test]
fn test_widening() {
    use PrimitiveKind::{Boolean, Byte, Char, Double, Float, Int, Long, Short};

    assert!(Int.widens_to(Long));
    assert!(Int.widens_to(Double));
    assert!(Byte.widens_to(Short));
    assert!(Char.widens_to(Int));
    assert!(Float.widens_to(Double));

    assert!(!Long.widens_to(Int));
    assert!(!Short.widens_to(Char));
    assert!(!Char.widens_to(Short));
    assert!(!Boolean.widens_to(Int));
    assert!(!Double.widens_to(Float));
}

#[test]
fn test_parse_types() {
    assert_eq!(TypeRef::parse("int"), Some(TypeRef::INT));
    assert_eq!(TypeRef::parse(" String "), Some(TypeRef::string()));
    assert_eq!(
        TypeRef::parse("com.acme.Entity"),
        Some(TypeRef::named("com.acme.Entity"))
    );
    assert_eq!(TypeRef::parse("com..Entity"), None);
    assert_eq!(TypeRef::parse("com.class.Entity"), None);
    assert_eq!(TypeRef::parse("1Entity"), None);
}

#[test]
fn test_renderable() {
    assert!(TypeRef::LONG.is_renderable());
    assert!(TypeRef::named("a.b.C").is_renderable());
    assert!(!TypeRef::named("").is_renderable());
    assert!(!TypeRef::named("return").is_renderable());
}

#[test]
fn test_display() {
    assert_eq!(TypeRef::BOOLEAN.to_string(), "boolean");
    assert_eq!(TypeRef::named("com.acme.Entity").to_string(), "com.acme.Entity");
}
