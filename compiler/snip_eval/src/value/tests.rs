use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_floating_display() {
    assert_eq!(Value::Double(1.0).to_string(), "1.0");
    assert_eq!(Value::Double(0.5).to_string(), "0.5");
    assert_eq!(Value::Double(100.0).to_string(), "100.0");
    assert_eq!(Value::Double(-0.0).to_string(), "-0.0");
    assert_eq!(Value::Double(0.001).to_string(), "0.001");
    assert_eq!(Value::Double(1e7).to_string(), "1.0E7");
    assert_eq!(Value::Double(1e10).to_string(), "1.0E10");
    assert_eq!(Value::Double(12_345_678.9).to_string(), "1.23456789E7");
    assert_eq!(Value::Double(1.5e-5).to_string(), "1.5E-5");
    assert_eq!(Value::Double(-2.5e-4).to_string(), "-2.5E-4");
    assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::Float(0.1).to_string(), "0.1");
    assert_eq!(Value::Float(1e10).to_string(), "1.0E10");
}

#[test]
fn test_display() {
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Char('x').to_string(), "x");
    assert_eq!(Value::Long(-3).to_string(), "-3");
    assert_eq!(Value::from("text").to_string(), "text");
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::Char('a').type_name(), "char");
    assert_eq!(Value::from("a").type_name(), "String");
}

#[test]
fn test_equals_is_kind_sensitive() {
    assert!(Value::Int(1).equals(&Value::Int(1)));
    assert!(!Value::Int(1).equals(&Value::Long(1)));
    assert!(Value::Double(f64::NAN).equals(&Value::Double(f64::NAN)));
    assert!(!Value::Double(0.0).equals(&Value::Double(-0.0)));
    assert!(Value::from("a").equals(&Value::from("a")));
    assert!(!Value::Null.equals(&Value::from("null")));
}

#[test]
fn test_hash_codes() {
    assert_eq!(Value::from("hello").hash_code(), 99_162_322);
    assert_eq!(Value::Bool(false).hash_code(), 1237);
    assert_eq!(Value::Long(1 << 32).hash_code(), 1);
    assert_eq!(Value::Int(-5).hash_code(), -5);
    assert_eq!(Value::Char('A').hash_code(), 65);
}

#[test]
fn test_conversions() {
    assert_eq!(Value::from(Some(3)), Value::Int(3));
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(String::from("s")), Value::from("s"));
    assert_eq!(Value::Short(-2).as_integral(), Some(-2));
    assert_eq!(Value::Char('a').as_f64(), Some(97.0));
    assert_eq!(Value::from("x").as_integral(), None);
}
