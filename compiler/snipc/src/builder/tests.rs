use pretty_assertions::assert_eq;
use snip_eval::{ClassBuilder, Value};
use snip_ir::TypeRef;

use super::*;
use crate::Error;

#[derive(Clone)]
struct Entity;

fn builder() -> SourceUnitBuilder {
    SourceUnitBuilder::new("Test")
}

fn malformed_message(request: &EvaluationRequest) -> String {
    match builder().build(request) {
        Err(Error::MalformedRequest(message)) => message,
        other => panic!("expected MalformedRequest, got {other:?}"),
    }
}

#[test]
fn test_renders_unit_layout() {
    let request = EvaluationRequest::new("a.equals(x)", TypeRef::BOOLEAN)
        .param("a", TypeRef::string())
        .constant("x", TypeRef::string(), "Hello World");
    let artifact = builder().build(&request).unwrap();
    let name = &artifact.unit_name;

    assert!(name.starts_with("Test$"));
    assert_eq!(
        artifact.text,
        format!(
            "final class {name} {{\n    \
             static final String x = \"Hello World\";\n    \
             static boolean evaluate(String a) {{\n\
             a.equals(x)\n    \
             }}\n\
             }}\n"
        )
    );
    assert_eq!(artifact.snippet_line, 4);
    assert_eq!(artifact.snippet(), "a.equals(x)");
    assert_eq!(
        &artifact.text[artifact.snippet_offset as usize..][..11],
        "a.equals(x)"
    );
    assert!(artifact.external_bindings.is_empty());
}

#[test]
fn test_unit_names_are_unique() {
    let request = EvaluationRequest::new("1", TypeRef::INT);
    let first = builder().build(&request).unwrap();
    let second = builder().build(&request).unwrap();
    assert_ne!(first.unit_name, second.unit_name);
}

#[test]
fn test_multiline_snippet_position() {
    let request = EvaluationRequest::new("var t = a * 2;\nreturn t;", TypeRef::INT)
        .param("a", TypeRef::INT);
    let artifact = builder().build(&request).unwrap();
    assert_eq!(artifact.snippet_line, 3);
    assert_eq!(artifact.snippet_lines, 2);
    assert_eq!(artifact.snippet(), "var t = a * 2;\nreturn t;");
}

#[test]
fn test_host_objects_become_external_bindings() {
    let entity = ClassBuilder::<Entity>::new("com.acme.Entity").build();
    let request = EvaluationRequest::new("e", TypeRef::named("com.acme.Entity"))
        .constant("e", TypeRef::named("com.acme.Entity"), entity.value(Entity))
        .constant("nan", TypeRef::DOUBLE, f64::NAN);
    let artifact = builder().build(&request).unwrap();

    assert!(artifact.text.contains("    static final com.acme.Entity e;\n"));
    assert!(artifact.text.contains("    static final double nan;\n"));
    let names: Vec<&str> = artifact.external_bindings.iter().map(|(n, _)| &**n).collect();
    assert_eq!(names, ["e", "nan"]);
}

#[test]
fn test_literal_rendering() {
    let cases = [
        (Value::Null, "null"),
        (Value::Bool(true), "true"),
        (Value::Byte(-128), "(byte) -128"),
        (Value::Short(300), "(short) 300"),
        (Value::Int(-7), "-7"),
        (Value::Int(i32::MIN), "(-2147483647 - 1)"),
        (Value::Long(5), "5L"),
        (Value::Long(i64::MIN), "(-9223372036854775807L - 1L)"),
        (Value::Float(1.5), "1.5f"),
        (Value::Double(2.0), "2.0"),
        (Value::Double(1e300), "1e300"),
        (Value::Char('a'), "'a'"),
        (Value::Char('\''), r"'\''"),
        (Value::Char('\u{1}'), r"'\u0001'"),
        (Value::from("say \"hi\"\n\\"), r#""say \"hi\"\n\\""#),
    ];
    for (value, expected) in cases {
        assert_eq!(render_literal(&value).as_deref(), Some(expected), "{value:?}");
    }
    assert_eq!(render_literal(&Value::Float(f32::INFINITY)), None);
}

#[test]
fn test_duplicate_parameter_and_constant() {
    let request = EvaluationRequest::new("a", TypeRef::INT)
        .param("a", TypeRef::INT)
        .constant("a", TypeRef::INT, 1);
    assert_eq!(
        malformed_message(&request),
        "`a` is declared both as a parameter and as a constant"
    );
}

#[test]
fn test_duplicate_parameters_and_constants() {
    let params = EvaluationRequest::new("a", TypeRef::INT)
        .param("a", TypeRef::INT)
        .param("a", TypeRef::LONG);
    assert_eq!(malformed_message(&params), "duplicate parameter `a`");

    let constants = EvaluationRequest::new("x", TypeRef::INT)
        .constant("x", TypeRef::INT, 1)
        .constant("x", TypeRef::INT, 2);
    assert_eq!(malformed_message(&constants), "duplicate constant `x`");
}

#[test]
fn test_length_mismatch() {
    let request = EvaluationRequest::from_parts(
        "a",
        TypeRef::INT,
        ["a", "b"],
        [TypeRef::INT],
        Vec::<(&str, Value)>::new(),
    );
    assert_eq!(
        malformed_message(&request),
        "2 parameter name(s) but 1 parameter type(s)"
    );
}

#[test]
fn test_bad_identifiers_and_types() {
    let keyword = EvaluationRequest::new("1", TypeRef::INT).param("class", TypeRef::INT);
    assert_eq!(malformed_message(&keyword), "`class` is a reserved word");

    let invalid = EvaluationRequest::new("1", TypeRef::INT).param("1a", TypeRef::INT);
    assert_eq!(malformed_message(&invalid), "`1a` is not a valid identifier");

    let bad_type = EvaluationRequest::new("1", TypeRef::named("com..Entity"));
    assert_eq!(
        malformed_message(&bad_type),
        "result type `com..Entity` cannot be rendered"
    );
}

#[test]
fn test_primitive_constant_must_fit() {
    let request = EvaluationRequest::new("x", TypeRef::INT).constant("x", TypeRef::INT, "text");
    assert_eq!(
        malformed_message(&request),
        "constant `x` of type int cannot hold a String value"
    );

    let widened = EvaluationRequest::new("x", TypeRef::LONG).constant("x", TypeRef::LONG, 3);
    assert!(builder().build(&widened).is_ok());
}

#[test]
fn test_builtin_reference_constant_must_fit() {
    let request = EvaluationRequest::new("x", TypeRef::string()).constant("x", TypeRef::string(), 5);
    assert_eq!(
        malformed_message(&request),
        "constant `x` of type String cannot hold a int value"
    );
    let boxed = EvaluationRequest::new("x", TypeRef::LONG).constant("x", TypeRef::named("Long"), 5);
    assert_eq!(
        malformed_message(&boxed),
        "constant `x` of type Long cannot hold a int value"
    );

    for (ty, value) in [
        (TypeRef::named("Integer"), Value::Int(5)),
        (TypeRef::named("java.lang.String"), Value::from("s")),
        (TypeRef::object(), Value::Int(5)),
        (TypeRef::string(), Value::Null),
    ] {
        let request = EvaluationRequest::new("return 1;", TypeRef::INT).constant("x", ty, value);
        assert!(builder().build(&request).is_ok());
    }
}

#[test]
fn test_invalid_prefix() {
    let request = EvaluationRequest::new("1", TypeRef::INT);
    let result = SourceUnitBuilder::new("not valid").build(&request);
    assert!(matches!(result, Err(Error::MalformedRequest(_))));
}
