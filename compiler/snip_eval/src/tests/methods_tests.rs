//! Tests for built-in and host method dispatch.

use crate::errors::{host_failure, EvalErrorKind};
use crate::host::ClassBuilder;
use crate::methods::{call_method, get_field, BUILTIN_METHODS};
use crate::value::Value;

fn call(receiver: impl Into<Value>, method: &str, args: &[Value]) -> Value {
    call_method(&receiver.into(), method, args).unwrap()
}

fn fault(receiver: impl Into<Value>, method: &str, args: &[Value]) -> EvalErrorKind {
    call_method(&receiver.into(), method, args).unwrap_err().kind
}

#[derive(Clone)]
struct Entity {
    name: String,
}

#[test]
fn test_substring() {
    assert_eq!(
        call("Hello World", "substring", &[Value::Int(6)]),
        Value::from("World")
    );
    assert_eq!(
        call("Hello World", "substring", &[Value::Int(0), Value::Int(5)]),
        Value::from("Hello")
    );
    assert_eq!(
        call("Hello", "substring", &[Value::Int(5)]),
        Value::from("")
    );
    assert_eq!(
        fault("Hello", "substring", &[Value::Int(6)]),
        EvalErrorKind::IndexOutOfBounds { index: 6, length: 5 }
    );
    assert_eq!(
        fault("Hello", "substring", &[Value::Int(-1)]),
        EvalErrorKind::IndexOutOfBounds { index: -1, length: 5 }
    );
    assert_eq!(
        fault("Hello", "substring", &[Value::Int(3), Value::Int(2)]),
        EvalErrorKind::IndexOutOfBounds { index: 3, length: 5 }
    );
}

#[test]
fn test_indices_count_characters() {
    assert_eq!(call("héllo", "length", &[]), Value::Int(5));
    assert_eq!(call("héllo", "charAt", &[Value::Int(1)]), Value::Char('é'));
    assert_eq!(call("héllo", "substring", &[Value::Int(2)]), Value::from("llo"));
    assert_eq!(call("héllo", "indexOf", &[Value::from("l")]), Value::Int(2));
    assert_eq!(
        fault("abc", "charAt", &[Value::Int(3)]),
        EvalErrorKind::IndexOutOfBounds { index: 3, length: 3 }
    );
}

#[test]
fn test_equality_methods() {
    assert_eq!(
        call("Hello World", "equals", &[Value::from("Hello World")]),
        Value::Bool(true)
    );
    assert_eq!(call("Hello World", "equals", &[Value::from("Hello")]), Value::Bool(false));
    assert_eq!(call("Hello", "equals", &[Value::Null]), Value::Bool(false));
    assert_eq!(call("1", "equals", &[Value::Int(1)]), Value::Bool(false));
    assert_eq!(
        call("HELLO", "equalsIgnoreCase", &[Value::from("hello")]),
        Value::Bool(true)
    );
    assert_eq!(
        call("HELLO", "equalsIgnoreCase", &[Value::from("help")]),
        Value::Bool(false)
    );
    assert_eq!(call("a", "equalsIgnoreCase", &[Value::Null]), Value::Bool(false));
}

#[test]
fn test_prefix_and_suffix() {
    assert_eq!(call("Hello", "startsWith", &[Value::from("He")]), Value::Bool(true));
    assert_eq!(call("Hello", "startsWith", &[Value::from("lo")]), Value::Bool(false));
    assert_eq!(
        call("Hello", "startsWith", &[Value::from("ll"), Value::Int(2)]),
        Value::Bool(true)
    );
    assert_eq!(
        call("Hello", "startsWith", &[Value::from(""), Value::Int(5)]),
        Value::Bool(true)
    );
    assert_eq!(
        call("Hello", "startsWith", &[Value::from(""), Value::Int(6)]),
        Value::Bool(false)
    );
    assert_eq!(call("Hello", "endsWith", &[Value::from("lo")]), Value::Bool(true));
    assert_eq!(call("Hello", "contains", &[Value::from("ell")]), Value::Bool(true));
    assert!(matches!(
        fault("Hello", "contains", &[Value::Null]),
        EvalErrorKind::NullDereference { .. }
    ));
    assert!(matches!(
        fault("Hello", "contains", &[Value::Int(1)]),
        EvalErrorKind::WrongArgumentType { .. }
    ));
}

#[test]
fn test_search() {
    assert_eq!(call("banana", "indexOf", &[Value::from("an")]), Value::Int(1));
    assert_eq!(call("banana", "indexOf", &[Value::Char('n')]), Value::Int(2));
    assert_eq!(
        call("banana", "indexOf", &[Value::from("an"), Value::Int(2)]),
        Value::Int(3)
    );
    assert_eq!(call("banana", "indexOf", &[Value::from("x")]), Value::Int(-1));
    assert_eq!(
        call("banana", "indexOf", &[Value::from(""), Value::Int(10)]),
        Value::Int(6)
    );
    assert_eq!(call("banana", "lastIndexOf", &[Value::from("an")]), Value::Int(3));
    assert_eq!(call("banana", "lastIndexOf", &[Value::Char('b')]), Value::Int(0));
    assert_eq!(call("banana", "lastIndexOf", &[Value::from("")]), Value::Int(6));
}

#[test]
fn test_compare_to() {
    assert_eq!(call("apple", "compareTo", &[Value::from("banana")]), Value::Int(-1));
    assert_eq!(call("b", "compareTo", &[Value::from("a")]), Value::Int(1));
    assert_eq!(call("abc", "compareTo", &[Value::from("abc")]), Value::Int(0));
    assert_eq!(call("ab", "compareTo", &[Value::from("abcd")]), Value::Int(-2));
    assert_eq!(
        call("ABC", "compareToIgnoreCase", &[Value::from("abd")]),
        Value::Int(-1)
    );
}

#[test]
fn test_transformations() {
    assert_eq!(call("Hello", "toUpperCase", &[]), Value::from("HELLO"));
    assert_eq!(call("Hello", "toLowerCase", &[]), Value::from("hello"));
    assert_eq!(call("  x \t\n", "trim", &[]), Value::from("x"));
    assert_eq!(call("\u{2003}x\u{2003}", "strip", &[]), Value::from("x"));
    assert_eq!(call("\u{2003}x", "trim", &[]), Value::from("\u{2003}x"));
    assert_eq!(call("ab", "concat", &[Value::from("cd")]), Value::from("abcd"));
    assert_eq!(call("ab", "repeat", &[Value::Int(3)]), Value::from("ababab"));
    assert_eq!(
        call("a.b.c", "replace", &[Value::Char('.'), Value::Char('/')]),
        Value::from("a/b/c")
    );
    assert_eq!(
        call("aXbXc", "replace", &[Value::from("X"), Value::from("--")]),
        Value::from("a--b--c")
    );
    assert!(call_method(&Value::from("a"), "repeat", &[Value::Int(-1)]).is_err());
}

#[test]
fn test_predicates() {
    assert_eq!(call("", "isEmpty", &[]), Value::Bool(true));
    assert_eq!(call(" ", "isEmpty", &[]), Value::Bool(false));
    assert_eq!(call(" \t", "isBlank", &[]), Value::Bool(true));
}

#[test]
fn test_hash_code_matches_utf16_definition() {
    assert_eq!(call("hello", "hashCode", &[]), Value::Int(99_162_322));
    assert_eq!(call("Hello World", "hashCode", &[]), Value::Int(-862_545_276));
    assert_eq!(call("", "hashCode", &[]), Value::Int(0));
}

#[test]
fn test_unknown_string_method() {
    assert_eq!(
        fault("x", "frobnicate", &[]),
        EvalErrorKind::NoSuchMethod {
            method: "frobnicate".to_string(),
            type_name: "String".to_string(),
            arity: 0,
        }
    );
    // Wrong arity is also an unknown method.
    assert!(matches!(
        fault("x", "length", &[Value::Int(1)]),
        EvalErrorKind::NoSuchMethod { arity: 1, .. }
    ));
}

#[test]
fn test_null_receiver() {
    assert_eq!(
        fault(Value::Null, "length", &[]),
        EvalErrorKind::NullDereference {
            member: "length".to_string()
        }
    );
    assert!(matches!(
        get_field(&Value::Null, "name").unwrap_err().kind,
        EvalErrorKind::NullDereference { .. }
    ));
}

#[test]
fn test_boxed_methods() {
    assert_eq!(call(3.9, "intValue", &[]), Value::Int(3));
    assert_eq!(call(7, "longValue", &[]), Value::Long(7));
    assert_eq!(call(7, "doubleValue", &[]), Value::Double(7.0));
    assert_eq!(call(300, "byteValue", &[]), Value::Byte(44));
    assert_eq!(call(true, "booleanValue", &[]), Value::Bool(true));
    assert_eq!(call('x', "charValue", &[]), Value::Char('x'));
    assert_eq!(call(5, "compareTo", &[Value::Int(9)]), Value::Int(-1));
    assert_eq!(call('c', "compareTo", &[Value::Char('a')]), Value::Int(2));
    assert_eq!(call(f64::NAN, "compareTo", &[Value::Double(1.0)]), Value::Int(1));
    assert_eq!(call(-0.0, "compareTo", &[Value::Double(0.0)]), Value::Int(-1));
    assert_eq!(call(5, "equals", &[Value::Int(5)]), Value::Bool(true));
    assert_eq!(call(5, "equals", &[Value::Long(5)]), Value::Bool(false));
    assert_eq!(call(5, "toString", &[]), Value::from("5"));
    assert_eq!(call(true, "hashCode", &[]), Value::Int(1231));
    assert!(matches!(
        fault(5, "compareTo", &[Value::Long(1)]),
        EvalErrorKind::WrongArgumentType { .. }
    ));
    assert!(matches!(
        fault(true, "intValue", &[]),
        EvalErrorKind::NoSuchMethod { .. }
    ));
    assert!(matches!(
        fault('c', "intValue", &[]),
        EvalErrorKind::NoSuchMethod { .. }
    ));
}

#[test]
fn test_host_methods_and_fields() {
    let entity = ClassBuilder::<Entity>::new("com.acme.Entity")
        .getter("getName", |this| Value::from(this.name.as_str()))
        .method("greet", 1, |this, args| {
            Ok(Value::string(format!("{} greets {}", this.name, args[0])))
        })
        .method("fail", 0, |_, _| Err(host_failure("entity unavailable")))
        .field("name", |this| Value::from(this.name.as_str()))
        .build();
    let object = entity.value(Entity {
        name: "Hello World".to_string(),
    });

    assert_eq!(call(object.clone(), "getName", &[]), Value::from("Hello World"));
    assert_eq!(
        call(object.clone(), "greet", &[Value::from("you")]),
        Value::from("Hello World greets you")
    );
    assert_eq!(get_field(&object, "name").unwrap(), Value::from("Hello World"));
    assert_eq!(
        fault(object.clone(), "fail", &[]),
        EvalErrorKind::HostFailure {
            message: "entity unavailable".to_string()
        }
    );
    assert!(matches!(
        fault(object.clone(), "getName", &[Value::Int(1)]),
        EvalErrorKind::NoSuchMethod { arity: 1, .. }
    ));
    assert!(matches!(
        get_field(&object, "missing").unwrap_err().kind,
        EvalErrorKind::NoSuchField { .. }
    ));
}

#[test]
fn test_universal_object_methods() {
    let entity = ClassBuilder::<Entity>::new("com.acme.Entity").build();
    let a = entity.value(Entity {
        name: "a".to_string(),
    });
    let b = entity.value(Entity {
        name: "a".to_string(),
    });

    assert_eq!(call(a.clone(), "equals", &[a.clone()]), Value::Bool(true));
    assert_eq!(call(a.clone(), "equals", &[b]), Value::Bool(false));
    let text = call(a.clone(), "toString", &[]);
    assert!(text.as_str().is_some_and(|s| s.starts_with("com.acme.Entity@")));
    assert!(matches!(call(a, "hashCode", &[]), Value::Int(_)));
}

#[test]
fn test_builtin_method_list_dispatches() {
    for &(type_name, method, arity) in BUILTIN_METHODS {
        let receiver = match type_name {
            "String" => Value::from("abc"),
            "Boolean" => Value::Bool(true),
            "Character" => Value::Char('a'),
            _ => Value::Int(1),
        };
        let arg = match (type_name, method) {
            ("String", "charAt" | "substring" | "repeat") => Value::Int(1),
            ("String", "startsWith" | "indexOf") if arity == 2 => Value::Int(0),
            _ => receiver.clone(),
        };
        let args: Vec<Value> = match (method, arity) {
            ("startsWith" | "indexOf", 2) => vec![Value::from("a"), arg],
            ("substring", 2) => vec![Value::Int(0), Value::Int(1)],
            ("replace", 2) => vec![Value::from("a"), Value::from("b")],
            (_, 1) => vec![arg],
            _ => Vec::new(),
        };
        let result = call_method(&receiver, method, &args);
        assert!(
            !matches!(
                result.as_ref().map_err(|e| &e.kind),
                Err(EvalErrorKind::NoSuchMethod { .. })
            ),
            "{type_name}.{method}/{arity} is listed but not dispatched"
        );
    }
}
