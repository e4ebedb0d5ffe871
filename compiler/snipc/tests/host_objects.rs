//! Host classes, loader chains and isolation between loads.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicI32, Ordering};

use pretty_assertions::assert_eq;
use snipc::{
    ClassBuilder, EvaluationRequest, EvaluatorFactory, HostType, IsolatedLoader, TypeRef, Value,
};

#[derive(Clone)]
struct Entity {
    name: String,
}

fn entity_type() -> HostType<Entity> {
    ClassBuilder::<Entity>::new("com.acme.Entity")
        .getter("getName", |e| Value::from(e.name.as_str()))
        .build()
}

struct Counter {
    hits: AtomicI32,
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Counter {
            hits: AtomicI32::new(self.hits.load(Ordering::SeqCst)),
        }
    }
}

fn counter_type() -> HostType<Counter> {
    ClassBuilder::<Counter>::new("com.acme.Counter")
        .getter("next", |c| Value::Int(c.hits.fetch_add(1, Ordering::SeqCst) + 1))
        .build()
}

fn hits(value: &Value) -> i32 {
    value
        .as_object()
        .and_then(|o| o.downcast_ref::<Counter>())
        .map(|c| c.hits.load(Ordering::SeqCst))
        .unwrap()
}

fn get_name_request() -> EvaluationRequest {
    EvaluationRequest::new("return a.getName();", TypeRef::string())
        .param("a", TypeRef::named("com.acme.Entity"))
}

#[test]
fn host_method_call() {
    let loader = IsolatedLoader::new("app");
    loader.define(&entity_type());
    let factory = EvaluatorFactory::new(loader);

    let evaluator = factory.create_evaluator(&get_name_request()).unwrap();
    let entity = entity_type().value(Entity {
        name: "Hello World".into(),
    });
    assert_eq!(evaluator.evaluate(&[entity]).unwrap(), Value::from("Hello World"));
}

#[test]
fn host_method_call_through_wrapping_loader() {
    let loader = IsolatedLoader::new("app");
    loader.define(&entity_type());
    let wrapper = IsolatedLoader::with_parent(&loader, "wrapper");
    let factory = EvaluatorFactory::new(wrapper.clone());

    let evaluator = factory.create_evaluator(&get_name_request()).unwrap();
    assert!(evaluator.unit().loader().ptr_eq(&wrapper));
    let entity = entity_type().value(Entity {
        name: "Hello World".into(),
    });
    assert_eq!(evaluator.evaluate(&[entity]).unwrap(), Value::from("Hello World"));

    let scoped = EvaluatorFactory::new(IsolatedLoader::new("unrelated"))
        .create_evaluator_in(&get_name_request(), &wrapper)
        .unwrap();
    assert!(scoped.unit().loader().ptr_eq(&wrapper));
}

#[test]
fn host_constant() {
    let loader = IsolatedLoader::new("app");
    loader.define(&entity_type());
    let request = EvaluationRequest::new("return prefix + owner.getName();", TypeRef::string())
        .constant_value("prefix", "owner: ")
        .constant(
            "owner",
            TypeRef::named("com.acme.Entity"),
            entity_type().value(Entity { name: "ops".into() }),
        );

    let evaluator = EvaluatorFactory::new(loader)
        .create_evaluator(&request)
        .unwrap();
    assert_eq!(evaluator.evaluate(&[]).unwrap(), Value::from("owner: ops"));
}

#[test]
fn distinct_loaders_do_not_share_constants() {
    let root = IsolatedLoader::new("root");
    root.define(&counter_type());
    let shared = counter_type().value(Counter {
        hits: AtomicI32::new(0),
    });
    let request = EvaluationRequest::new("return c.next();", TypeRef::INT).constant(
        "c",
        TypeRef::named("com.acme.Counter"),
        shared.clone(),
    );

    let first = EvaluatorFactory::new(IsolatedLoader::with_parent(&root, "first"))
        .create_evaluator(&request)
        .unwrap();
    let second = EvaluatorFactory::new(IsolatedLoader::with_parent(&root, "second"))
        .create_evaluator(&request)
        .unwrap();
    let again = EvaluatorFactory::new(IsolatedLoader::with_parent(&root, "first-again"))
        .create_evaluator(&request)
        .unwrap();

    assert_eq!(first.evaluate(&[]).unwrap(), Value::Int(1));
    assert_eq!(first.evaluate(&[]).unwrap(), Value::Int(2));
    assert_eq!(second.evaluate(&[]).unwrap(), Value::Int(1));
    assert_eq!(again.evaluate(&[]).unwrap(), Value::Int(1));
    assert_eq!(hits(&shared), 0);
}

#[test]
fn same_loader_loads_are_independent() {
    let loader = IsolatedLoader::new("app");
    loader.define(&counter_type());
    let factory = EvaluatorFactory::new(loader);

    let bound = EvaluationRequest::new("return c.next();", TypeRef::INT).constant(
        "c",
        TypeRef::named("com.acme.Counter"),
        counter_type().value(Counter {
            hits: AtomicI32::new(10),
        }),
    );
    let first = factory.create_evaluator(&bound).unwrap();
    let second = factory.create_evaluator(&bound).unwrap();
    assert_eq!(first.evaluate(&[]).unwrap(), Value::Int(11));
    assert_eq!(first.evaluate(&[]).unwrap(), Value::Int(12));
    assert_eq!(second.evaluate(&[]).unwrap(), Value::Int(11));
}

#[test]
fn arguments_are_passed_by_reference() {
    let loader = IsolatedLoader::new("app");
    loader.define(&counter_type());
    let evaluator = EvaluatorFactory::new(loader)
        .create_evaluator(
            &EvaluationRequest::new("return c.next();", TypeRef::INT)
                .param("c", TypeRef::named("com.acme.Counter")),
        )
        .unwrap();

    let counter = counter_type().value(Counter {
        hits: AtomicI32::new(0),
    });
    assert_eq!(evaluator.evaluate(&[counter.clone()]).unwrap(), Value::Int(1));
    assert_eq!(evaluator.evaluate(&[counter.clone()]).unwrap(), Value::Int(2));
    assert_eq!(hits(&counter), 2);
}

#[test]
fn instanceof_and_cast_of_host_objects() {
    let loader = IsolatedLoader::new("app");
    loader.define(&entity_type());
    let evaluator = EvaluatorFactory::new(loader)
        .create_evaluator(
            &EvaluationRequest::new(
                "if (o instanceof com.acme.Entity) {\n    return ((com.acme.Entity) o).getName();\n}\nreturn \"other\";",
                TypeRef::string(),
            )
            .param("o", TypeRef::object()),
        )
        .unwrap();

    let entity = entity_type().value(Entity { name: "e1".into() });
    assert_eq!(evaluator.evaluate(&[entity]).unwrap(), Value::from("e1"));
    assert_eq!(
        evaluator.evaluate(&[Value::from("text")]).unwrap(),
        Value::from("other")
    );
}
