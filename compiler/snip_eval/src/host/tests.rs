use std::sync::atomic::{AtomicI32, Ordering};

use super::*;

/// Mutable host state; a copy starts from the current count.
struct Counter {
    count: AtomicI32,
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Counter {
            count: AtomicI32::new(self.count.load(Ordering::SeqCst)),
        }
    }
}

fn counter_type() -> HostType<Counter> {
    ClassBuilder::<Counter>::new("test.Counter")
        .method("increment", 0, |this, _| {
            Ok(Value::Int(this.count.fetch_add(1, Ordering::SeqCst) + 1))
        })
        .getter("get", |this| Value::Int(this.count.load(Ordering::SeqCst)))
        .build()
}

#[test]
fn test_fork_copies_instance_data() {
    let counter = counter_type().instance(Counter {
        count: AtomicI32::new(5),
    });
    let fork = counter.fork();

    assert!(!fork.ptr_eq(&counter));
    assert!(Arc::ptr_eq(fork.class(), counter.class()));
    fork.invoke("increment", &[]).unwrap().unwrap();

    assert_eq!(fork.invoke("get", &[]).unwrap().unwrap(), Value::Int(6));
    assert_eq!(counter.invoke("get", &[]).unwrap().unwrap(), Value::Int(5));
}

#[test]
fn test_clone_shares_instance_data() {
    let counter = counter_type().instance(Counter {
        count: AtomicI32::new(0),
    });
    let alias = counter.clone();
    alias.invoke("increment", &[]).unwrap().unwrap();

    assert!(alias.ptr_eq(&counter));
    assert_eq!(counter.invoke("get", &[]).unwrap().unwrap(), Value::Int(1));
}

#[test]
fn test_downcast() {
    let counter = counter_type().instance(Counter {
        count: AtomicI32::new(9),
    });
    let data = counter.downcast_ref::<Counter>().unwrap();
    assert_eq!(data.count.load(Ordering::SeqCst), 9);
    assert!(counter.downcast_ref::<String>().is_none());
}

#[test]
fn test_method_lookup_by_name_and_arity() {
    let ty = counter_type();
    let class = ty.class();
    assert!(class.has_method("increment", 0));
    assert!(!class.has_method("increment", 1));
    assert!(!class.has_field("count"));
    assert_eq!(class.name(), "test.Counter");

    let counter = ty.instance(Counter {
        count: AtomicI32::new(0),
    });
    assert!(counter.invoke("increment", &[Value::Int(1)]).is_none());
    assert!(counter.invoke("missing", &[]).is_none());
}

#[test]
fn test_later_registration_replaces_earlier() {
    #[derive(Clone)]
    struct Unit;

    let ty = ClassBuilder::<Unit>::new("test.Unit")
        .getter("name", |_| Value::from("first"))
        .getter("name", |_| Value::from("second"))
        .build();
    let object = ty.instance(Unit);
    assert_eq!(object.invoke("name", &[]).unwrap().unwrap(), Value::from("second"));
}

#[test]
fn test_subclass_check() {
    #[derive(Clone)]
    struct Leaf;

    let ty = ClassBuilder::<Leaf>::new("tree.Leaf")
        .supertype("tree.Node")
        .build();
    assert!(ty.class().is_subclass_of("tree.Leaf"));
    assert!(ty.class().is_subclass_of("tree.Node"));
    assert!(!ty.class().is_subclass_of("tree.Branch"));
    assert_eq!(ty.class().supertypes().len(), 1);
}

#[test]
fn test_display_uses_class_name() {
    let counter = counter_type().instance(Counter {
        count: AtomicI32::new(0),
    });
    assert!(counter.to_string().starts_with("test.Counter@"));
}
