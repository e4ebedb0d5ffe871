use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use snip_eval::Value;
use snip_ir::TypeRef;

use super::*;
use crate::request::EvaluationRequest;

#[derive(Clone, Debug, PartialEq)]
struct Greeting(String);

#[derive(Clone, Debug, PartialEq)]
struct Banner(String);

#[test]
fn test_instance_bindings() {
    let mut module = Module::new();
    module
        .bind_instance(Greeting("hi".into()))
        .bind_named("port", 8080_u16);

    assert_eq!(module.get::<Greeting>(), Ok(Greeting("hi".into())));
    assert_eq!(module.get_named::<u16>("port"), Ok(8080));
    assert!(module.contains::<Greeting>());
    assert!(module.contains_named("port"));
    assert!(!module.contains::<Banner>());
    assert_eq!(module.len(), 2);
}

#[test]
fn test_missing_bindings() {
    let module = Module::new();
    assert!(module.is_empty());
    assert!(matches!(
        module.get::<Greeting>(),
        Err(ModuleError::NotRegistered { .. })
    ));
    let err = module.get_named::<u16>("port").unwrap_err();
    assert_eq!(err.to_string(), "u16 `port` is not registered");
}

#[test]
fn test_named_type_mismatch() {
    let mut module = Module::new();
    module.bind_named("port", "eighty");
    let err = module.get_named::<u16>("port").unwrap_err();
    assert_eq!(
        err,
        ModuleError::TypeMismatch {
            key: "@port".into(),
            expected: "u16",
        }
    );
}

#[test]
fn test_factory_runs_once_and_sees_dependencies() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);

    let mut module = Module::new();
    module
        .bind_instance(Greeting("hello".into()))
        .bind_factory(move |r: &Resolver<'_>| {
            counted.fetch_add(1, Ordering::SeqCst);
            let Greeting(text) = r.get::<Greeting>()?;
            Ok(Banner(text.to_uppercase()))
        });

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(module.get::<Banner>(), Ok(Banner("HELLO".into())));
    assert_eq!(module.get::<Banner>(), Ok(Banner("HELLO".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rebinding_discards_built_values() {
    let mut module = Module::new();
    module
        .bind_instance(Greeting("a".into()))
        .bind_factory(|r: &Resolver<'_>| Ok(Banner(r.get::<Greeting>()?.0)));
    assert_eq!(module.get::<Banner>(), Ok(Banner("a".into())));

    module.bind_instance(Greeting("b".into()));
    assert_eq!(module.get::<Banner>(), Ok(Banner("b".into())));
}

#[test]
fn test_factory_errors_propagate() {
    let mut module = Module::new();
    module
        .bind_factory(|_: &Resolver<'_>| -> Result<Greeting, ModuleError> {
            Err(ModuleError::factory("Greeting", "no greeting today"))
        })
        .bind_factory(|r: &Resolver<'_>| Ok(Banner(r.get::<Greeting>()?.0)));

    let err = module.get::<Banner>().unwrap_err();
    assert_eq!(err.to_string(), "factory for `Greeting` failed: no greeting today");
}

#[test]
fn test_cycle_is_reported() {
    let mut module = Module::new();
    module
        .bind_named_factory("a", |r: &Resolver<'_>| r.get_named::<i32>("b"))
        .bind_named_factory("b", |r: &Resolver<'_>| r.get_named::<i32>("a"));

    let err = module.get_named::<i32>("a").unwrap_err();
    assert_eq!(
        err,
        ModuleError::Cycle {
            path: "@a -> @b -> @a".into(),
        }
    );
}

struct Defaults;

impl Extension for Defaults {
    fn add_support(&self, module: &mut Module) {
        module.bind_named("retries", 3_u32);
    }
}

#[test]
fn test_install_extension() {
    let mut module = Module::new();
    module.install(&Defaults);
    assert_eq!(module.get_named::<u32>("retries"), Ok(3));
}

#[test]
fn test_evaluator_module_defaults() {
    let module = EvaluatorModule::default().build();
    let config = module.get::<FactoryConfig>().unwrap();
    assert_eq!(&*config.unit_prefix, FactoryConfig::DEFAULT_UNIT_PREFIX);
    assert!(!config.log_units);

    let loader = module.get::<IsolatedLoader>().unwrap();
    assert!(loader.ptr_eq(IsolatedLoader::system()));
    assert!(module.get::<Arc<dyn Compiler>>().is_ok());
}

#[test]
fn test_evaluator_module_overrides() {
    let loader = IsolatedLoader::new("wired");
    let mut module = EvaluatorModule::default().with_loader(loader.clone()).build();
    module.bind_named(UNIT_PREFIX, Arc::<str>::from("Query"));

    let factory = module.get::<EvaluatorFactory>().unwrap();
    assert!(factory.loader().ptr_eq(&loader));
    assert_eq!(&*factory.config().unit_prefix, "Query");

    let evaluator = factory
        .create_evaluator(&EvaluationRequest::new("return 6 * 7;", TypeRef::INT))
        .unwrap();
    assert!(evaluator.name().starts_with("Query"));
    assert_eq!(evaluator.evaluate(&[]).unwrap(), Value::Int(42));
}

#[test]
fn test_factory_from_module() {
    let module = EvaluatorModule::default()
        .with_config(FactoryConfig::default().with_unit_prefix("Wired"))
        .build();
    let factory = EvaluatorFactory::from_module(&module).unwrap();
    assert_eq!(&*factory.config().unit_prefix, "Wired");

    let empty = Module::new();
    assert!(EvaluatorFactory::from_module(&empty).is_err());
}
