use tracing::info;

use super::{report, CommandOptions};
use crate::factory::EvaluatorFactory;
use crate::loader::IsolatedLoader;
use crate::module::EvaluatorModule;

/// Create an evaluator for the options, run it once and print the result.
pub fn eval_snippet(options: &CommandOptions) -> i32 {
    let loader = IsolatedLoader::with_parent(IsolatedLoader::system(), "cli");
    let module = EvaluatorModule::default()
        .with_loader(loader)
        .with_config(options.config())
        .build();
    let factory = match EvaluatorFactory::from_module(&module) {
        Ok(factory) => factory,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let result = factory
        .create_evaluator(&options.request())
        .and_then(|evaluator| {
            info!(unit = evaluator.name(), "evaluating");
            evaluator.evaluate(&options.arguments())
        });
    match result {
        Ok(value) => {
            println!("{value}");
            0
        }
        Err(err) => {
            report(&err, options.detailed);
            1
        }
    }
}
