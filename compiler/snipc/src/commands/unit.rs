use super::{report, CommandOptions};
use crate::builder::SourceUnitBuilder;

/// Print the unit generated for the options without compiling it.
pub fn print_unit(options: &CommandOptions) -> i32 {
    let builder = SourceUnitBuilder::new(options.config().unit_prefix);
    match builder.build(&options.request()) {
        Ok(artifact) => {
            print!("{}", artifact.text);
            0
        }
        Err(err) => {
            report(&err, options.detailed);
            1
        }
    }
}
