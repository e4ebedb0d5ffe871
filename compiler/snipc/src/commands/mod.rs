//! Command handlers for the `snip` CLI.
//!
//! Each submodule implements one command; option parsing shared by all of
//! them lives in [`options`]. Handlers print their own output and return
//! the process exit code.

mod eval;
mod options;
mod unit;

pub use eval::eval_snippet;
pub use options::{
    parse_options, parse_typed_value, parse_value, CommandOptions, OptionError, TypedValue,
};
pub use unit::print_unit;

use crate::error::Error;

/// Print `err` to stderr, with source excerpts for compile errors when
/// `detailed` is set.
fn report(err: &Error, detailed: bool) {
    match err {
        Error::Compile(diagnostics) if detailed => eprint!("{}", diagnostics.render_detailed()),
        _ => eprintln!("error: {err}"),
    }
}
