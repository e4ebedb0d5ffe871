//! Diagnostic system for compile-time error reporting.
//!
//! Every phase of the compiler (lexer, parser, resolver) reports problems as
//! [`Diagnostic`]s instead of failing fast, so one compilation yields the
//! full, ordered list of issues:
//! - An [`ErrorCode`] for searchability
//! - A message saying what went wrong
//! - A primary label saying where
//! - Optional secondary labels and notes for context
//!
//! Positions are byte spans into the compiled text; [`span_utils`] turns them
//! into 1-based line/column pairs and [`emitter`] renders them as plain text.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{
    already_defined, expected_expression, expected_token, incompatible_types, unclosed_delimiter,
    unexpected_token, unknown_symbol, Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
