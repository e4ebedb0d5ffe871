//! Source unit assembly.
//!
//! The builder turns an [`EvaluationRequest`] into the text of a synthetic
//! compilation unit:
//!
//! ```text
//! final class Snippet$7 {
//!     static final String x = "Hello World";
//!     static final com.acme.Entity e;
//!     static boolean evaluate(String a) {
//! a.equals(x)
//!     }
//! }
//! ```
//!
//! Constants whose values have a source literal are initialized in place.
//! The rest (host objects, non-finite floats) are declared without an
//! initializer and handed to the loader as external bindings. The snippet
//! always starts at column 1 of its own line so diagnostics can be mapped
//! back to it by line offset alone.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use snip_eval::{BuiltinClass, ClassRef, Value};
use snip_ir::{is_keyword, is_valid_identifier, TypeRef};

use crate::error::{malformed, Error};
use crate::request::EvaluationRequest;

/// Name of the single method of every generated unit.
pub const ENTRY_POINT: &str = "evaluate";

/// Process-wide unit counter; names never repeat within a process.
static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Text of a generated unit plus what is needed to load and report on it.
#[derive(Clone, Debug)]
pub struct SourceArtifact {
    pub unit_name: Arc<str>,
    pub text: String,
    /// Byte offset of the snippet in `text`.
    pub snippet_offset: u32,
    /// 1-based line of `text` on which the snippet starts.
    pub snippet_line: u32,
    /// Number of lines the snippet spans.
    pub snippet_lines: u32,
    /// Constants declared without initializer, with their values.
    pub external_bindings: Vec<(Arc<str>, Value)>,
}

impl SourceArtifact {
    /// The snippet as embedded in the unit.
    pub fn snippet(&self) -> &str {
        let start = self.snippet_offset as usize;
        let lines = self.snippet_lines as usize;
        let tail = self.text.get(start..).unwrap_or_default();
        let end = tail
            .match_indices('\n')
            .nth(lines.saturating_sub(1))
            .map_or(tail.len(), |(i, _)| i);
        &tail[..end]
    }
}

/// Assembles compilation units from requests.
#[derive(Clone, Debug)]
pub struct SourceUnitBuilder {
    prefix: Arc<str>,
}

impl SourceUnitBuilder {
    pub fn new(prefix: impl Into<Arc<str>>) -> Self {
        SourceUnitBuilder {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Validate `request` and render it as a uniquely named unit.
    pub fn build(&self, request: &EvaluationRequest) -> Result<SourceArtifact, Error> {
        if !is_valid_identifier(&self.prefix) {
            return Err(malformed(format!(
                "unit prefix `{}` is not a valid identifier",
                self.prefix
            )));
        }
        validate(request)?;

        let id = NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed);
        let unit_name: Arc<str> = Arc::from(format!("{}${id}", self.prefix));

        let mut text = String::with_capacity(128 + request.snippet().len());
        let mut external_bindings = Vec::new();
        let _ = writeln!(text, "final class {unit_name} {{");

        for constant in request.constants() {
            match render_literal(&constant.value) {
                Some(literal) => {
                    let _ = writeln!(
                        text,
                        "    static final {} {} = {literal};",
                        constant.ty, constant.name
                    );
                }
                None => {
                    let _ = writeln!(text, "    static final {} {};", constant.ty, constant.name);
                    external_bindings.push((Arc::clone(&constant.name), constant.value.clone()));
                }
            }
        }

        let params = request
            .parameter_names()
            .iter()
            .zip(request.parameter_types())
            .map(|(name, ty)| format!("{ty} {name}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            text,
            "    static {} {ENTRY_POINT}({params}) {{",
            request.result_type()
        );

        let snippet_offset = to_u32(text.len());
        let snippet_line = to_u32(text.matches('\n').count() + 1);
        let snippet = request.snippet();
        text.push_str(snippet);
        text.push_str("\n    }\n}\n");

        Ok(SourceArtifact {
            unit_name,
            text,
            snippet_offset,
            snippet_line,
            snippet_lines: to_u32(snippet.matches('\n').count() + 1),
            external_bindings,
        })
    }
}

impl Default for SourceUnitBuilder {
    fn default() -> Self {
        SourceUnitBuilder::new(crate::FactoryConfig::DEFAULT_UNIT_PREFIX)
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn validate(request: &EvaluationRequest) -> Result<(), Error> {
    let names = request.parameter_names();
    let types = request.parameter_types();
    if names.len() != types.len() {
        return Err(malformed(format!(
            "{} parameter name(s) but {} parameter type(s)",
            names.len(),
            types.len()
        )));
    }

    check_type(request.result_type(), "result type")?;

    let mut params: FxHashSet<&str> = FxHashSet::default();
    for (name, ty) in names.iter().zip(types) {
        check_identifier(name)?;
        check_type(ty, &format!("type of parameter `{name}`"))?;
        if !params.insert(name) {
            return Err(malformed(format!("duplicate parameter `{name}`")));
        }
    }

    let mut constants: FxHashSet<&str> = FxHashSet::default();
    for constant in request.constants() {
        let name = &*constant.name;
        check_identifier(name)?;
        check_type(&constant.ty, &format!("type of constant `{name}`"))?;
        if params.contains(name) {
            return Err(malformed(format!(
                "`{name}` is declared both as a parameter and as a constant"
            )));
        }
        if !constants.insert(name) {
            return Err(malformed(format!("duplicate constant `{name}`")));
        }
        let fits = match &constant.ty {
            TypeRef::Primitive(kind) => constant
                .value
                .primitive_kind()
                .is_some_and(|source| source.widens_to(*kind)),
            // Host classes are only known to the loader.
            TypeRef::Named(class) => match BuiltinClass::from_name(class) {
                Some(builtin) => ClassRef::Builtin(builtin).admits(&constant.value),
                None => true,
            },
        };
        if !fits {
            return Err(malformed(format!(
                "constant `{name}` of type {} cannot hold a {} value",
                constant.ty,
                constant.value.type_name()
            )));
        }
    }
    Ok(())
}

fn check_identifier(name: &str) -> Result<(), Error> {
    if is_keyword(name) {
        Err(malformed(format!("`{name}` is a reserved word")))
    } else if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(malformed(format!("`{name}` is not a valid identifier")))
    }
}

fn check_type(ty: &TypeRef, what: &str) -> Result<(), Error> {
    if ty.is_renderable() {
        Ok(())
    } else {
        Err(malformed(format!("{what} `{ty}` cannot be rendered")))
    }
}

/// Source literal for `value`, or `None` if it has to be bound externally.
pub(crate) fn render_literal(value: &Value) -> Option<String> {
    let literal = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Byte(n) => format!("(byte) {n}"),
        Value::Short(n) => format!("(short) {n}"),
        Value::Char(c) => {
            let mut out = String::from('\'');
            push_escaped(&mut out, *c, '\'');
            out.push('\'');
            out
        }
        Value::Int(i32::MIN) => "(-2147483647 - 1)".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Long(i64::MIN) => "(-9223372036854775807L - 1L)".to_string(),
        Value::Long(n) => format!("{n}L"),
        Value::Float(f) if f.is_finite() => format!("{f:?}f"),
        Value::Double(d) if d.is_finite() => format!("{d:?}"),
        Value::Str(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for c in s.chars() {
                push_escaped(&mut out, c, '"');
            }
            out.push('"');
            out
        }
        Value::Float(_) | Value::Double(_) | Value::Object(_) => return None,
    };
    Some(literal)
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", u32::from(c));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
