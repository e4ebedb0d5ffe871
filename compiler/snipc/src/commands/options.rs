//! Command-line options shared by `snip eval` and `snip unit`.

use snip_eval::Value;
use snip_ir::{PrimitiveKind, TypeRef};
use thiserror::Error;

use crate::config::FactoryConfig;
use crate::request::EvaluationRequest;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("missing snippet")]
    MissingSnippet,

    #[error("unexpected argument `{0}`")]
    Unexpected(String),

    #[error("`{0}` expects a value")]
    MissingValue(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("malformed binding `{0}`, expected name:type=value")]
    MalformedBinding(String),

    #[error("`{text}` is not a valid {ty} value")]
    InvalidValue { text: String, ty: String },

    #[error("values of type {0} cannot be given on the command line")]
    UnsupportedType(String),
}

/// A `name:type=value` argument.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    pub name: String,
    pub ty: TypeRef,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandOptions {
    pub snippet: String,
    /// Wrap the snippet as `return <snippet>;`.
    pub expression: bool,
    pub result_type: TypeRef,
    pub params: Vec<TypedValue>,
    pub constants: Vec<TypedValue>,
    pub unit_prefix: Option<String>,
    pub log_units: bool,
    /// Render compile diagnostics with source excerpts.
    pub detailed: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        CommandOptions {
            snippet: String::new(),
            expression: false,
            result_type: TypeRef::object(),
            params: Vec::new(),
            constants: Vec::new(),
            unit_prefix: None,
            log_units: false,
            detailed: false,
        }
    }
}

impl CommandOptions {
    /// Source text handed to the builder.
    pub fn snippet_text(&self) -> String {
        if self.expression {
            format!("return {};", self.snippet)
        } else {
            self.snippet.clone()
        }
    }

    pub fn request(&self) -> EvaluationRequest {
        let request = EvaluationRequest::new(self.snippet_text(), self.result_type.clone());
        let request = self
            .params
            .iter()
            .fold(request, |r, p| r.param(p.name.as_str(), p.ty.clone()));
        self.constants.iter().fold(request, |r, c| {
            r.constant(c.name.as_str(), c.ty.clone(), c.value.clone())
        })
    }

    /// Argument values, in parameter order.
    pub fn arguments(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }

    pub fn config(&self) -> FactoryConfig {
        let config = FactoryConfig::default().with_log_units(self.log_units);
        match &self.unit_prefix {
            Some(prefix) => config.with_unit_prefix(prefix.as_str()),
            None => config,
        }
    }
}

/// Parse the arguments following the command name.
///
/// The first free argument is the snippet; options may come before or
/// after it, as `--flag value` or `--flag=value`.
pub fn parse_options(args: &[String]) -> Result<CommandOptions, OptionError> {
    let mut options = CommandOptions::default();
    let mut snippet = None;
    let mut rest = args.iter();

    while let Some(arg) = rest.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };
        let mut value = |flag: &str| {
            inline
                .clone()
                .or_else(|| rest.next().cloned())
                .ok_or_else(|| OptionError::MissingValue(flag.to_string()))
        };

        match flag {
            "--result" | "-r" => options.result_type = parse_type(&value(flag)?)?,
            "--param" | "-p" => options.params.push(parse_typed_value(&value(flag)?)?),
            "--const" | "-c" => options.constants.push(parse_typed_value(&value(flag)?)?),
            "--prefix" => options.unit_prefix = Some(value(flag)?),
            "--expr" | "-e" => options.expression = true,
            "--log-units" => options.log_units = true,
            "--detailed" => options.detailed = true,
            _ if arg.starts_with('-') && arg.len() > 1 && !looks_numeric(arg) => {
                return Err(OptionError::Unexpected(arg.clone()));
            }
            _ if snippet.is_none() => snippet = Some(arg.clone()),
            _ => return Err(OptionError::Unexpected(arg.clone())),
        }
    }

    options.snippet = snippet.ok_or(OptionError::MissingSnippet)?;
    Ok(options)
}

fn looks_numeric(arg: &str) -> bool {
    arg[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn parse_type(text: &str) -> Result<TypeRef, OptionError> {
    TypeRef::parse(text).ok_or_else(|| OptionError::UnknownType(text.to_string()))
}

/// Parse `name:type=value`.
pub fn parse_typed_value(text: &str) -> Result<TypedValue, OptionError> {
    let malformed = || OptionError::MalformedBinding(text.to_string());
    let (name, rest) = text.split_once(':').ok_or_else(malformed)?;
    let (ty, value) = rest.split_once('=').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }
    let ty = parse_type(ty)?;
    let value = parse_value(value, &ty)?;
    Ok(TypedValue {
        name: name.to_string(),
        ty,
        value,
    })
}

/// Parse a value of type `ty` from its command-line spelling.
///
/// Reference types accept `null`; `String` and `Object` take the text
/// verbatim. Host classes cannot be spelled on the command line.
pub fn parse_value(text: &str, ty: &TypeRef) -> Result<Value, OptionError> {
    let invalid = || OptionError::InvalidValue {
        text: text.to_string(),
        ty: ty.to_string(),
    };

    let kind = match ty {
        TypeRef::Primitive(kind) => *kind,
        TypeRef::Named(name) => {
            return match &**name {
                _ if text == "null" => Ok(Value::Null),
                "String" | "java.lang.String" | "Object" | "java.lang.Object" => {
                    Ok(Value::from(text))
                }
                other => Err(OptionError::UnsupportedType(other.to_string())),
            };
        }
    };

    let value = match kind {
        PrimitiveKind::Boolean => match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(invalid()),
        },
        PrimitiveKind::Byte => Value::Byte(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Short => Value::Short(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Int => Value::Int(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Long => Value::Long(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Float => Value::Float(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Double => Value::Double(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => return Err(invalid()),
            }
        }
    };
    Ok(value)
}
