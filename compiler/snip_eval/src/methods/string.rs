//! `String` methods.
//!
//! Indices and lengths count Unicode scalar values, so `charAt` and
//! `substring` never split a character. `compareTo` and `hashCode` follow
//! the UTF-16 definitions so results match other hosts of the language.

use std::sync::Arc;

use super::helpers::{int_arg, str_arg, to_i32};
use crate::errors::{index_out_of_bounds, no_such_method, wrong_arg_type, EvalError, EvalResult};
use crate::value::Value;

/// Upper bound on the length of a string built by `repeat`.
const MAX_STRING_LEN: usize = 0x7fff_ffff;

pub(super) fn dispatch_string_method(
    receiver: &Arc<str>,
    method: &str,
    args: &[Value],
) -> EvalResult {
    let s: &str = receiver;
    match (method, args) {
        ("length", []) => Ok(Value::Int(to_i32(s.chars().count()))),
        ("isEmpty", []) => Ok(Value::Bool(s.is_empty())),
        ("isBlank", []) => Ok(Value::Bool(s.chars().all(char::is_whitespace))),
        ("charAt", [index]) => {
            let index = int_arg(method, index)?;
            let chars: Vec<char> = s.chars().collect();
            usize::try_from(index)
                .ok()
                .and_then(|i| chars.get(i))
                .map(|c| Value::Char(*c))
                .ok_or_else(|| index_out_of_bounds(i64::from(index), chars.len()))
        }
        ("substring", [begin]) => {
            let begin = int_arg(method, begin)?;
            let length = to_i32(s.chars().count());
            substring(s, begin, length)
        }
        ("substring", [begin, end]) => {
            substring(s, int_arg(method, begin)?, int_arg(method, end)?)
        }
        ("indexOf", [needle]) => Ok(Value::Int(index_of(s, &needle_chars(method, needle)?, 0))),
        ("indexOf", [needle, from]) => {
            let from = int_arg(method, from)?;
            Ok(Value::Int(index_of(s, &needle_chars(method, needle)?, from)))
        }
        ("lastIndexOf", [needle]) => {
            Ok(Value::Int(last_index_of(s, &needle_chars(method, needle)?)))
        }
        ("contains", [needle]) => Ok(Value::Bool(s.contains(str_arg(method, needle)?))),
        ("startsWith", [prefix]) => Ok(Value::Bool(s.starts_with(str_arg(method, prefix)?))),
        ("startsWith", [prefix, offset]) => {
            let prefix = str_arg(method, prefix)?;
            let offset = int_arg(method, offset)?;
            let starts = usize::try_from(offset)
                .ok()
                .and_then(|offset| char_offset_to_byte(s, offset))
                .is_some_and(|byte| s[byte..].starts_with(prefix));
            Ok(Value::Bool(starts))
        }
        ("endsWith", [suffix]) => Ok(Value::Bool(s.ends_with(str_arg(method, suffix)?))),
        ("equals", [other]) => Ok(Value::Bool(matches!(other, Value::Str(o) if **o == *s))),
        ("equalsIgnoreCase", [other]) => Ok(Value::Bool(match other {
            Value::Str(o) => s.chars().map(fold).eq(o.chars().map(fold)),
            _ => false,
        })),
        ("compareTo", [other]) => Ok(Value::Int(compare_utf16(s, str_arg(method, other)?))),
        ("compareToIgnoreCase", [other]) => {
            let other = str_arg(method, other)?;
            Ok(Value::Int(compare_folded(s, other)))
        }
        ("toUpperCase", []) => Ok(Value::string(s.to_uppercase())),
        ("toLowerCase", []) => Ok(Value::string(s.to_lowercase())),
        ("trim", []) => Ok(Value::string(s.trim_matches(|c: char| c <= ' '))),
        ("strip", []) => Ok(Value::string(s.trim())),
        ("concat", [other]) => Ok(Value::string(format!("{s}{}", str_arg(method, other)?))),
        ("replace", [target, replacement]) => replace(s, method, target, replacement),
        ("repeat", [count]) => repeat(s, int_arg(method, count)?),
        ("hashCode", []) => Ok(Value::Int(Value::Str(Arc::clone(receiver)).hash_code())),
        ("toString", []) => Ok(Value::Str(Arc::clone(receiver))),
        _ => Err(no_such_method(method, "String", args.len())),
    }
}

/// Byte offset of the `n`th character, or of the end when `n` equals the
/// character count.
fn char_offset_to_byte(s: &str, n: usize) -> Option<usize> {
    s.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(s.len()))
        .nth(n)
}

fn substring(s: &str, begin: i32, end: i32) -> EvalResult {
    let length = s.chars().count();
    let bad = |index: i32| index_out_of_bounds(i64::from(index), length);
    let begin_idx = usize::try_from(begin).map_err(|_| bad(begin))?;
    let end_idx = usize::try_from(end).map_err(|_| bad(end))?;
    if end_idx > length {
        return Err(bad(end));
    }
    if begin_idx > end_idx {
        return Err(bad(begin));
    }
    let start = char_offset_to_byte(s, begin_idx).ok_or_else(|| bad(begin))?;
    let stop = char_offset_to_byte(s, end_idx).ok_or_else(|| bad(end))?;
    Ok(Value::string(&s[start..stop]))
}

/// Search needle of `indexOf`/`lastIndexOf`: a `String` or a `char`.
fn needle_chars(method: &str, needle: &Value) -> Result<Vec<char>, EvalError> {
    match needle {
        Value::Char(c) => Ok(vec![*c]),
        Value::Str(s) => Ok(s.chars().collect()),
        other => str_arg(method, other).map(|s| s.chars().collect()),
    }
}

fn index_of(s: &str, needle: &[char], from: i32) -> i32 {
    let hay: Vec<char> = s.chars().collect();
    let start = usize::try_from(from).unwrap_or(0).min(hay.len());
    if needle.is_empty() {
        return to_i32(start);
    }
    hay[start..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map_or(-1, |pos| to_i32(start + pos))
}

fn last_index_of(s: &str, needle: &[char]) -> i32 {
    let hay: Vec<char> = s.chars().collect();
    if needle.is_empty() {
        return to_i32(hay.len());
    }
    hay.windows(needle.len())
        .rposition(|window| window == needle)
        .map_or(-1, to_i32)
}

/// Lexicographic comparison of UTF-16 code units: the difference of the
/// first differing units, else the difference of the lengths.
fn compare_utf16(a: &str, b: &str) -> i32 {
    for (x, y) in a.encode_utf16().zip(b.encode_utf16()) {
        if x != y {
            return i32::from(x) - i32::from(y);
        }
    }
    to_i32(a.encode_utf16().count()) - to_i32(b.encode_utf16().count())
}

/// Case folding used by the `IgnoreCase` methods: upper case, then lower.
fn fold(c: char) -> char {
    let upper = c.to_uppercase().next().unwrap_or(c);
    upper.to_lowercase().next().unwrap_or(upper)
}

/// `compareToIgnoreCase`: difference of the first differing folded
/// characters, else the difference of the lengths.
fn compare_folded(a: &str, b: &str) -> i32 {
    for (x, y) in a.chars().map(fold).zip(b.chars().map(fold)) {
        if x != y {
            let diff = i64::from(u32::from(x)) - i64::from(u32::from(y));
            return i32::try_from(diff).unwrap_or(0);
        }
    }
    to_i32(a.chars().count()) - to_i32(b.chars().count())
}

fn replace(s: &str, method: &str, target: &Value, replacement: &Value) -> EvalResult {
    match (target, replacement) {
        (Value::Char(from), Value::Char(to)) => {
            let replaced: String = s.chars().map(|c| if c == *from { *to } else { c }).collect();
            Ok(Value::string(replaced))
        }
        (Value::Char(_), other) => Err(wrong_arg_type(method, "char", other)),
        (target, replacement) => {
            let target = str_arg(method, target)?;
            let replacement = str_arg(method, replacement)?;
            Ok(Value::string(s.replace(target, replacement)))
        }
    }
}

fn repeat(s: &str, count: i32) -> EvalResult {
    let Ok(count) = usize::try_from(count) else {
        return Err(EvalError::new(format!("count is negative: {count}")));
    };
    if s.len().saturating_mul(count) > MAX_STRING_LEN {
        return Err(EvalError::new("repeated string is too long"));
    }
    Ok(Value::string(s.repeat(count)))
}
