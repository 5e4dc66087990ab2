//! Validator argument lists: `Length(4, 20, "too long")`.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::value::format_float;

lazy_static! {
    static ref NUMERIC: Regex = Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

/// A coerced validator argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Param {
    /// Integer reading of the argument; anything non-numeric reads as 0.
    pub fn as_int(&self) -> i64 {
        match self {
            Param::Null => 0,
            Param::Bool(b) => *b as i64,
            Param::Int(n) => *n,
            Param::Float(f) => *f as i64,
            Param::Str(s) => leading_int(s),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Param::Null => false,
            Param::Bool(b) => *b,
            Param::Int(n) => *n != 0,
            Param::Float(f) => *f != 0.0,
            Param::Str(s) => !s.is_empty() && s != "0",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Null | Param::Bool(false) => Ok(()),
            Param::Bool(true) => f.write_str("1"),
            Param::Int(n) => write!(f, "{}", n),
            Param::Float(x) => f.write_str(&format_float(*x)),
            Param::Str(s) => f.write_str(s),
        }
    }
}

/// Parse the text between the parentheses of a rule into arguments.
///
/// Blank input yields no arguments at all.
pub fn parse_arguments(raw: &str) -> Vec<Param> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    split_arguments(raw).into_iter().map(coerce_argument).collect()
}

/// Split on commas that are not inside single or double quotes.
fn split_arguments(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (i, c) in raw.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ',' => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            None => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

/// Coerce one argument: null, then booleans, then numbers, then quoted
/// strings. Anything else becomes `Null`.
pub fn coerce_argument(arg: &str) -> Param {
    let arg = arg.trim();
    let lower = arg.to_ascii_lowercase();

    if lower == "null" {
        return Param::Null;
    }
    if lower == "true" || lower == "false" {
        return Param::Bool(lower == "true");
    }
    if NUMERIC.is_match(arg) {
        if !arg.contains('.') {
            if let Ok(n) = arg.parse::<i64>() {
                return Param::Int(n);
            }
        }
        if let Ok(f) = arg.parse::<f64>() {
            return Param::Float(f);
        }
    }

    let mut chars = arg.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if first == last && (first == '"' || first == '\'') {
            return Param::Str(arg[1..arg.len() - 1].to_string());
        }
    }

    Param::Null
}

/// Integer prefix of a string (`"12abc"` reads as 12).
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    s[..end].parse().unwrap_or(0)
}
