//! Declared field types and how raw request strings become values.

use std::collections::HashMap;

use crate::annotation::VarType;
use crate::enums::EnumDef;
use crate::value::Value;

/// Parser of a custom value type. The error is a human-readable reason.
pub type ValueParser = fn(&str) -> Result<Value, String>;

/// How a field's raw request value is converted.
#[derive(Clone, Copy)]
pub enum FieldType<'a> {
    /// Untyped or `array`: stored unchanged.
    Raw,
    /// `DateTime` / `Date`: parsed leniently.
    Date,
    Enum(&'static EnumDef),
    Parsed(&'a str, ValueParser),
    /// A type name nobody registered.
    Unresolved(&'a str),
}

/// Enums and value parsers known to the binder.
#[derive(Clone)]
pub struct TypeRegistry {
    enums: HashMap<String, &'static EnumDef>,
    parsers: HashMap<String, ValueParser>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut enums: Vec<_> = self.enums.keys().collect();
        enums.sort();
        let mut parsers: Vec<_> = self.parsers.keys().collect();
        parsers.sort();
        f.debug_struct("TypeRegistry")
            .field("enums", &enums)
            .field("parsers", &parsers)
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry with the scalar parsers (`int`, `float`, `bool`, `string`
    /// and their long spellings) and no enums.
    pub fn new() -> Self {
        let mut registry = Self {
            enums: HashMap::new(),
            parsers: HashMap::new(),
        };
        registry.register_parser("int", parse_int);
        registry.register_parser("integer", parse_int);
        registry.register_parser("float", parse_float);
        registry.register_parser("double", parse_float);
        registry.register_parser("bool", parse_bool);
        registry.register_parser("boolean", parse_bool);
        registry.register_parser("string", parse_string);
        registry
    }

    pub fn register_enum(&mut self, def: &'static EnumDef) {
        self.enums.insert(def.name.to_string(), def);
    }

    pub fn with_enum(mut self, def: &'static EnumDef) -> Self {
        self.register_enum(def);
        self
    }

    pub fn register_parser(&mut self, type_name: impl Into<String>, parser: ValueParser) {
        self.parsers.insert(type_name.into(), parser);
    }

    pub fn enum_def(&self, name: &str) -> Option<&'static EnumDef> {
        self.enums.get(name).copied()
    }

    /// Resolve a declared type. Enums and parsers are matched by exact name.
    pub fn resolve<'a>(&self, var_type: Option<&'a VarType>) -> FieldType<'a> {
        let Some(var_type) = var_type else {
            return FieldType::Raw;
        };
        let name = var_type.type_name.as_str();

        if name.is_empty()
            || name.eq_ignore_ascii_case("array")
            || name.eq_ignore_ascii_case("mixed")
        {
            return FieldType::Raw;
        }
        if name.eq_ignore_ascii_case("DateTime") || name.eq_ignore_ascii_case("Date") {
            return FieldType::Date;
        }
        if let Some(def) = self.enum_def(name) {
            return FieldType::Enum(def);
        }
        match self.parsers.get(name) {
            Some(parser) => FieldType::Parsed(name, *parser),
            None => FieldType::Unresolved(name),
        }
    }
}

fn parse_int(raw: &str) -> Result<Value, String> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    if let Ok(f) = s.parse::<f64>() {
        return Ok(Value::Int(f as i64));
    }
    Err(format!("cannot convert '{}' to int", raw))
}

fn parse_float(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("cannot convert '{}' to float", raw))
}

fn parse_bool(raw: &str) -> Result<Value, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
        "false" | "0" | "no" | "off" | "" => Ok(Value::Bool(false)),
        _ => Err(format!("cannot convert '{}' to bool", raw)),
    }
}

fn parse_string(raw: &str) -> Result<Value, String> {
    Ok(Value::String(raw.to_string()))
}
