//! Closed enumerations used as model field types.
//!
//! An [`EnumDef`] is declared once as a `static` and lists its options as
//! `(name, canonical value)` pairs. Values compare by enum and canonical
//! value, never by option name.

use std::fmt;

use crate::error::{AppError, AppResult};

/// Definition of a closed set of named options.
#[derive(Debug)]
pub struct EnumDef {
    pub name: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

impl EnumDef {
    pub const fn new(name: &'static str, options: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, options }
    }

    /// Look up an option by its declared name (e.g. `English`).
    pub fn option(&'static self, option: &str) -> AppResult<EnumValue> {
        self.options
            .iter()
            .find(|(name, _)| *name == option)
            .map(|(name, value)| EnumValue::new(self.name, name, value))
            .ok_or_else(|| AppError::enum_parse(self.name, option))
    }

    /// Parse a canonical value (e.g. `en`), ignoring ASCII case.
    pub fn parse(&'static self, raw: &str) -> AppResult<EnumValue> {
        let raw = raw.trim();
        self.options
            .iter()
            .find(|(_, value)| value.eq_ignore_ascii_case(raw))
            .map(|(name, value)| EnumValue::new(self.name, name, value))
            .ok_or_else(|| AppError::enum_parse(self.name, raw))
    }

    /// All options in declaration order.
    pub fn values(&'static self) -> impl Iterator<Item = EnumValue> {
        self.options
            .iter()
            .map(|(name, value)| EnumValue::new(self.name, name, value))
    }
}

/// A selected option of an [`EnumDef`].
#[derive(Debug, Clone, Copy, Eq)]
pub struct EnumValue {
    enum_name: &'static str,
    option: &'static str,
    value: &'static str,
}

impl EnumValue {
    fn new(enum_name: &'static str, option: &'static str, value: &'static str) -> Self {
        Self {
            enum_name,
            option,
            value,
        }
    }

    pub fn enum_name(&self) -> &'static str {
        self.enum_name
    }

    pub fn option(&self) -> &'static str {
        self.option
    }

    /// The canonical string value.
    pub fn value(&self) -> &'static str {
        self.value
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.enum_name == other.enum_name && self.value == other.value
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value)
    }
}
