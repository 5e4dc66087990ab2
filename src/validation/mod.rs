//! Validator catalog: resolves `@Validator Name(args...)` values into rules.
//!
//! Rule names map to constructors through a table built once at startup.
//! Unknown names, and values that are not of the `Name(...)` form, resolve
//! to the always-passing [`ValidatorKind::Unknown`].

mod arguments;
mod message;
mod rules;


use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

pub use arguments::{coerce_argument, parse_arguments, Param};
pub use message::render_template;
pub use rules::{ValidatorKind, ValidatorRule};

lazy_static! {
    static ref RULE_CALL: Regex = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]+)\((.*)\)\s*$").unwrap();
}

/// How to build one kind of rule from its arguments.
#[derive(Clone, Copy)]
struct RuleConstructor {
    build: fn(&[Param]) -> ValidatorKind,
    /// Position of the optional custom-message argument.
    message_index: usize,
    default_message: &'static str,
}

/// Name to constructor table for validator rules.
#[derive(Clone)]
pub struct ValidatorCatalog {
    constructors: HashMap<&'static str, RuleConstructor>,
}

impl std::fmt::Debug for ValidatorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("ValidatorCatalog")
            .field("rules", &names)
            .finish()
    }
}

impl Default for ValidatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValidatorCatalog {
    /// The built-in rules: Required, Length, MinLength, Compare and Date.
    pub fn standard() -> Self {
        let mut constructors = HashMap::new();
        constructors.insert(
            "Required",
            RuleConstructor {
                build: |p| ValidatorKind::Required {
                    allow_empty: p.first().is_some_and(Param::is_truthy),
                },
                message_index: 1,
                default_message: "{0} is required",
            },
        );
        constructors.insert(
            "Length",
            RuleConstructor {
                build: |p| ValidatorKind::Length {
                    min: p.first().map_or(0, Param::as_int),
                    max: p.get(1).map_or(0, Param::as_int),
                },
                message_index: 2,
                default_message: "{0} length must be between {1} and {2}",
            },
        );
        constructors.insert(
            "MinLength",
            RuleConstructor {
                build: |p| ValidatorKind::MinLength {
                    min: p.first().map_or(0, Param::as_int),
                },
                message_index: 1,
                default_message: "{0} length must be greater than {1}",
            },
        );
        constructors.insert(
            "Compare",
            RuleConstructor {
                build: |p| ValidatorKind::Compare {
                    other: p.first().map(Param::to_string).unwrap_or_default(),
                },
                message_index: 1,
                default_message: "{0} and {1} must be identical",
            },
        );
        constructors.insert(
            "Date",
            RuleConstructor {
                build: |_| ValidatorKind::Date,
                message_index: 0,
                default_message: "{0} is not a valid date",
            },
        );
        Self { constructors }
    }

    /// Names of the known rules.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().copied()
    }

    /// Rule names match regardless of ASCII case.
    fn constructor(&self, name: &str) -> Option<&RuleConstructor> {
        self.constructors
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, constructor)| constructor)
    }

    /// Resolve an annotation value such as `Length(4, 20)` into a rule bound
    /// to `class_name::property`.
    pub fn resolve(&self, value: &str, class_name: &str, property: &str) -> ValidatorRule {
        let unknown = |name: &str, params: Vec<Param>| ValidatorRule {
            name: name.to_string(),
            kind: ValidatorKind::Unknown,
            params,
            message: String::new(),
            class_name: class_name.to_string(),
            property: property.to_string(),
        };

        let Some(caps) = RULE_CALL.captures(value) else {
            tracing::warn!(value, class_name, property, "malformed validator annotation");
            return unknown(value.trim(), Vec::new());
        };
        let name = &caps[1];
        let params = parse_arguments(&caps[2]);

        let Some(constructor) = self.constructor(name) else {
            tracing::warn!(rule = name, class_name, property, "unknown validator rule");
            return unknown(name, params);
        };

        let message = params
            .get(constructor.message_index)
            .and_then(Param::as_str)
            .unwrap_or(constructor.default_message)
            .to_string();

        ValidatorRule {
            name: name.to_string(),
            kind: (constructor.build)(&params),
            params,
            message,
            class_name: class_name.to_string(),
            property: property.to_string(),
        }
    }
}
