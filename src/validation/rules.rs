//! Built-in validation rules and their predicates.

use crate::annotation::AnnotationRegistry;
use crate::datetime::parse_date;
use crate::model::Model;
use crate::value::Value;

use super::arguments::Param;
use super::message::render_template;

/// The closed set of validator kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorKind {
    /// A value must be present; lists must be non-empty.
    Required { allow_empty: bool },
    /// Character length between `min` and `max`, inclusive.
    Length { min: i64, max: i64 },
    /// Character length of at least `min`.
    MinLength { min: i64 },
    /// Strictly equal to the sibling field `other`.
    Compare { other: String },
    /// A date value or a string that parses as a valid calendar date.
    Date,
    /// Fallback for unknown rule names; always passes.
    Unknown,
}

impl ValidatorKind {
    /// Check `value`, the current value of the annotated field on `model`.
    pub fn check(&self, value: &Value, model: &Model) -> bool {
        match self {
            ValidatorKind::Required { allow_empty } => match value {
                Value::List(items) => !items.is_empty(),
                Value::Null => false,
                Value::String(s) if s.is_empty() => *allow_empty,
                _ => true,
            },
            ValidatorKind::Length { min, max } => {
                let len = value.char_len() as i64;
                *min <= len && len <= *max
            }
            ValidatorKind::MinLength { min } => *min <= value.char_len() as i64,
            ValidatorKind::Compare { other } => value == model.value(other),
            ValidatorKind::Date => match value {
                Value::Date(_) => true,
                Value::Null => false,
                Value::String(s) => parse_date(s).is_some(),
                other => parse_date(&other.to_display_string()).is_some(),
            },
            ValidatorKind::Unknown => true,
        }
    }
}

/// A validator attached to a model property.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorRule {
    /// Rule name as written in the annotation.
    pub name: String,
    pub kind: ValidatorKind,
    /// Constructor arguments as written, after coercion.
    pub params: Vec<Param>,
    /// Message template with `{n}` placeholders.
    pub message: String,
    pub class_name: String,
    pub property: String,
}

impl ValidatorRule {
    /// Evaluate the rule against the current value of its property.
    pub fn validate(&self, model: &Model) -> bool {
        self.kind.check(model.value(&self.property), model)
    }

    /// Render the error message.
    ///
    /// `{0}` is the display name of the annotated property and `{1}`.. are the
    /// rule arguments. `Compare` shows the compared property's display name
    /// in place of its raw name.
    pub fn error_message(&self, registry: &AnnotationRegistry) -> String {
        let mut args = Vec::with_capacity(self.params.len() + 1);
        args.push(registry.display_name(&self.class_name, &self.property));
        args.extend(self.params.iter().map(Param::to_string));

        if let ValidatorKind::Compare { other } = &self.kind {
            if args.len() > 1 {
                args[1] = registry.display_name(&self.class_name, other);
            }
        }

        render_template(&self.message, &args).into_owned()
    }
}
