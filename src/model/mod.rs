//! Model instances: declared fields, their values and error slots.

use indexmap::IndexMap;

use crate::annotation::{AnnotationRegistry, ClassDecl};
use crate::error::{AppError, AppResult};
use crate::value::Value;

static NULL: Value = Value::Null;

/// A bound entity. Every declared field has exactly one value and one
/// error slot; an empty slot means the field is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    class_name: String,
    values: IndexMap<String, Value>,
    errors: IndexMap<String, String>,
}

impl Model {
    /// Create an instance with every declared field `Null` and no errors.
    pub fn new(class: &ClassDecl) -> Self {
        let values = class
            .property_names()
            .map(|name| (name.to_string(), Value::Null))
            .collect();
        let errors = class
            .property_names()
            .map(|name| (name.to_string(), String::new()))
            .collect();
        Self {
            class_name: class.name.clone(),
            values,
            errors,
        }
    }

    /// Look up `class` in the registry's catalog and instantiate it.
    pub fn of_class(registry: &AnnotationRegistry, class: &str) -> Option<Self> {
        registry.catalog().class(class).map(Self::new)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get(&self, field: &str) -> AppResult<&Value> {
        self.values
            .get(field)
            .ok_or_else(|| AppError::undefined_property(&self.class_name, field))
    }

    /// Current value of `field`; `Null` for unknown fields.
    pub fn value(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> AppResult<()> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(AppError::undefined_property(&self.class_name, field)),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Error message of `field`; empty when valid or unknown.
    pub fn get_error(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    /// Record an error computed outside the declared validators.
    pub fn set_error(&mut self, field: &str, message: impl Into<String>) -> AppResult<()> {
        match self.errors.get_mut(field) {
            Some(slot) => {
                *slot = message.into();
                Ok(())
            }
            None => Err(AppError::undefined_property(&self.class_name, field)),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|e| !e.is_empty())
    }

    /// Run every field's validators in declaration order.
    ///
    /// Each field's slot is reset, then receives the message of its first
    /// failing rule. Returns true when all fields pass.
    pub fn is_valid(&mut self, registry: &AnnotationRegistry) -> bool {
        let mut valid = true;
        let fields: Vec<String> = self.values.keys().cloned().collect();

        for field in fields {
            let annotations = registry.of_property(&self.class_name, &field);
            let model: &Model = self;
            let failure = annotations
                .validators()
                .find(|rule| !rule.validate(model))
                .map(|rule| rule.error_message(registry));

            if let Some(message) = &failure {
                tracing::debug!(class = %self.class_name, field = %field, %message, "validation failed");
                valid = false;
            }
            if let Some(slot) = self.errors.get_mut(&field) {
                *slot = failure.unwrap_or_default();
            }
        }

        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Catalog;
    use pretty_assertions::assert_eq;

    fn user_class() -> ClassDecl {
        ClassDecl::new("UserForm")
            .property(
                "username",
                "/**\n * @Validator Required()\n * @Validator Length(4, 20)\n */",
            )
            .property(
                "email",
                "/**\n * @Validator Required(false, \"{0} cannot be blank\")\n * @DisplayName E-mail\n */",
            )
            .plain_property("note")
    }

    fn registry() -> AnnotationRegistry {
        AnnotationRegistry::new(Catalog::new().with_class(user_class()))
    }

    #[test]
    fn test_new_model_has_null_fields_and_empty_slots() {
        let model = Model::new(&user_class());
        assert_eq!(
            model.field_names().collect::<Vec<_>>(),
            vec!["username", "email", "note"]
        );
        assert!(model.fields().values().all(Value::is_null));
        assert!(model.errors().values().all(String::is_empty));
        assert!(!model.has_errors());
    }

    #[test]
    fn test_unknown_fields() {
        let mut model = Model::new(&user_class());
        assert!(matches!(
            model.set("missing", "x"),
            Err(AppError::UndefinedProperty { .. })
        ));
        assert!(model.get("missing").is_err());
        assert!(model.set_error("missing", "boom").is_err());
        assert_eq!(model.get_error("missing"), "");
        assert_eq!(model.value("missing"), &Value::Null);
    }

    #[test]
    fn test_first_failure_per_field_is_recorded() {
        let registry = registry();
        let mut model = Model::new(&user_class());
        model.set("username", "").unwrap();

        assert!(!model.is_valid(&registry));
        assert_eq!(model.get_error("username"), "username is required");
        assert_eq!(model.get_error("email"), "E-mail cannot be blank");
        assert_eq!(model.get_error("note"), "");
    }

    #[test]
    fn test_revalidation_resets_slots() {
        let registry = registry();
        let mut model = Model::new(&user_class());
        assert!(!model.is_valid(&registry));

        model.set("username", "alice").unwrap();
        model.set("email", "alice@example.com").unwrap();
        assert!(model.is_valid(&registry));
        assert!(!model.has_errors());
    }

    #[test]
    fn test_set_error_is_overwritten_by_validation() {
        let registry = registry();
        let mut model = Model::new(&user_class());
        model.set("username", "alice").unwrap();
        model.set("email", "alice@example.com").unwrap();
        model.set_error("username", "already taken").unwrap();
        assert_eq!(model.get_error("username"), "already taken");

        assert!(model.is_valid(&registry));
        assert_eq!(model.get_error("username"), "");
    }

    #[test]
    fn test_of_class() {
        let registry = registry();
        assert!(Model::of_class(&registry, "UserForm").is_some());
        assert!(Model::of_class(&registry, "Nope").is_none());
    }
}
