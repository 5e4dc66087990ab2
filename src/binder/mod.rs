//! Binding of request parameters to action arguments.
//!
//! Each declared action parameter is satisfied, in order, by
//!
//! 1. a request value under the same key,
//! 2. its declared default,
//! 3. a freshly built model whose declared fields are filled from the
//!    request and coerced by their `@VarType`.
//!
//! A parameter none of these can satisfy fails with `BadRequest`. The
//! request values nobody consumed are appended as a final
//! [`Argument::Extra`].

mod coercion;
mod types;

use std::collections::HashSet;

use crate::annotation::AnnotationRegistry;
use crate::error::{AppError, AppResult};
use crate::model::Model;
use crate::request::{RequestParams, RequestValue};
use crate::value::Value;

pub use coercion::{coerce_each, coerce_field};
pub use types::{FieldType, TypeRegistry, ValueParser};

/// A declared action parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub default: Option<Value>,
    /// Model class to instantiate when the request has no value of that name.
    pub model: Option<String>,
}

impl ParamSpec {
    /// A parameter that must come from the request.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            model: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            model: None,
        }
    }

    /// A parameter bound to an instance of the model class `class`.
    pub fn model(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            model: Some(class.into()),
        }
    }
}

/// A bound action argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Request value matched by name.
    Raw(RequestValue),
    /// Declared default.
    Value(Value),
    Model(Model),
    /// Request values no parameter consumed.
    Extra(RequestParams),
}

impl Argument {
    pub fn into_model(self) -> Option<Model> {
        match self {
            Argument::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RequestValue> {
        match self {
            Argument::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn as_extra(&self) -> Option<&RequestParams> {
        match self {
            Argument::Extra(extra) => Some(extra),
            _ => None,
        }
    }
}

/// Binds request parameters against declared model classes and types.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    registry: &'a AnnotationRegistry,
    types: &'a TypeRegistry,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a AnnotationRegistry, types: &'a TypeRegistry) -> Self {
        Self { registry, types }
    }

    pub fn bind(&self, specs: &[ParamSpec], params: &RequestParams) -> AppResult<Vec<Argument>> {
        let mut consumed: HashSet<&str> = HashSet::new();
        let mut arguments = Vec::with_capacity(specs.len() + 1);

        for spec in specs {
            if let Some(raw) = params.get(&spec.name) {
                tracing::debug!(parameter = %spec.name, "bound from request");
                consumed.insert(spec.name.as_str());
                arguments.push(Argument::Raw(raw.clone()));
            } else if let Some(default) = &spec.default {
                arguments.push(Argument::Value(default.clone()));
            } else if let Some(class) = &spec.model {
                let model = self.fill_model(&spec.name, class, params, &mut consumed)?;
                arguments.push(Argument::Model(model));
            } else {
                return Err(AppError::bad_request(
                    &spec.name,
                    "has no request value, default or model type",
                ));
            }
        }

        let mut extra = RequestParams::new();
        for (key, value) in params.iter() {
            if !consumed.contains(key) {
                extra.insert(key, value.clone());
            }
        }
        arguments.push(Argument::Extra(extra));

        Ok(arguments)
    }

    fn fill_model<'p>(
        &self,
        parameter: &str,
        class: &str,
        params: &'p RequestParams,
        consumed: &mut HashSet<&'p str>,
    ) -> AppResult<Model> {
        let decl = self.registry.catalog().class(class).ok_or_else(|| {
            AppError::bad_request(parameter, format!("model class '{}' is not declared", class))
        })?;
        let mut model = Model::new(decl);

        for field in decl.property_names() {
            let Some((key, raw)) = params.iter().find(|(key, _)| *key == field) else {
                continue;
            };
            let descriptor = self.registry.field_descriptor(class, field);
            let value = coerce_field(field, raw, descriptor.var_type.as_ref(), self.types)?;
            tracing::debug!(class, field, value_type = value.type_name(), "model field bound");
            model.set(field, value)?;
            consumed.insert(key);
        }

        Ok(model)
    }
}
