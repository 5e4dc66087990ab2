//! Inbound request data: target, method and raw transport parameters.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::config::AppConfig;
use crate::value::Value;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "get",
            RequestMethod::Post => "post",
            RequestMethod::Put => "put",
            RequestMethod::Delete => "delete",
        }
    }
}

impl FromStr for RequestMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(RequestMethod::Get),
            "post" => Ok(RequestMethod::Post),
            "put" => Ok(RequestMethod::Put),
            "delete" => Ok(RequestMethod::Delete),
            other => Err(format!("unsupported request method '{}'", other)),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw parameter value as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestValue {
    Single(String),
    List(Vec<String>),
}

impl RequestValue {
    /// Convert to an untyped field value (strings stay strings).
    pub fn to_value(&self) -> Value {
        match self {
            RequestValue::Single(s) => Value::String(s.clone()),
            RequestValue::List(items) => {
                Value::List(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Append a value, turning a scalar into a list.
    pub fn push(&mut self, value: String) {
        match self {
            RequestValue::List(items) => items.push(value),
            RequestValue::Single(first) => {
                let first = std::mem::take(first);
                *self = RequestValue::List(vec![first, value]);
            }
        }
    }

    /// The values as a list, wrapping a scalar into a one-element list.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            RequestValue::Single(s) => vec![s.as_str()],
            RequestValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for RequestValue {
    fn from(s: &str) -> Self {
        RequestValue::Single(s.to_string())
    }
}

impl From<Vec<&str>> for RequestValue {
    fn from(items: Vec<&str>) -> Self {
        RequestValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Flat, ordered request parameters (query and body merged).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: IndexMap<String, RequestValue>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from `key=value` style pairs.
    ///
    /// Repeated keys collect into a list; a key written as `name[]` always
    /// yields a list under `name`.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.into();
            let (name, force_list) = match key.strip_suffix("[]") {
                Some(name) => (name, true),
                None => (key, false),
            };

            match params.values.get_mut(name) {
                Some(existing) => existing.push(value),
                None if force_list => {
                    params
                        .values
                        .insert(name.to_string(), RequestValue::List(vec![value]));
                }
                None => {
                    params
                        .values
                        .insert(name.to_string(), RequestValue::Single(value));
                }
            }
        }
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RequestValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RequestValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a key, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<RequestValue> {
        self.values.shift_remove(key)
    }

    /// Merge `other` into these parameters; its values win on conflicts.
    pub fn merge(&mut self, other: RequestParams) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequestValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// An inbound request to dispatch.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub controller: Option<String>,
    pub action: Option<String>,
    pub method: RequestMethod,
    pub params: RequestParams,
}

impl Request {
    pub fn new(method: RequestMethod, params: RequestParams) -> Self {
        Self {
            controller: None,
            action: None,
            method,
            params,
        }
    }

    pub fn to(mut self, controller: impl Into<String>, action: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self.action = Some(action.into());
        self
    }

    /// Controller and action to dispatch to.
    ///
    /// Both must be present to override the configured defaults.
    pub fn target(&self, config: &AppConfig) -> (String, String) {
        match (&self.controller, &self.action) {
            (Some(controller), Some(action)) => (controller.clone(), action.clone()),
            _ => (
                config.default_controller.clone(),
                config.default_action.clone(),
            ),
        }
    }
}
