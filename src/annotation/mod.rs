//! Annotations extracted from documentation comments.
//!
//! A doc comment such as
//!
//! ```text
//! /**
//!  * @Validator Required()
//!  * @Validator Length(4, 20)
//!  * @DisplayName Username
//!  */
//! ```
//!
//! parses into annotations grouped by tag, in declaration order. Elements
//! and their doc comments are declared up front in a [`Catalog`]; the
//! [`AnnotationRegistry`] parses each element once and caches the result.

mod catalog;
mod descriptor;
mod parser;
mod registry;

use indexmap::IndexMap;

use crate::validation::ValidatorRule;

pub use catalog::{Catalog, ClassDecl, FunctionDecl, MethodDecl, PropertyDecl};
pub use descriptor::FieldDescriptor;
pub use parser::{parse_doc_comment, DocOwner};
pub use registry::{AnnotationRegistry, ElementKey};

/// Declared type of a property (`@VarType Language[]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarType {
    /// Type name without namespace qualifiers or the `[]` suffix.
    pub type_name: String,
    /// Whether the property holds a list of `type_name`.
    pub is_list: bool,
}

impl VarType {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (raw, is_list) = match raw.strip_suffix("[]") {
            Some(inner) => (inner.trim_end(), true),
            None => (raw, false),
        };
        let type_name = raw
            .rsplit(|c: char| c == '\\' || c == ':')
            .next()
            .unwrap_or(raw)
            .to_string();
        Self { type_name, is_list }
    }
}

/// Tag-specific content of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    DisplayName,
    DisplayText,
    Attribute { name: String, value: String },
    VarType(VarType),
    Validator(ValidatorRule),
    /// Any tag without a dedicated meaning.
    Unknown,
}

/// A single parsed annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The tag (what follows the `@`).
    pub tag: String,
    /// The raw value (what follows the tag).
    pub value: String,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn validator(&self) -> Option<&ValidatorRule> {
        match &self.kind {
            AnnotationKind::Validator(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Annotations of one element, grouped by tag in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    groups: IndexMap<String, Vec<Annotation>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, annotation: Annotation) {
        self.groups
            .entry(annotation.tag.clone())
            .or_default()
            .push(annotation);
    }

    /// All annotations with `tag`, in declaration order.
    pub fn get(&self, tag: &str) -> &[Annotation] {
        self.groups.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, tag: &str) -> Option<&Annotation> {
        self.get(tag).first()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.groups.contains_key(tag)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Annotation])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Validator rules in declaration order.
    pub fn validators(&self) -> impl Iterator<Item = &ValidatorRule> {
        self.get("Validator").iter().filter_map(Annotation::validator)
    }
}
