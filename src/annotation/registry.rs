//! Memoizing lookup of element annotations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::validation::ValidatorCatalog;

use super::catalog::Catalog;
use super::descriptor::FieldDescriptor;
use super::parser::{parse_doc_comment, DocOwner};
use super::Annotations;

/// Identifies an annotated element. The element kind is part of the key, so
/// a class and a function sharing a name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Class(String),
    Property { class: String, name: String },
    Method { class: String, name: String },
    Function(String),
}

impl ElementKey {
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn property(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Property {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn method(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Method {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Class and member names used to bind validator rules.
    fn owner(&self) -> DocOwner<'_> {
        match self {
            ElementKey::Class(class) => DocOwner::new(class, ""),
            ElementKey::Property { class, name } | ElementKey::Method { class, name } => {
                DocOwner::new(class, name)
            }
            ElementKey::Function(name) => DocOwner::new("", name),
        }
    }
}

/// Parses each declared element's doc comment at most once and hands out
/// shared results. Entries are never evicted: the catalog is fixed once the
/// application has started.
#[derive(Debug)]
pub struct AnnotationRegistry {
    catalog: Catalog,
    validators: ValidatorCatalog,
    cache: RwLock<HashMap<ElementKey, Arc<Annotations>>>,
    parses: AtomicUsize,
}

impl AnnotationRegistry {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_validators(catalog, ValidatorCatalog::standard())
    }

    pub fn with_validators(catalog: Catalog, validators: ValidatorCatalog) -> Self {
        Self {
            catalog,
            validators,
            cache: RwLock::new(HashMap::new()),
            parses: AtomicUsize::new(0),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn validators(&self) -> &ValidatorCatalog {
        &self.validators
    }

    pub fn of_class(&self, class: &str) -> Arc<Annotations> {
        self.lookup(ElementKey::class(class))
    }

    pub fn of_property(&self, class: &str, property: &str) -> Arc<Annotations> {
        self.lookup(ElementKey::property(class, property))
    }

    pub fn of_method(&self, class: &str, method: &str) -> Arc<Annotations> {
        self.lookup(ElementKey::method(class, method))
    }

    pub fn of_function(&self, function: &str) -> Arc<Annotations> {
        self.lookup(ElementKey::function(function))
    }

    /// Number of doc comments parsed so far.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    pub fn lookup(&self, key: ElementKey) -> Arc<Annotations> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = cache.get(&key) {
                return Arc::clone(found);
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have parsed it while we waited for the lock.
        if let Some(found) = cache.get(&key) {
            return Arc::clone(found);
        }

        tracing::debug!(?key, "parsing annotations");
        let annotations = match self.catalog.doc_of(&key) {
            Some(doc) => parse_doc_comment(doc, key.owner(), &self.validators),
            None => Annotations::new(),
        };
        self.parses.fetch_add(1, Ordering::Relaxed);

        let annotations = Arc::new(annotations);
        cache.insert(key, Arc::clone(&annotations));
        annotations
    }

    /// Structured metadata of one property.
    pub fn field_descriptor(&self, class: &str, property: &str) -> FieldDescriptor {
        FieldDescriptor::from_annotations(property, &self.of_property(class, property))
    }

    /// The `@DisplayName` of a property, or the property name itself.
    pub fn display_name(&self, class: &str, property: &str) -> String {
        self.of_property(class, property)
            .first("DisplayName")
            .map(|a| a.value.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| property.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ClassDecl, FunctionDecl};
    use pretty_assertions::assert_eq;

    fn registry() -> AnnotationRegistry {
        let mut catalog = Catalog::new().with_class(
            ClassDecl::new("LoginForm")
                .doc("/** @DisplayText Sign in */")
                .property(
                    "username",
                    "/**\n * @Validator Required()\n * @DisplayName Username\n */",
                )
                .plain_property("remember")
                .method("submit", "/** @Attribute method=post */"),
        );
        catalog.register_function(FunctionDecl::new("LoginForm", "/** @DisplayText helper */"));
        AnnotationRegistry::new(catalog)
    }

    #[test]
    fn test_lookup_is_idempotent_and_parses_once() {
        let registry = registry();
        let before = registry.parse_count();

        let first = registry.of_property("LoginForm", "username");
        let second = registry.of_property("LoginForm", "username");

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            first.tags().collect::<Vec<_>>(),
            vec!["Validator", "DisplayName"]
        );
        assert_eq!(registry.parse_count(), before + 1);
    }

    #[test]
    fn test_element_kinds_do_not_collide() {
        let registry = registry();
        let class = registry.of_class("LoginForm");
        let function = registry.of_function("LoginForm");

        assert_eq!(class.first("DisplayText").unwrap().value, "Sign in");
        assert_eq!(function.first("DisplayText").unwrap().value, "helper");
        assert_eq!(registry.parse_count(), 2);
    }

    #[test]
    fn test_method_annotations() {
        let registry = registry();
        let method = registry.of_method("LoginForm", "submit");
        assert_eq!(method.first("Attribute").unwrap().value, "method=post");
    }

    #[test]
    fn test_unknown_elements_are_cached_empty() {
        let registry = registry();
        assert!(registry.of_property("LoginForm", "missing").is_empty());
        assert!(registry.of_property("LoginForm", "missing").is_empty());
        assert!(registry.of_property("LoginForm", "remember").is_empty());
        assert_eq!(registry.parse_count(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_property_name() {
        let registry = registry();
        assert_eq!(registry.display_name("LoginForm", "username"), "Username");
        assert_eq!(registry.display_name("LoginForm", "remember"), "remember");
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.of_property("LoginForm", "username").len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(registry.parse_count(), 1);
    }
}
