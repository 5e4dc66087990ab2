//! Declared classes and functions with their documentation comments.
//!
//! This is the registration surface models and controllers use at startup,
//! in place of runtime reflection.

use indexmap::IndexMap;

use super::registry::ElementKey;

/// A declared property and its doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub doc: Option<String>,
}

/// A declared method and its doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub doc: Option<String>,
}

/// A declared free function and its doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub doc: Option<String>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Some(doc.into()),
        }
    }
}

/// A declared class: doc comment, properties in declaration order, methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub doc: Option<String>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declare a property with a doc comment.
    pub fn property(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            doc: Some(doc.into()),
        });
        self
    }

    /// Declare a property without a doc comment (no metadata, no validation).
    pub fn plain_property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            doc: None,
        });
        self
    }

    pub fn method(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.methods.push(MethodDecl {
            name: name.into(),
            doc: Some(doc.into()),
        });
        self
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }
}

/// All declared classes and functions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: IndexMap<String, ClassDecl>,
    functions: IndexMap<String, FunctionDecl>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any earlier declaration with the same name.
    pub fn register(&mut self, class: ClassDecl) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn register_function(&mut self, function: FunctionDecl) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn with_class(mut self, class: ClassDecl) -> Self {
        self.register(class);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// The doc comment of an element, if it is declared and documented.
    pub fn doc_of(&self, key: &ElementKey) -> Option<&str> {
        match key {
            ElementKey::Class(class) => self.class(class)?.doc.as_deref(),
            ElementKey::Property { class, name } => self
                .class(class)?
                .properties
                .iter()
                .find(|p| &p.name == name)?
                .doc
                .as_deref(),
            ElementKey::Method { class, name } => self
                .class(class)?
                .methods
                .iter()
                .find(|m| &m.name == name)?
                .doc
                .as_deref(),
            ElementKey::Function(name) => self.function(name)?.doc.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_of_each_element_kind() {
        let mut catalog = Catalog::new().with_class(
            ClassDecl::new("Form")
                .doc("/** class */")
                .property("name", "/** prop */")
                .plain_property("bare")
                .method("save", "/** method */"),
        );
        catalog.register_function(FunctionDecl::new("helper", "/** fn */"));

        assert_eq!(catalog.doc_of(&ElementKey::class("Form")), Some("/** class */"));
        assert_eq!(
            catalog.doc_of(&ElementKey::property("Form", "name")),
            Some("/** prop */")
        );
        assert_eq!(catalog.doc_of(&ElementKey::property("Form", "bare")), None);
        assert_eq!(
            catalog.doc_of(&ElementKey::method("Form", "save")),
            Some("/** method */")
        );
        assert_eq!(catalog.doc_of(&ElementKey::function("helper")), Some("/** fn */"));
        assert_eq!(catalog.doc_of(&ElementKey::class("Missing")), None);
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let class = ClassDecl::new("Form")
            .plain_property("b")
            .plain_property("a")
            .plain_property("c");
        assert_eq!(class.property_names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }
}
