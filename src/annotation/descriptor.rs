use indexmap::IndexMap;

use crate::validation::ValidatorRule;

use super::{AnnotationKind, Annotations, VarType};

/// Structured metadata of a single model field, derived from its annotations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDescriptor {
    pub name: String,
    pub display_name: Option<String>,
    pub display_text: Option<String>,
    pub var_type: Option<VarType>,
    /// `@Attribute key=value` pairs; later declarations win.
    pub attributes: IndexMap<String, String>,
    pub validators: Vec<ValidatorRule>,
}

impl FieldDescriptor {
    pub fn from_annotations(name: &str, annotations: &Annotations) -> Self {
        let mut descriptor = Self {
            name: name.to_string(),
            ..Self::default()
        };

        for (_, group) in annotations.iter() {
            for annotation in group {
                match &annotation.kind {
                    AnnotationKind::DisplayName if descriptor.display_name.is_none() => {
                        descriptor.display_name = Some(annotation.value.clone());
                    }
                    AnnotationKind::DisplayText if descriptor.display_text.is_none() => {
                        descriptor.display_text = Some(annotation.value.clone());
                    }
                    AnnotationKind::VarType(var_type) if descriptor.var_type.is_none() => {
                        descriptor.var_type = Some(var_type.clone());
                    }
                    AnnotationKind::Attribute { name, value } => {
                        descriptor.attributes.insert(name.clone(), value.clone());
                    }
                    AnnotationKind::Validator(rule) => descriptor.validators.push(rule.clone()),
                    _ => {}
                }
            }
        }

        descriptor
    }

    /// Display name, or the field name when none is declared.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{parse_doc_comment, DocOwner};
    use crate::validation::ValidatorCatalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_from_full_docblock() {
        let doc = "/**
         * @Validator Required()
         * @Validator Length(6, 32)
         * @DisplayName Password
         * @DisplayText At least six characters
         * @Attribute type=password
         * @Attribute autocomplete=off
         * @VarType string
         */";
        let annotations = parse_doc_comment(
            doc,
            DocOwner::new("RegisterForm", "password"),
            &ValidatorCatalog::standard(),
        );
        let descriptor = FieldDescriptor::from_annotations("password", &annotations);

        assert_eq!(descriptor.label(), "Password");
        assert_eq!(
            descriptor.display_text.as_deref(),
            Some("At least six characters")
        );
        assert_eq!(descriptor.var_type.unwrap().type_name, "string");
        assert_eq!(
            descriptor.attributes.keys().collect::<Vec<_>>(),
            vec!["type", "autocomplete"]
        );
        let names: Vec<_> = descriptor.validators.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Required", "Length"]);
    }

    #[test]
    fn test_label_defaults_to_name() {
        let descriptor = FieldDescriptor::from_annotations("agree", &Annotations::new());
        assert_eq!(descriptor.label(), "agree");
        assert!(descriptor.validators.is_empty());
    }
}
