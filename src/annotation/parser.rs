//! Doc-comment scanner.

use lazy_static::lazy_static;
use regex::Regex;

use crate::validation::ValidatorCatalog;

use super::{Annotation, AnnotationKind, Annotations, VarType};

lazy_static! {
    static ref TAG_LINE: Regex =
        Regex::new(r"(?im)^[ \t]*\*?[ \t]*@([a-z_][a-z0-9_]+)(?:[ \t]+(.*?))?[ \t]*$").unwrap();
}

/// The element a doc comment belongs to.
///
/// Validator rules remember their class and property so they can read the
/// field value and render display names later.
#[derive(Debug, Clone, Copy)]
pub struct DocOwner<'a> {
    pub class: &'a str,
    pub member: &'a str,
}

impl<'a> DocOwner<'a> {
    pub fn new(class: &'a str, member: &'a str) -> Self {
        Self { class, member }
    }
}

/// Parse a `/** ... */` comment into annotations grouped by tag.
///
/// Comments missing either delimiter yield no annotations. Lines that do
/// not carry an `@Tag value` are ignored.
pub fn parse_doc_comment(
    doc: &str,
    owner: DocOwner<'_>,
    validators: &ValidatorCatalog,
) -> Annotations {
    let mut annotations = Annotations::new();

    let doc = doc.trim();
    if doc.len() < 5 || !doc.starts_with("/**") || !doc.ends_with("*/") {
        return annotations;
    }
    let body = doc[3..doc.len() - 2].replace("\r\n", "\n").replace('\r', "\n");

    for caps in TAG_LINE.captures_iter(&body) {
        let tag = &caps[1];
        let value = caps.get(2).map_or("", |m| m.as_str()).trim();

        let kind = match tag {
            "Validator" => {
                AnnotationKind::Validator(validators.resolve(value, owner.class, owner.member))
            }
            "DisplayName" => AnnotationKind::DisplayName,
            "DisplayText" => AnnotationKind::DisplayText,
            "VarType" => AnnotationKind::VarType(VarType::parse(value)),
            "Attribute" => {
                let (name, attr_value) = value.split_once('=').unwrap_or((value, ""));
                AnnotationKind::Attribute {
                    name: name.trim().to_string(),
                    value: attr_value.trim().to_string(),
                }
            }
            _ => AnnotationKind::Unknown,
        };

        annotations.push(Annotation {
            tag: tag.to_string(),
            value: value.to_string(),
            kind,
        });
    }

    annotations
}
