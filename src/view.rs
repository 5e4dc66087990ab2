//! Views and the rendering boundary.
//!
//! Template syntax is not defined here: a [`Renderer`] receives the view
//! (name, model, view bag) and a [`ViewHelper`] for field metadata.

use std::fmt::Write as _;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::annotation::AnnotationRegistry;
use crate::datetime::format_date;
use crate::error::{AppError, AppResult};
use crate::model::Model;
use crate::value::Value;

lazy_static! {
    static ref VIEW_NAME: Regex = Regex::new(r"(?i)^[a-z\d]+$").unwrap();
}

/// Free-form named values handed to a view.
pub type ViewBag = IndexMap<String, Value>;

/// Page metadata set by the controller while an action runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
}

/// A named view with its optional model, page metadata and bag.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    name: String,
    model: Option<Model>,
    page: PageMeta,
    bag: ViewBag,
}

impl View {
    /// Create a view. Names are ASCII letters and digits only.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        if !VIEW_NAME.is_match(&name) {
            return Err(AppError::view(format!("'{}' is invalid view name.", name)));
        }
        Ok(Self {
            name,
            model: None,
            page: PageMeta::default(),
            bag: ViewBag::new(),
        })
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_page(mut self, page: PageMeta) -> Self {
        self.page = page;
        self
    }

    pub fn with_bag(mut self, bag: ViewBag) -> Self {
        self.bag = bag;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn page(&self) -> &PageMeta {
        &self.page
    }

    pub fn bag(&self) -> &ViewBag {
        &self.bag
    }

    pub fn bag_mut(&mut self) -> &mut ViewBag {
        &mut self.bag
    }
}

/// Turns a view into output text.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &View, helper: &ViewHelper<'_>) -> AppResult<String>;
}

/// Field-level accessors for templates. Output is HTML-escaped unless
/// noted otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ViewHelper<'a> {
    registry: &'a AnnotationRegistry,
    model: Option<&'a Model>,
}

impl<'a> ViewHelper<'a> {
    pub fn new(registry: &'a AnnotationRegistry, model: Option<&'a Model>) -> Self {
        Self { registry, model }
    }

    pub fn model(&self) -> Option<&'a Model> {
        self.model
    }

    fn class_name(&self) -> &'a str {
        self.model.map(Model::class_name).unwrap_or("")
    }

    /// The field value as text: dates as `YYYY-MM-DD`, lists comma-joined.
    pub fn display(&self, field: &str) -> String {
        let Some(model) = self.model else {
            return String::new();
        };
        html_escape(&display_value(model.value(field)))
    }

    pub fn display_name(&self, field: &str) -> String {
        html_escape(&self.registry.display_name(self.class_name(), field))
    }

    /// The `@DisplayText` of a field, or empty.
    pub fn display_text(&self, field: &str) -> String {
        self.registry
            .of_property(self.class_name(), field)
            .first("DisplayText")
            .map(|a| html_escape(&a.value))
            .unwrap_or_default()
    }

    /// The recorded validation error of a field (not escaped).
    pub fn validation_message(&self, field: &str) -> &'a str {
        self.model.map(|m| m.get_error(field)).unwrap_or("")
    }

    /// Declared `@Attribute`s of a field, in declaration order.
    pub fn attributes(&self, field: &str) -> IndexMap<String, String> {
        self.registry
            .field_descriptor(self.class_name(), field)
            .attributes
    }

    /// `<label for="field">Display Name:</label>`
    pub fn label_for(&self, field: &str) -> String {
        let text = format!("{}:", self.registry.display_name(self.class_name(), field));
        label(&text, field)
    }
}

/// A `<label>` tag.
pub fn label(text: &str, for_field: &str) -> String {
    format!(
        "<label for=\"{}\">{}</label>",
        html_escape(for_field),
        html_escape(text)
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Date(date) => format_date(date),
        Value::List(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_display_string(),
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Plain-text renderer listing the view's page metadata, bag, fields and
/// errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryRenderer;

impl Renderer for SummaryRenderer {
    fn render(&self, view: &View, helper: &ViewHelper<'_>) -> AppResult<String> {
        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| AppError::view(e.to_string());

        writeln!(out, "view: {}", view.name()).map_err(fmt_err)?;

        let page = view.page();
        if let Some(title) = &page.title {
            writeln!(out, "title: {}", title).map_err(fmt_err)?;
        }
        if !page.keywords.is_empty() {
            writeln!(out, "keywords: {}", page.keywords.join(", ")).map_err(fmt_err)?;
        }
        if let Some(author) = &page.author {
            writeln!(out, "author: {}", author).map_err(fmt_err)?;
        }
        if let Some(description) = &page.description {
            writeln!(out, "description: {}", description).map_err(fmt_err)?;
        }
        for script in &page.scripts {
            writeln!(out, "script: {}", script).map_err(fmt_err)?;
        }
        for style in &page.styles {
            writeln!(out, "style: {}", style).map_err(fmt_err)?;
        }

        for (key, value) in view.bag() {
            writeln!(out, "{}: {}", key, value).map_err(fmt_err)?;
        }

        if let Some(model) = view.model() {
            writeln!(out, "model: {}", model.class_name()).map_err(fmt_err)?;
            for field in model.field_names() {
                write!(
                    out,
                    "  {} = {}",
                    helper.display_name(field),
                    helper.display(field)
                )
                .map_err(fmt_err)?;
                let message = helper.validation_message(field);
                if !message.is_empty() {
                    write!(out, "  [{}]", message).map_err(fmt_err)?;
                }
                writeln!(out).map_err(fmt_err)?;
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Catalog, ClassDecl};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn registry() -> AnnotationRegistry {
        AnnotationRegistry::new(
            Catalog::new().with_class(
                ClassDecl::new("LoginForm")
                    .property(
                        "username",
                        "/**\n * @DisplayName User <name>\n * @DisplayText Your login\n */",
                    )
                    .property(
                        "password",
                        "/**\n * @Attribute type=password\n * @Attribute placeholder\n */",
                    )
                    .plain_property("since"),
            ),
        )
    }

    fn model(registry: &AnnotationRegistry) -> Model {
        let mut model = Model::of_class(registry, "LoginForm").unwrap();
        model.set("username", "a&b").unwrap();
        model
            .set(
                "since",
                Value::List(vec![
                    Value::Date(
                        NaiveDate::from_ymd_opt(2024, 1, 5)
                            .unwrap()
                            .and_hms_opt(8, 30, 0)
                            .unwrap(),
                    ),
                    Value::from("x"),
                ]),
            )
            .unwrap();
        model.set_error("password", "Password is required").unwrap();
        model
    }

    #[test]
    fn test_summary_renderer_page_metadata() {
        let registry = registry();
        let view = View::new("home").unwrap().with_page(PageMeta {
            title: Some("Home".to_string()),
            keywords: vec!["a".to_string(), "b".to_string()],
            author: Some("Staff".to_string()),
            description: None,
            scripts: vec!["app.js".to_string()],
            styles: vec!["site.css".to_string()],
        });
        let helper = ViewHelper::new(&registry, None);

        assert_eq!(
            SummaryRenderer.render(&view, &helper).unwrap(),
            "view: home\ntitle: Home\nkeywords: a, b\nauthor: Staff\nscript: app.js\nstyle: site.css\n"
        );
    }

    #[test]
    fn test_view_name_validation() {
        assert!(View::new("register").is_ok());
        assert!(View::new("Index2").is_ok());
        assert!(matches!(View::new("../etc"), Err(AppError::View(_))));
        assert!(View::new("").is_err());
    }

    #[test]
    fn test_helper_accessors() {
        let registry = registry();
        let model = model(&registry);
        let helper = ViewHelper::new(&registry, Some(&model));

        assert_eq!(helper.display("username"), "a&amp;b");
        assert_eq!(helper.display("since"), "2024-01-05, x");
        assert_eq!(helper.display_name("username"), "User &lt;name&gt;");
        assert_eq!(helper.display_name("since"), "since");
        assert_eq!(helper.display_text("username"), "Your login");
        assert_eq!(helper.display_text("password"), "");
        assert_eq!(helper.validation_message("password"), "Password is required");

        let attributes = helper.attributes("password");
        assert_eq!(attributes.get("type").map(String::as_str), Some("password"));
        assert_eq!(attributes.get("placeholder").map(String::as_str), Some(""));

        assert_eq!(
            helper.label_for("password"),
            "<label for=\"password\">password:</label>"
        );
    }

    #[test]
    fn test_summary_renderer() {
        let registry = registry();
        let view = View::new("login")
            .unwrap()
            .with_model(model(&registry))
            .with_bag(ViewBag::from([("title".to_string(), Value::from("Login"))]));
        let helper = ViewHelper::new(&registry, view.model());

        let out = SummaryRenderer.render(&view, &helper).unwrap();
        assert_eq!(
            out,
            "view: login\n\
             title: Login\n\
             model: LoginForm\n  \
             User &lt;name&gt; = a&amp;b\n  \
             password =   [Password is required]\n  \
             since = 2024-01-05, x\n"
        );
    }
}
