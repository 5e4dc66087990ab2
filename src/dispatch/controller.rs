//! Controllers, their actions, and the per-request action context.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::annotation::AnnotationRegistry;
use crate::binder::{Argument, ParamSpec};
use crate::error::{AppError, AppResult};
use crate::model::Model;
use crate::request::Request;
use crate::value::Value;
use crate::view::{PageMeta, View, ViewBag, ViewHelper};

use super::app::App;
use super::response::Response;

/// Per-request controller state: page metadata and view bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controller {
    name: String,
    page: PageMeta,
    bag: ViewBag,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> &PageMeta {
        &self.page
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.page.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.page.title.as_deref()
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        self.page.keywords.push(keyword.into());
    }

    pub fn keywords(&self) -> &[String] {
        &self.page.keywords
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.page.author = Some(author.into());
    }

    pub fn author(&self) -> Option<&str> {
        self.page.author.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.page.description = Some(description.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.page.description.as_deref()
    }

    /// Add a script once; repeats are ignored.
    pub fn add_script(&mut self, script: impl Into<String>) {
        let script = script.into();
        if !self.page.scripts.contains(&script) {
            self.page.scripts.push(script);
        }
    }

    pub fn scripts(&self) -> &[String] {
        &self.page.scripts
    }

    /// Add a stylesheet once; repeats are ignored.
    pub fn add_style(&mut self, style: impl Into<String>) {
        let style = style.into();
        if !self.page.styles.contains(&style) {
            self.page.styles.push(style);
        }
    }

    pub fn styles(&self) -> &[String] {
        &self.page.styles
    }

    pub fn bag(&self) -> &ViewBag {
        &self.bag
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.bag.insert(key.into(), value.into());
    }
}

pub type ActionHandler =
    Arc<dyn Fn(&mut ActionContext<'_>, Vec<Argument>) -> AppResult<Response> + Send + Sync>;

/// A controller action: declared parameters and the function to invoke.
#[derive(Clone)]
pub struct ActionDef {
    pub name: String,
    pub params: Vec<ParamSpec>,
    handler: ActionHandler,
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ActionDef {
    pub fn invoke(&self, ctx: &mut ActionContext<'_>, args: Vec<Argument>) -> AppResult<Response> {
        (self.handler)(ctx, args)
    }
}

/// A controller's actions, in declaration order.
#[derive(Debug, Clone)]
pub struct ControllerDef {
    pub name: String,
    actions: IndexMap<String, ActionDef>,
}

impl ControllerDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: IndexMap::new(),
        }
    }

    pub fn action<F>(mut self, name: impl Into<String>, params: Vec<ParamSpec>, handler: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, Vec<Argument>) -> AppResult<Response> + Send + Sync + 'static,
    {
        let name = name.into();
        self.actions.insert(
            name.clone(),
            ActionDef {
                name,
                params,
                handler: Arc::new(handler),
            },
        );
        self
    }

    pub fn get(&self, action: &str) -> Option<&ActionDef> {
        self.actions.get(action)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// Controllers by name.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    controllers: IndexMap<String, ControllerDef>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: ControllerDef) {
        self.controllers.insert(controller.name.clone(), controller);
    }

    pub fn with(mut self, controller: ControllerDef) -> Self {
        self.register(controller);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ControllerDef> {
        self.controllers.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ControllerDef> {
        self.controllers.values()
    }

    /// Resolve an action. Names are case-sensitive.
    pub fn resolve(&self, controller: &str, action: &str) -> AppResult<&ActionDef> {
        self.get(controller)
            .and_then(|c| c.get(action))
            .ok_or_else(|| AppError::not_found(controller, action))
    }
}

/// What an action handler sees while it runs.
pub struct ActionContext<'a> {
    pub app: &'a App,
    pub request: &'a Request,
    pub controller: &'a mut Controller,
}

impl<'a> ActionContext<'a> {
    pub fn registry(&self) -> &'a AnnotationRegistry {
        self.app.registry()
    }

    /// Render `view_name` with `model`. The controller's page metadata
    /// and bag are copied into the view.
    pub fn render(&self, view_name: &str, model: Option<Model>) -> AppResult<Response> {
        let mut view = View::new(view_name)?
            .with_page(self.controller.page().clone())
            .with_bag(self.controller.bag().clone());
        if let Some(model) = model {
            view = view.with_model(model);
        }

        let helper = ViewHelper::new(self.app.registry(), view.model());
        let body = self.app.renderer().render(&view, &helper)?;
        Ok(Response::ok(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripts_and_styles_are_deduplicated() {
        let mut controller = Controller::new("Index");
        controller.add_script("app.js");
        controller.add_script("app.js");
        controller.add_script("vendor.js");
        controller.add_style("site.css");
        controller.add_style("site.css");

        assert_eq!(controller.scripts(), ["app.js", "vendor.js"]);
        assert_eq!(controller.styles(), ["site.css"]);
    }

    #[test]
    fn test_page_metadata() {
        let mut controller = Controller::new("Index");
        assert_eq!(controller.title(), None);
        controller.set_title("Register");
        controller.set_author("Staff");
        controller.set_description("Sign up");
        controller.add_keyword("signup");
        controller.add_keyword("signup");

        assert_eq!(controller.title(), Some("Register"));
        assert_eq!(controller.author(), Some("Staff"));
        assert_eq!(controller.description(), Some("Sign up"));
        assert_eq!(controller.keywords().len(), 2);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = ControllerRegistry::new().with(ControllerDef::new("Index").action(
            "Index",
            vec![],
            |_, _| Ok(Response::ok("")),
        ));

        assert!(registry.resolve("Index", "Index").is_ok());
        assert!(matches!(
            registry.resolve("index", "Index"),
            Err(AppError::NotFound { .. })
        ));
        assert!(registry.resolve("Index", "Missing").is_err());
    }
}
