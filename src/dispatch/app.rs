//! The application context and request dispatch.

use std::sync::OnceLock;

use crate::annotation::{AnnotationRegistry, Catalog};
use crate::binder::{Binder, TypeRegistry};
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::AppResult;
use crate::error_log::ErrorLog;
use crate::request::Request;
use crate::view::{Renderer, SummaryRenderer};

use super::controller::{ActionContext, Controller, ControllerRegistry};
use super::response::Response;

/// Everything a request needs: configuration, metadata, controllers and
/// the shared resources created on first use.
pub struct App {
    config: AppConfig,
    registry: AnnotationRegistry,
    types: TypeRegistry,
    controllers: ControllerRegistry,
    renderer: Box<dyn Renderer>,
    error_log: ErrorLog,
    db: OnceLock<Database>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("controllers", &self.controllers)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(
        config: AppConfig,
        catalog: Catalog,
        types: TypeRegistry,
        controllers: ControllerRegistry,
    ) -> Self {
        let error_log = ErrorLog::new(config.error_log_path.clone());
        Self {
            config,
            registry: AnnotationRegistry::new(catalog),
            types,
            controllers,
            renderer: Box::new(SummaryRenderer),
            error_log,
            db: OnceLock::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// The database handle, connected on first use.
    pub fn db(&self) -> AppResult<&Database> {
        if let Some(db) = self.db.get() {
            return Ok(db);
        }
        let db = Database::connect(&self.config.db)?;
        Ok(self.db.get_or_init(|| db))
    }

    /// Resolve, bind and invoke the action `request` targets.
    pub fn run(&self, request: &Request) -> AppResult<Response> {
        let (controller_name, action_name) = request.target(&self.config);
        let action = self.controllers.resolve(&controller_name, &action_name)?;

        let arguments = Binder::new(&self.registry, &self.types).bind(&action.params, &request.params)?;
        tracing::debug!(
            controller = %controller_name,
            action = %action_name,
            arguments = arguments.len(),
            "dispatching"
        );

        let mut controller = Controller::new(controller_name);
        let mut ctx = ActionContext {
            app: self,
            request,
            controller: &mut controller,
        };
        action.invoke(&mut ctx, arguments)
    }

    /// Run `request`, turning failures into logged generic responses.
    pub fn handle(&self, request: &Request) -> Response {
        match self.run(request) {
            Ok(response) => response,
            Err(err) => {
                let (controller, action) = request.target(&self.config);
                let origin = format!("{}::{}", controller, action);
                tracing::error!(%origin, code = err.code(), "{}", err);
                if let Err(log_err) = self.error_log.write(&err, &origin) {
                    tracing::error!(
                        path = %self.error_log.path().display(),
                        "could not write error log: {}",
                        log_err
                    );
                }
                Response::failure(err.status())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::ClassDecl;
    use crate::binder::{Argument, ParamSpec};
    use crate::dispatch::ControllerDef;
    use crate::error::AppError;
    use crate::request::{RequestMethod, RequestParams};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let config = AppConfig {
            root_dir: dir.path().to_path_buf(),
            error_log_path: dir.path().join("error.log"),
            ..AppConfig::default()
        };
        let catalog = Catalog::new().with_class(
            ClassDecl::new("Search")
                .property("q", "/** @Validator Required() */")
                .property("page", "/** @VarType int */"),
        );
        let controllers = ControllerRegistry::new().with(
            ControllerDef::new("Index")
                .action("Index", vec![], |ctx, _| {
                    ctx.controller.set_title("Home");
                    ctx.render("index", None)
                })
                .action("About", vec![], |ctx, _| {
                    ctx.controller.set_title("About");
                    ctx.controller.set_author("Staff");
                    ctx.controller.add_script("app.js");
                    ctx.controller.add_script("app.js");
                    ctx.controller.add_style("site.css");
                    ctx.controller.set("year", 2024i64);
                    ctx.render("about", None)
                })
                .action(
                    "Search",
                    vec![ParamSpec::model("form", "Search")],
                    |ctx, args| {
                        let mut form = args
                            .into_iter()
                            .next()
                            .and_then(Argument::into_model)
                            .ok_or_else(|| AppError::bad_request("form", "is not a model"))?;
                        let valid = form.is_valid(ctx.registry());
                        ctx.controller.set("valid", valid);
                        ctx.render("search", Some(form))
                    },
                ),
        );
        App::new(config, catalog, TypeRegistry::new(), controllers)
    }

    fn get(pairs: &[(&str, &str)]) -> Request {
        Request::new(
            RequestMethod::Get,
            RequestParams::from_pairs(pairs.iter().copied()),
        )
    }

    #[test]
    fn test_defaults_to_index_index() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir).handle(&get(&[]));
        assert_eq!(response, Response::ok("view: index\ntitle: Home\n"));
    }

    #[test]
    fn test_page_metadata_reaches_renderer() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir).handle(&get(&[]).to("Index", "About"));
        assert_eq!(
            response.body,
            "view: about\ntitle: About\nauthor: Staff\nscript: app.js\nstyle: site.css\nyear: 2024\n"
        );
    }

    #[test]
    fn test_binds_and_renders_model() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir).handle(&get(&[("q", "rust"), ("page", "2")]).to("Index", "Search"));
        assert_eq!(
            response.body,
            "view: search\nvalid: 1\nmodel: Search\n  q = rust\n  page = 2\n"
        );
    }

    #[test]
    fn test_not_found_is_logged() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let response = app.handle(&get(&[]).to("Admin", "Index"));

        assert_eq!(response, Response::failure(404));
        let lines = app.error_log().read().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Not Found: Admin/Index in Admin::Index [error_code: 404]"));
    }

    #[test]
    fn test_bad_value_is_a_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let response = app.handle(&get(&[("page", "two")]).to("Index", "Search"));

        assert_eq!(response.status, 400);
        let lines = app.error_log().read().unwrap();
        assert!(lines[0].contains("[error_code: 400]"));
    }

    #[test]
    fn test_db_is_created_once() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let first = app.db().unwrap() as *const Database;
        let second = app.db().unwrap() as *const Database;
        assert_eq!(first, second);
    }
}
