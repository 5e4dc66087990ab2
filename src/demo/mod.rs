//! A small application built on the framework: login and registration
//! forms served by the `Index` controller.

mod controllers;
pub mod enums;
pub mod forms;

use crate::annotation::Catalog;
use crate::binder::TypeRegistry;
use crate::config::AppConfig;
use crate::dispatch::{App, ControllerRegistry};

pub use enums::{GENDER, LANGUAGE};

/// Declared form classes.
pub fn catalog() -> Catalog {
    Catalog::new()
        .with_class(forms::login_form())
        .with_class(forms::register_form())
}

/// Enums the forms refer to.
pub fn types() -> TypeRegistry {
    TypeRegistry::new()
        .with_enum(&GENDER)
        .with_enum(&LANGUAGE)
}

pub fn controllers() -> ControllerRegistry {
    ControllerRegistry::new().with(controllers::index())
}

pub fn app(config: AppConfig) -> App {
    App::new(config, catalog(), types(), controllers())
}
