//! Request dispatch: application context, controllers and responses.

mod app;
mod controller;
mod response;

pub use app::App;
pub use controller::{
    ActionContext, ActionDef, ActionHandler, Controller, ControllerDef, ControllerRegistry,
};
pub use response::Response;
