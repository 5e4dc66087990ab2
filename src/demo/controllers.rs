use crate::binder::{Argument, ParamSpec};
use crate::dispatch::{ActionContext, ControllerDef, Response};
use crate::error::{AppError, AppResult};
use crate::model::Model;
use crate::request::RequestMethod;

/// `Index` controller: the login and registration forms.
pub fn index() -> ControllerDef {
    ControllerDef::new("Index")
        .action(
            "Index",
            vec![ParamSpec::model("form", "LoginForm")],
            |ctx, args| form_action(ctx, args, "Login", "form"),
        )
        .action(
            "Register",
            vec![ParamSpec::model("form", "RegisterForm")],
            |ctx, args| form_action(ctx, args, "Register", "register"),
        )
}

/// Posted valid forms answer `valid.`; anything else renders the form.
fn form_action(
    ctx: &mut ActionContext<'_>,
    args: Vec<Argument>,
    title: &str,
    view: &str,
) -> AppResult<Response> {
    let mut form = take_model(args)?;
    ctx.controller.set_title(title);

    if ctx.request.method == RequestMethod::Post && form.is_valid(ctx.registry()) {
        return Ok(Response::ok("valid."));
    }
    ctx.render(view, Some(form))
}

fn take_model(args: Vec<Argument>) -> AppResult<Model> {
    args.into_iter()
        .next()
        .and_then(Argument::into_model)
        .ok_or_else(|| AppError::bad_request("form", "must be bound to a form model"))
}
