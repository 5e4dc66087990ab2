//! formwork: a small MVC core with annotation-driven model binding and
//! validation.
//!
//! Models declare their fields with documentation comments:
//!
//! ```text
//! /**
//!  * @Validator Required()
//!  * @Validator Length(4, 20)
//!  * @DisplayName Username
//!  */
//! ```
//!
//! The [`annotation`] registry parses these once, the [`binder`] fills
//! models from request parameters, [`model::Model::is_valid`] runs the
//! declared validators, and [`dispatch::App`] ties it all together.

// Allow some clippy lints that are stylistic and not critical
#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]
#![allow(clippy::new_without_default)]

pub mod annotation;
pub mod binder;
pub mod config;
pub mod datetime;
pub mod db;
pub mod demo;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod error_log;
pub mod model;
pub mod request;
pub mod validation;
pub mod value;
pub mod view;
