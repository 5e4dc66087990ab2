//! Error types for dispatch, binding and the framework boundaries.
//!
//! Validation failures are not errors: they are recorded on the model and
//! never surface here.

use thiserror::Error;

/// Errors that abort a request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {controller}/{action}")]
    NotFound { controller: String, action: String },

    #[error("Bad Request: parameter '{parameter}' {reason}")]
    BadRequest { parameter: String, reason: String },

    #[error("'{option}' is undefined in '{enum_name}' enum")]
    EnumParse { enum_name: String, option: String },

    #[error("Undefined property '{property}' in '{class}'")]
    UndefinedProperty { class: String, property: String },

    #[error("DB connection error: {message} - (dsn: {dsn} & username: {username})")]
    DbConnection {
        message: String,
        dsn: String,
        username: String,
    },

    #[error("View error: {0}")]
    View(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn not_found(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::NotFound {
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn bad_request(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadRequest {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn enum_parse(enum_name: impl Into<String>, option: impl Into<String>) -> Self {
        Self::EnumParse {
            enum_name: enum_name.into(),
            option: option.into(),
        }
    }

    pub fn undefined_property(class: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UndefinedProperty {
            class: class.into(),
            property: property.into(),
        }
    }

    pub fn db_connection(
        message: impl Into<String>,
        dsn: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self::DbConnection {
            message: message.into(),
            dsn: dsn.into(),
            username: username.into(),
        }
    }

    pub fn view(message: impl Into<String>) -> Self {
        Self::View(message.into())
    }

    /// Numeric code written to the diagnostic log.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::BadRequest { .. } => 400,
            Self::EnumParse { .. } => 103,
            Self::UndefinedProperty { .. } => 101,
            Self::DbConnection { .. } => 100,
            Self::View(_) => 102,
            Self::Config(_) => 104,
            Self::Io(_) => 1,
        }
    }

    /// HTTP status of the generic failure response for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::BadRequest { .. } | Self::EnumParse { .. } => 400,
            _ => 500,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
