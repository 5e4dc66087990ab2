//! Application configuration.
//!
//! Values come from the process environment (optionally seeded from `.env`
//! files) or from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::DbConfig;
use crate::error::{AppError, AppResult};

/// Configuration shared by the whole application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application root directory.
    pub root_dir: PathBuf,
    /// Where dispatch failures are appended.
    pub error_log_path: PathBuf,
    pub db: DbConfig,
    /// Controller used when a request does not name one.
    pub default_controller: String,
    /// Action used when a request does not name one.
    pub default_action: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let root_dir = PathBuf::from(".");
        Self {
            error_log_path: root_dir.join("error.log"),
            root_dir,
            db: DbConfig::default(),
            default_controller: "Index".to_string(),
            default_action: "Index".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// Recognized keys: `FORMWORK_ROOT`, `FORMWORK_ERROR_LOG`,
    /// `FORMWORK_DEFAULT_CONTROLLER`, `FORMWORK_DEFAULT_ACTION`,
    /// `FORMWORK_DB_NAME`, `FORMWORK_DB_USERNAME`, `FORMWORK_DB_PASSWORD` and
    /// `FORMWORK_DB_DSN`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let root_dir = lookup("FORMWORK_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.root_dir);
        let error_log_path = lookup("FORMWORK_ERROR_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| root_dir.join("error.log"));

        let mut db = DbConfig::default();
        if let Some(name) = lookup("FORMWORK_DB_NAME") {
            db = DbConfig::for_database(name);
        }
        if let Some(username) = lookup("FORMWORK_DB_USERNAME") {
            db.username = username;
        }
        if let Some(password) = lookup("FORMWORK_DB_PASSWORD") {
            db.password = password;
        }
        if let Some(dsn) = lookup("FORMWORK_DB_DSN") {
            db.dsn = dsn;
        }

        Self {
            root_dir,
            error_log_path,
            db,
            default_controller: lookup("FORMWORK_DEFAULT_CONTROLLER")
                .unwrap_or(defaults.default_controller),
            default_action: lookup("FORMWORK_DEFAULT_ACTION").unwrap_or(defaults.default_action),
        }
    }

    /// Read the configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Seed the process environment from `folder/.env`, then from
/// `folder/.env.$APP_ENV` when `APP_ENV` is set. Variables already in the
/// environment win over `.env`; the `APP_ENV` file wins over both.
pub fn load_env_files(folder: &Path) {
    load_env_file(folder, ".env", false);

    if let Ok(app_env) = std::env::var("APP_ENV") {
        load_env_file(folder, &format!(".env.{}", app_env), true);
    }
}

/// Export the `KEY=value` pairs of `folder/filename`. A missing file is
/// skipped.
pub fn load_env_file(folder: &Path, filename: &str, override_existing: bool) {
    let env_file = folder.join(filename);
    let Ok(content) = std::fs::read_to_string(&env_file) else {
        return;
    };

    for (key, value) in parse_env(&content) {
        if override_existing || std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
    tracing::debug!(file = %env_file.display(), "loaded environment file");
}

/// Parse `KEY=value` lines, skipping blanks and `#` comments.
fn parse_env(content: &str) -> Vec<(&str, &str)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim(),
                value.trim().trim_matches('"').trim_matches('\''),
            )
        })
        .collect()
}
