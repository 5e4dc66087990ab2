//! Database connection settings and the lazily created handle.
//!
//! The framework does not define a query layer. A [`Database`] describes the
//! configured connection so that host code can open it with the driver of
//! its choice.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub name: String,
    pub username: String,
    pub password: String,
    /// `driver:key=value;key=value`
    pub dsn: String,
}

impl DbConfig {
    /// Default settings for a MySQL database called `name`.
    pub fn for_database(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            dsn: format!("mysql:dbname={};host=localhost;charset=utf8", name),
            name,
            username: "db_username".to_string(),
            password: "db_password".to_string(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::for_database("db_name")
    }
}

/// A validated database connection description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    driver: String,
    params: IndexMap<String, String>,
    username: String,
}

impl Database {
    /// Validate the configured DSN and build a handle from it.
    pub fn connect(config: &DbConfig) -> AppResult<Self> {
        let fail = |message: &str| AppError::db_connection(message, &config.dsn, &config.username);

        let (driver, rest) = config
            .dsn
            .split_once(':')
            .ok_or_else(|| fail("missing driver prefix"))?;
        let driver = driver.trim();
        if driver.is_empty() || !driver.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(fail("invalid driver name"));
        }

        let mut params = IndexMap::new();
        for segment in rest.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| fail(&format!("malformed segment '{}'", segment)))?;
            params.insert(key.trim().to_string(), value.trim().to_string());
        }

        tracing::info!(driver, username = %config.username, "database handle created");
        Ok(Self {
            driver: driver.to_string(),
            params,
            username: config.username.clone(),
        })
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
