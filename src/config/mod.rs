//! Process settings, read once at startup.
//!
//! Sources, later wins: a `.env` file if one exists, then the process
//! environment. Keys are `TODO_API__<SECTION>__<FIELD>`, e.g.
//! `TODO_API__SERVER__PORT=8080` sets `server.port`.

mod database;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// All settings. Only `database.url` has no default.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Read settings from `.env` and `TODO_API__*` variables.
    ///
    /// Fails when the database url is absent or a value does not parse
    /// into its field type. Call [`AppConfig::validate`] afterwards.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }

        let source = config::Environment::default()
            .prefix("TODO_API")
            .prefix_separator("__")
            .separator("__");

        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    /// Semantic checks the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
