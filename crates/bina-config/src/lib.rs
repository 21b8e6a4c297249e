//! # bina-config
//!
//! Layered configuration loading for BinaKata using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BINAKATA_*` prefix, `__` as separator)
//! 2. Project-level `./binakata.toml`
//! 3. User-level `~/.config/binakata/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BINAKATA_AUTH__JWT_SECRET` -> `auth.jwt_secret`,
//! `BINAKATA_MODEL__DIR` -> `model.dir`, etc. Lists are written inline:
//! `BINAKATA_SERVER__CORS_ORIGINS='["https://app.example"]'`.
//!
//! # Usage
//!
//! ```no_run
//! use bina_config::BinaConfig;
//!
//! let config = BinaConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod auth;
mod database;
mod error;
mod model;
mod server;

pub use auth::{AuthConfig, DEFAULT_JWT_SECRET};
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use model::{AdaptiveWeights, ModelConfig};
pub use server::{MlServerConfig, ServerConfig, allows_any_origin};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "binakata.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BinaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ml_server: MlServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl BinaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("BINAKATA_").split("__"))
    }

    /// Reject values that would make the services misbehave at runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(invalid("auth.jwt_secret", "must not be empty"));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(invalid("auth.token_ttl_minutes", "must be positive"));
        }
        if self.model.epochs == 0 {
            return Err(invalid("model.epochs", "must be at least 1"));
        }
        if self.model.batch_size == 0 {
            return Err(invalid("model.batch_size", "must be at least 1"));
        }
        if self.model.min_retrain_samples == 0 {
            return Err(invalid("model.min_retrain_samples", "must be at least 1"));
        }
        if let Some(weights) = &self.model.adaptive_weights {
            if let Some(field) = weights.first_invalid() {
                return Err(invalid(
                    &format!("model.adaptive_weights.{field}"),
                    "must be a finite, non-negative number",
                ));
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("binakata").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
