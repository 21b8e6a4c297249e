//! HTTP listener configuration for the backend API and the ML service.

use serde::{Deserialize, Serialize};

fn default_api_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_api_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_ml_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_ml_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Backend API listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_bind")]
    pub bind: String,

    /// Allowed cross-origin hosts. `"*"` allows any origin.
    #[serde(default = "default_api_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_api_bind(),
            cors_origins: default_api_cors_origins(),
        }
    }
}

/// ML scoring service listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MlServerConfig {
    #[serde(default = "default_ml_bind")]
    pub bind: String,

    #[serde(default = "default_ml_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for MlServerConfig {
    fn default() -> Self {
        Self {
            bind: default_ml_bind(),
            cors_origins: default_ml_cors_origins(),
        }
    }
}

/// Whether an origin list means "any origin".
#[must_use]
pub fn allows_any_origin(origins: &[String]) -> bool {
    origins.iter().any(|o| o == "*")
}
