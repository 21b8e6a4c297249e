//! Token signing configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped as the default. `is_default_secret()` lets the
/// binary warn when it is still in use.
pub const DEFAULT_JWT_SECRET: &str = "change_me";

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

/// Default token lifetime: 24 hours.
const fn default_token_ttl_minutes() -> i64 {
    60 * 24
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HS256 signing secret.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Lifetime of issued access tokens, in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn is_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuthConfig::default();
        assert!(config.is_default_secret());
        assert_eq!(config.token_ttl_minutes, 1440);
    }
}
