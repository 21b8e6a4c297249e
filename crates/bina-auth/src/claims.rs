use bina_config::AuthConfig;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Access token claims. `sub` is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}

/// Issues and verifies HS256 access tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl: TimeDelta) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            TimeDelta::minutes(config.token_ttl_minutes),
        )
    }

    /// Issue a token for `subject` with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issue a token with an explicit lifetime. A negative `ttl` produces an
    /// already-expired token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue_with_ttl(&self, subject: &str, ttl: TimeDelta) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Verify signature and expiry and return the claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` on any signature, expiry or format error.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected access token");
                AuthError::InvalidToken
            })
    }

    /// Fail-closed subject extraction: `None` for any invalid token.
    #[must_use]
    pub fn decode_subject(&self, token: &str) -> Option<String> {
        self.decode(token)
            .ok()
            .map(|claims| claims.sub)
            .filter(|sub| !sub.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", TimeDelta::hours(24))
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let signer = signer();
        let token = signer.issue("ibu@binakata.id").unwrap();
        assert_eq!(
            signer.decode_subject(&token).as_deref(),
            Some("ibu@binakata.id")
        );
    }

    #[test]
    fn default_lifetime_is_a_day() {
        let signer = TokenSigner::from_config(&AuthConfig::default());
        let claims = signer.decode(&signer.issue("a@b.c").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn expired_token_has_no_subject() {
        let signer = signer();
        let token = signer
            .issue_with_ttl("a@b.c", TimeDelta::hours(-1))
            .unwrap();
        assert_eq!(signer.decode_subject(&token), None);
        assert!(matches!(signer.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn wrong_secret_has_no_subject() {
        let token = signer().issue("a@b.c").unwrap();
        let other = TokenSigner::new("other-secret", TimeDelta::hours(1));
        assert_eq!(other.decode_subject(&token), None);
    }

    #[test]
    fn garbage_has_no_subject() {
        assert_eq!(signer().decode_subject("not.a.jwt"), None);
        assert_eq!(signer().decode_subject(""), None);
    }
}
