use axum::Json;
use axum::extract::State;
use bina_auth::{AuthError, hash_password, verify_password};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

fn validate(creds: &Credentials) -> ApiResult<&str> {
    let email = creds.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if creds.password.is_empty() {
        return Err(ApiError::bad_request("Password must not be empty"));
    }
    Ok(email)
}

pub async fn register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<Json<TokenResponse>> {
    let email = validate(&creds)?.to_string();

    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }
    let password = creds.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
    let user = state.db.create_user(&email, &hash).await?;
    tracing::info!(user_id = user.id, "registered user");

    Ok(Json(TokenResponse::bearer(state.signer.issue(&user.email)?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<Json<TokenResponse>> {
    let email = creds.email.trim();
    let user = state
        .db
        .get_user_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let password = creds.password;
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?;
    if !verified {
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(Json(TokenResponse::bearer(state.signer.issue(&user.email)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_must_have_both_parts() {
        assert!(validate(&creds("ibu@binakata.id", "x")).is_ok());
        assert_eq!(validate(&creds("  ibu@binakata.id ", "x")).unwrap(), "ibu@binakata.id");
        assert!(validate(&creds("ibu", "x")).is_err());
        assert!(validate(&creds("@binakata.id", "x")).is_err());
        assert!(validate(&creds("ibu@", "x")).is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(validate(&creds("ibu@binakata.id", "")).is_err());
    }
}
