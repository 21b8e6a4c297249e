use std::sync::Arc;

use anyhow::Context;
use bina_api::{AppState, MlState, api_router, ml_router, serve};
use bina_auth::TokenSigner;
use bina_config::BinaConfig;
use bina_db::service::BinaService;
use bina_scoring::RiskEngine;

use crate::cli::ServeArgs;

pub async fn handle_api(args: &ServeArgs, config: &BinaConfig) -> anyhow::Result<()> {
    if config.auth.is_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set BINAKATA_AUTH__JWT_SECRET");
    }

    let db = BinaService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
    let signer = TokenSigner::from_config(&config.auth);
    let engine = Arc::new(RiskEngine::new(config.model.clone()));
    let state = AppState::new(db, signer, engine);

    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let router = api_router(state, &config.server.cors_origins);
    serve(bind, router, "api")
        .await
        .with_context(|| format!("api server on {bind} failed"))
}

pub async fn handle_ml(args: &ServeArgs, config: &BinaConfig) -> anyhow::Result<()> {
    let engine = Arc::new(RiskEngine::new(config.model.clone()));

    // Load or cold-start the model before accepting requests.
    let warm = Arc::clone(&engine);
    let loaded = tokio::task::spawn_blocking(move || warm.ensure_model().is_some())
        .await
        .context("model warm-up task panicked")?;
    if loaded {
        tracing::info!(variant = %engine.variant(), "risk model ready");
    } else {
        tracing::info!("serving rule-based risk scores");
    }

    let bind = args.bind.as_deref().unwrap_or(&config.ml_server.bind);
    let router = ml_router(MlState { engine }, &config.ml_server.cors_origins);
    serve(bind, router, "ml")
        .await
        .with_context(|| format!("ml server on {bind} failed"))
}
