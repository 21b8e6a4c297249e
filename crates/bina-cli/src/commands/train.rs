use anyhow::Context;
use bina_config::BinaConfig;
use bina_scoring::RiskEngine;

use crate::cli::OutputFormat;
use crate::commands::output;

pub async fn handle(config: &BinaConfig, format: OutputFormat) -> anyhow::Result<()> {
    let engine = RiskEngine::new(config.model.clone());
    let meta = tokio::task::spawn_blocking(move || engine.retrain_synthetic())
        .await
        .context("training task panicked")?
        .context("synthetic retrain failed")?;
    output(&meta, format)
}
