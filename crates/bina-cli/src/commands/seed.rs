//! Demo data: one parent account with two children.

use anyhow::Context;
use bina_auth::hash_password;
use bina_db::service::BinaService;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::output;

pub const DEMO_EMAIL: &str = "demo@binakata.id";
pub const DEMO_PASSWORD: &str = "Demo123!";
pub const DEMO_CHILDREN: [(&str, i64); 2] = [("Rizki", 9), ("Siti", 7)];

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub email: String,
    pub user_created: bool,
    pub children_created: Vec<String>,
}

/// Create whatever part of the demo data is missing. Running it twice
/// creates nothing the second time.
pub async fn seed_demo(db: &BinaService) -> anyhow::Result<SeedReport> {
    let (user, user_created) = match db.get_user_by_email(DEMO_EMAIL).await? {
        Some(user) => (user, false),
        None => {
            let hash = tokio::task::spawn_blocking(|| hash_password(DEMO_PASSWORD))
                .await
                .context("password hashing task panicked")??;
            (db.create_user(DEMO_EMAIL, &hash).await?, true)
        }
    };

    let existing = db.list_children(user.id).await?;
    let mut children_created = Vec::new();
    for (name, age) in DEMO_CHILDREN {
        if existing.iter().any(|c| c.name == name) {
            continue;
        }
        db.create_child(user.id, name, Some(age)).await?;
        children_created.push(name.to_string());
    }

    Ok(SeedReport {
        email: DEMO_EMAIL.to_string(),
        user_created,
        children_created,
    })
}

pub async fn handle(config: &bina_config::BinaConfig, format: OutputFormat) -> anyhow::Result<()> {
    let db = BinaService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
    let report = seed_demo(&db).await?;
    tracing::info!(
        user_created = report.user_created,
        children = report.children_created.len(),
        "seed finished"
    );
    output(&report, format)
}
