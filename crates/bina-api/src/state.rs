use std::sync::Arc;

use bina_auth::TokenSigner;
use bina_db::service::BinaService;
use bina_scoring::RiskEngine;

/// Shared state of the screening API.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<BinaService>,
    pub signer: Arc<TokenSigner>,
    /// Scores submissions in-process.
    pub engine: Arc<RiskEngine>,
}

impl AppState {
    #[must_use]
    pub fn new(db: BinaService, signer: TokenSigner, engine: Arc<RiskEngine>) -> Self {
        Self {
            db: Arc::new(db),
            signer: Arc::new(signer),
            engine,
        }
    }
}

/// Shared state of the scoring service.
#[derive(Clone)]
pub struct MlState {
    pub engine: Arc<RiskEngine>,
}
