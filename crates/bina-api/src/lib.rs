//! # bina-api
//!
//! axum routers for the two BinaKata HTTP surfaces:
//!
//! - the screening API (accounts, children, assessments, dashboard), which
//!   scores submissions with an in-process [`bina_scoring::RiskEngine`]
//! - the scoring service (`/predict`, `/train`, `/health`, `/`)
//!
//! Errors leave as `{"detail": "..."}` through [`error::ApiError`].

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::{api_router, cors_layer, ml_router, serve};
pub use state::{AppState, MlState};
