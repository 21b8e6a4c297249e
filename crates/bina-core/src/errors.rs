//! Cross-cutting error types for BinaKata.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `ScoringError`) live in
//! their respective crates. `ApiError` in `bina-api` is where they converge.

use thiserror::Error;

/// Errors that can be raised by any BinaKata crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
