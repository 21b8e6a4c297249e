//! Repository modules implementing the queries for all BinaKata entities.
//!
//! Each module adds methods to `BinaService` via `impl BinaService` blocks.

pub mod assessment;
pub mod child;
pub mod dashboard;
pub mod user;
