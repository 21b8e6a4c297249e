//! # bina-core
//!
//! Core types shared across all BinaKata crates:
//! - Entity structs for users, children, assessments and assessment items
//! - Item type and model variant enums
//! - The fixed screening item catalog seeded into every new assessment
//! - Cross-cutting error types
//! - API response shapes produced by the repository layer

pub mod catalog;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
