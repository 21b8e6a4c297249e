//! # bina-scoring
//!
//! Everything between graded answers and a risk score:
//!
//! - [`grading`]: per-item answer comparison and per-category accuracy
//! - [`features`]: the risk feature set with documented defaults
//! - [`formula`]: deterministic fallback and adaptive formulas
//! - [`recommendation`]: risk tiers and their advice text
//! - [`nn`] + [`trainer`]: a small feed-forward network on `ndarray`
//! - [`synthetic`], [`dataset`], [`store`]: training data and artifacts on disk
//! - [`engine`]: the swappable model handle that ties it together

pub mod dataset;
pub mod engine;
pub mod error;
pub mod features;
pub mod formula;
pub mod grading;
pub mod nn;
pub mod recommendation;
pub mod store;
pub mod synthetic;
pub mod trainer;

pub use engine::{EngineStatus, Prediction, RetrainOutcome, RiskEngine};
pub use error::ScoringError;
pub use features::{LabeledSample, RiskFeatures};
pub use recommendation::RiskTier;
