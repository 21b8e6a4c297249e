use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ItemType;

/// One screening run for a child.
///
/// `submitted_at`, `risk_score` and `recommendation` are `None` until the
/// assessment is submitted, and are written exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub id: i64,
    pub child_id: i64,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub risk_score: Option<f64>,
    pub recommendation: Option<String>,
}

impl Assessment {
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// A single prompt within an assessment. `position` is unique per assessment
/// and defines both presentation order and positional answer mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssessmentItem {
    pub id: i64,
    pub assessment_id: i64,
    pub item_type: ItemType,
    pub prompt: String,
    pub answer: Option<String>,
    pub is_correct: Option<bool>,
    pub position: i64,
}

/// The outcome of grading one submitted answer, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemGrade {
    pub item_id: i64,
    pub answer: String,
    pub is_correct: bool,
}
