//! Response shapes assembled by the repository layer and returned as JSON by the API.

use serde::{Deserialize, Serialize};

use crate::entities::{Assessment, AssessmentItem};

/// Aggregate over every assessment of every child of one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_assessments: i64,
    /// Mean risk over submitted assessments. `None` when nothing has been scored.
    pub average_risk: Option<f64>,
}

impl DashboardSummary {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_assessments: 0,
            average_risk: None,
        }
    }
}

/// An assessment together with its items in position order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub items: Vec<AssessmentItem>,
}
