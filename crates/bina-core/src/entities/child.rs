use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A child profile. Belongs to exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Child {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub created_at: DateTime<Utc>,
}
