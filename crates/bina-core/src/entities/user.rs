use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parent or guardian account. Owns zero or more children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
