//! User repository.

use chrono::Utc;

use bina_core::entities::User;

use crate::error::DatabaseError;
use crate::helpers::{is_unique_violation, parse_datetime};
use crate::service::BinaService;

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<i64>(0)?,
        email: row.get::<String>(1)?,
        password_hash: row.get::<String>(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

const SELECT_USER: &str = "SELECT id, email, password_hash, created_at FROM users";

impl BinaService {
    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the email is already registered.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        // last_insert_rowid is per-connection
        let _guard = self.lock_conn().await;
        let now = Utc::now();
        let result = self
            .db()
            .conn()
            .execute(
                "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![email, password_hash, now.to_rfc3339()],
            )
            .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DatabaseError::Conflict(format!(
                    "email {email} is already registered"
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.db().conn().last_insert_rowid();
        tracing::debug!(user_id = id, "created user");

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    /// Look up a user by email. `Ok(None)` when no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let _guard = self.lock_conn().await;
        let mut rows = self
            .db()
            .conn()
            .query(&format!("{SELECT_USER} WHERE email = ?1"), [email])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
