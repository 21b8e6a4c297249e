//! Child profile repository.
//!
//! Every read is scoped to a parent: a child owned by someone else is
//! indistinguishable from a missing one.

use chrono::Utc;

use bina_core::entities::Child;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::BinaService;

fn row_to_child(row: &libsql::Row) -> Result<Child, DatabaseError> {
    Ok(Child {
        id: row.get::<i64>(0)?,
        parent_id: row.get::<i64>(1)?,
        name: row.get::<String>(2)?,
        age: row.get::<Option<i64>>(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Lock-free lookup for callers already holding the connection lock.
pub(crate) async fn select_child_for_parent(
    conn: &libsql::Connection,
    child_id: i64,
    parent_id: i64,
) -> Result<Child, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{SELECT_CHILD} WHERE id = ?1 AND parent_id = ?2"),
            libsql::params![child_id, parent_id],
        )
        .await?;

    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("child", child_id))?;
    row_to_child(&row)
}

const SELECT_CHILD: &str = "SELECT id, parent_id, name, age, created_at FROM children";

impl BinaService {
    /// Create a child profile under `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (including an unknown parent).
    pub async fn create_child(
        &self,
        parent_id: i64,
        name: &str,
        age: Option<i64>,
    ) -> Result<Child, DatabaseError> {
        // last_insert_rowid is per-connection
        let _guard = self.lock_conn().await;
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO children (parent_id, name, age, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![parent_id, name, age, now.to_rfc3339()],
            )
            .await?;

        let id = self.db().conn().last_insert_rowid();
        tracing::debug!(child_id = id, parent_id, "created child");

        Ok(Child {
            id,
            parent_id,
            name: name.to_string(),
            age,
            created_at: now,
        })
    }

    /// List a parent's children, oldest profile first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_children(&self, parent_id: i64) -> Result<Vec<Child>, DatabaseError> {
        let _guard = self.lock_conn().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("{SELECT_CHILD} WHERE parent_id = ?1 ORDER BY id"),
                [parent_id],
            )
            .await?;

        let mut children = Vec::new();
        while let Some(row) = rows.next().await? {
            children.push(row_to_child(&row)?);
        }
        Ok(children)
    }

    /// Get a child only if it belongs to `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the child does not exist or has a
    /// different parent.
    pub async fn get_child_for_parent(
        &self,
        child_id: i64,
        parent_id: i64,
    ) -> Result<Child, DatabaseError> {
        let _guard = self.lock_conn().await;
        select_child_for_parent(self.db().conn(), child_id, parent_id).await
    }
}
