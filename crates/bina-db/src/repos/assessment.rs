//! Assessment repository.
//!
//! An assessment is created together with its full item set and submitted
//! exactly once. Both mutations run in a single transaction.

use chrono::{DateTime, Utc};

use bina_core::catalog::SeedItem;
use bina_core::entities::{Assessment, AssessmentItem, ItemGrade};
use bina_core::responses::AssessmentDetail;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_bool, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::repos::child::select_child_for_parent;
use crate::service::BinaService;

fn row_to_assessment(row: &libsql::Row) -> Result<Assessment, DatabaseError> {
    Ok(Assessment {
        id: row.get::<i64>(0)?,
        child_id: row.get::<i64>(1)?,
        started_at: parse_datetime(&row.get::<String>(2)?)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        risk_score: row.get::<Option<f64>>(4)?,
        recommendation: get_opt_string(row, 5)?,
    })
}

fn row_to_item(row: &libsql::Row) -> Result<AssessmentItem, DatabaseError> {
    Ok(AssessmentItem {
        id: row.get::<i64>(0)?,
        assessment_id: row.get::<i64>(1)?,
        item_type: parse_enum(&row.get::<String>(2)?)?,
        prompt: row.get::<String>(3)?,
        answer: row.get::<Option<String>>(4)?,
        is_correct: get_opt_bool(row, 5)?,
        position: row.get::<i64>(6)?,
    })
}

const SELECT_ASSESSMENT: &str = "SELECT a.id, a.child_id, a.started_at, a.submitted_at, \
     a.risk_score, a.recommendation FROM assessments a";

async fn insert_assessment(
    conn: &libsql::Connection,
    child_id: i64,
    started_at: DateTime<Utc>,
    items: &[SeedItem],
) -> Result<(i64, Vec<AssessmentItem>), DatabaseError> {
    conn.execute(
        "INSERT INTO assessments (child_id, started_at) VALUES (?1, ?2)",
        libsql::params![child_id, started_at.to_rfc3339()],
    )
    .await?;
    let assessment_id = conn.last_insert_rowid();

    let mut created = Vec::with_capacity(items.len());
    for item in items {
        conn.execute(
            "INSERT INTO assessment_items (assessment_id, item_type, prompt, position) \
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                assessment_id,
                item.item_type.as_str(),
                item.prompt.as_str(),
                item.position
            ],
        )
        .await?;
        created.push(AssessmentItem {
            id: conn.last_insert_rowid(),
            assessment_id,
            item_type: item.item_type,
            prompt: item.prompt.clone(),
            answer: None,
            is_correct: None,
            position: item.position,
        });
    }
    Ok((assessment_id, created))
}

async fn write_submission(
    conn: &libsql::Connection,
    assessment_id: i64,
    grades: &[ItemGrade],
    submitted_at: DateTime<Utc>,
    risk_score: f64,
    recommendation: &str,
) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE assessments SET submitted_at = ?1, risk_score = ?2, recommendation = ?3 \
             WHERE id = ?4 AND submitted_at IS NULL",
            libsql::params![
                submitted_at.to_rfc3339(),
                risk_score,
                recommendation,
                assessment_id
            ],
        )
        .await?;
    if changed == 0 {
        return Err(DatabaseError::Conflict(format!(
            "assessment {assessment_id} has already been submitted"
        )));
    }

    for grade in grades {
        conn.execute(
            "UPDATE assessment_items SET answer = ?1, is_correct = ?2 \
             WHERE id = ?3 AND assessment_id = ?4",
            libsql::params![
                grade.answer.as_str(),
                i64::from(grade.is_correct),
                grade.item_id,
                assessment_id
            ],
        )
        .await?;
    }
    Ok(())
}

async fn select_assessment_for_parent(
    conn: &libsql::Connection,
    assessment_id: i64,
    parent_id: i64,
) -> Result<Assessment, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "{SELECT_ASSESSMENT} JOIN children c ON c.id = a.child_id \
                 WHERE a.id = ?1 AND c.parent_id = ?2"
            ),
            libsql::params![assessment_id, parent_id],
        )
        .await?;

    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("assessment", assessment_id))?;
    row_to_assessment(&row)
}

async fn select_items(
    conn: &libsql::Connection,
    assessment_id: i64,
) -> Result<Vec<AssessmentItem>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, assessment_id, item_type, prompt, answer, is_correct, position \
             FROM assessment_items WHERE assessment_id = ?1 ORDER BY position",
            [assessment_id],
        )
        .await?;

    let mut items = Vec::new();
    while let Some(row) = rows.next().await? {
        items.push(row_to_item(&row)?);
    }
    Ok(items)
}

impl BinaService {
    /// Create an assessment for `child_id` seeded with `items`.
    ///
    /// The caller is responsible for checking that the child belongs to the
    /// requesting user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is persisted in that case.
    pub async fn start_assessment(
        &self,
        child_id: i64,
        items: &[SeedItem],
    ) -> Result<AssessmentDetail, DatabaseError> {
        let _guard = self.lock_conn().await;
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        let (assessment_id, items) = match insert_assessment(&tx, child_id, now, items).await {
            Ok(created) => created,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        tx.commit().await?;

        tracing::debug!(assessment_id, child_id, items = items.len(), "started assessment");

        Ok(AssessmentDetail {
            assessment: Assessment {
                id: assessment_id,
                child_id,
                started_at: now,
                submitted_at: None,
                risk_score: None,
                recommendation: None,
            },
            items,
        })
    }

    /// Get an assessment only if its child belongs to `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the assessment does not exist or is
    /// owned by another user.
    pub async fn get_assessment_for_parent(
        &self,
        assessment_id: i64,
        parent_id: i64,
    ) -> Result<Assessment, DatabaseError> {
        let _guard = self.lock_conn().await;
        select_assessment_for_parent(self.db().conn(), assessment_id, parent_id).await
    }

    /// Items of an assessment in position order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_items(&self, assessment_id: i64) -> Result<Vec<AssessmentItem>, DatabaseError> {
        let _guard = self.lock_conn().await;
        select_items(self.db().conn(), assessment_id).await
    }

    /// An assessment with its items, scoped to `parent_id`. Both reads see the
    /// same committed state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the assessment is not visible to the parent.
    pub async fn get_assessment_detail(
        &self,
        assessment_id: i64,
        parent_id: i64,
    ) -> Result<AssessmentDetail, DatabaseError> {
        let _guard = self.lock_conn().await;
        let conn = self.db().conn();
        let assessment = select_assessment_for_parent(conn, assessment_id, parent_id).await?;
        let items = select_items(conn, assessment.id).await?;
        Ok(AssessmentDetail { assessment, items })
    }

    /// A child's assessment history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the child is not visible to the parent.
    pub async fn list_assessments_for_child(
        &self,
        child_id: i64,
        parent_id: i64,
    ) -> Result<Vec<Assessment>, DatabaseError> {
        let _guard = self.lock_conn().await;
        let conn = self.db().conn();
        select_child_for_parent(conn, child_id, parent_id).await?;

        let mut rows = conn
            .query(
                &format!("{SELECT_ASSESSMENT} WHERE a.child_id = ?1 ORDER BY a.id DESC"),
                [child_id],
            )
            .await?;

        let mut assessments = Vec::new();
        while let Some(row) = rows.next().await? {
            assessments.push(row_to_assessment(&row)?);
        }
        Ok(assessments)
    }

    /// Persist graded answers and the risk outcome. Write-once: the update only
    /// applies to an assessment that has not been submitted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the assessment was already submitted;
    /// nothing is changed in that case.
    pub async fn complete_assessment(
        &self,
        assessment_id: i64,
        grades: &[ItemGrade],
        risk_score: f64,
        recommendation: &str,
    ) -> Result<Assessment, DatabaseError> {
        let _guard = self.lock_conn().await;
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        if let Err(e) =
            write_submission(&tx, assessment_id, grades, now, risk_score, recommendation).await
        {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;

        tracing::debug!(assessment_id, risk_score, "submitted assessment");

        let mut rows = self
            .db()
            .conn()
            .query(&format!("{SELECT_ASSESSMENT} WHERE a.id = ?1"), [assessment_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_assessment(&row)
    }
}
