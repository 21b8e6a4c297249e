//! Dashboard aggregate queries.

use bina_core::responses::DashboardSummary;

use crate::error::DatabaseError;
use crate::service::BinaService;

impl BinaService {
    /// Count every assessment across the parent's children and average the
    /// scored ones. A parent with no children gets [`DashboardSummary::empty`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn dashboard_summary(&self, parent_id: i64) -> Result<DashboardSummary, DatabaseError> {
        let _guard = self.lock_conn().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(a.id), AVG(a.risk_score) \
                 FROM children c LEFT JOIN assessments a ON a.child_id = c.id \
                 WHERE c.parent_id = ?1",
                [parent_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(DashboardSummary::empty());
        };
        Ok(DashboardSummary {
            total_assessments: row.get::<i64>(0)?,
            average_risk: row.get::<Option<f64>>(1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bina_core::catalog::screening_items;
    use bina_core::responses::DashboardSummary;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::test_support::{create_test_child, create_test_user, test_service};

    #[tokio::test]
    async fn no_children_is_empty_summary() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "ibu@binakata.id").await;
        assert_eq!(
            svc.dashboard_summary(user.id).await.unwrap(),
            DashboardSummary::empty()
        );
    }

    #[tokio::test]
    async fn children_without_assessments_count_zero() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "ibu@binakata.id").await;
        create_test_child(&svc, user.id, "Rizki").await;

        let summary = svc.dashboard_summary(user.id).await.unwrap();
        assert_eq!(summary.total_assessments, 0);
        assert_eq!(summary.average_risk, None);
    }

    #[tokio::test]
    async fn averages_only_scored_assessments() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "ibu@binakata.id").await;
        let other = create_test_user(&svc, "ayah@binakata.id").await;
        let rizki = create_test_child(&svc, user.id, "Rizki").await;
        let siti = create_test_child(&svc, user.id, "Siti").await;
        let budi = create_test_child(&svc, other.id, "Budi").await;

        let items = screening_items();
        let a1 = svc.start_assessment(rizki.id, &items).await.unwrap();
        let a2 = svc.start_assessment(siti.id, &items).await.unwrap();
        svc.start_assessment(siti.id, &items).await.unwrap();
        let foreign = svc.start_assessment(budi.id, &items).await.unwrap();

        svc.complete_assessment(a1.assessment.id, &[], 0.2, "low")
            .await
            .unwrap();
        svc.complete_assessment(a2.assessment.id, &[], 0.6, "medium")
            .await
            .unwrap();
        svc.complete_assessment(foreign.assessment.id, &[], 1.0, "high")
            .await
            .unwrap();

        let summary = svc.dashboard_summary(user.id).await.unwrap();
        assert_eq!(summary.total_assessments, 3);
        let avg = summary.average_risk.unwrap();
        assert!((avg - 0.4).abs() < 1e-9, "average was {avg}");
    }

    #[tokio::test]
    async fn summary_waits_for_open_transaction() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "ibu@binakata.id").await;
        let child = create_test_child(&svc, user.id, "Rizki").await;

        let guard = svc.lock_conn().await;
        let tx = svc.db().conn().transaction().await.unwrap();
        tx.execute(
            "INSERT INTO assessments (child_id, started_at) VALUES (?1, ?2)",
            libsql::params![child.id, Utc::now().to_rfc3339()],
        )
        .await
        .unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), svc.dashboard_summary(user.id)).await;
        assert!(blocked.is_err(), "read should wait for the open transaction");

        tx.rollback().await.unwrap();
        drop(guard);

        let summary = svc.dashboard_summary(user.id).await.unwrap();
        assert_eq!(summary.total_assessments, 0);
    }
}
