//! Shared test utilities for bina-db tests.

use bina_core::entities::{Child, User};

use crate::service::BinaService;

/// Create an in-memory `BinaService`.
pub async fn test_service() -> BinaService {
    BinaService::new_local(":memory:").await.unwrap()
}

/// Insert a parent account with a placeholder hash.
pub async fn create_test_user(svc: &BinaService, email: &str) -> User {
    svc.create_user(email, "$argon2id$placeholder").await.unwrap()
}

/// Insert a child for `parent_id`.
pub async fn create_test_child(svc: &BinaService, parent_id: i64, name: &str) -> Child {
    svc.create_child(parent_id, name, Some(8)).await.unwrap()
}
