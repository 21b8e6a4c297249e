//! Service layer wrapping the database handle.
//!
//! `BinaService` owns a `BinaDb` plus a connection lock. All repo methods are
//! implemented as `impl BinaService` blocks in `repos/`.

use tokio::sync::{Mutex, MutexGuard};

use crate::BinaDb;
use crate::error::DatabaseError;

/// Orchestrates database reads and mutations.
///
/// One connection is shared by every request, so an open transaction is
/// visible to any statement issued on it. Every public repo method holds the
/// connection lock for its whole duration, reads included.
///
/// Multi-statement mutations follow this protocol:
/// 1. Acquire the connection lock
/// 2. Begin transaction
/// 3. Execute SQL
/// 4. Commit, or roll back on the first error
pub struct BinaService {
    db: BinaDb,
    conn_lock: Mutex<()>,
}

impl BinaService {
    /// Create a new service over a local database file (or `":memory:"`).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = BinaDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    #[must_use]
    pub fn from_db(db: BinaDb) -> Self {
        Self {
            db,
            conn_lock: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &BinaDb {
        &self.db
    }

    /// Serialize access to the shared connection. Not reentrant: repo methods
    /// take it once and call lock-free helpers for nested queries.
    pub(crate) async fn lock_conn(&self) -> MutexGuard<'_, ()> {
        self.conn_lock.lock().await
    }
}
