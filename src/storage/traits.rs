use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ApplicationRecord, Decision, LoanApplication};

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("application {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl StorageError {
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Storage trait for evaluated applications.
///
/// Records are append-only: there is no update, delete or listing.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist an application and its decision.
    ///
    /// The store assigns `id` (strictly increasing) and `created_at` (UTC).
    async fn create(
        &self,
        application: &LoanApplication,
        decision: &Decision,
    ) -> Result<ApplicationRecord, StorageError>;

    /// Fetch a record by id, or `StorageError::NotFound`.
    async fn get(&self, id: i64) -> Result<ApplicationRecord, StorageError>;
}
