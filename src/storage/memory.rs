use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::domain::{ApplicationRecord, Decision, LoanApplication};

use super::traits::{Storage, StorageError};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<i64, ApplicationRecord>,
}

/// In-process storage, used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for assertions).
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create(
        &self,
        application: &LoanApplication,
        decision: &Decision,
    ) -> Result<ApplicationRecord, StorageError> {
        let mut inner = self.inner.lock();

        inner.last_id += 1;
        let id = inner.last_id;
        let record = ApplicationRecord::new(id, application, decision, Utc::now().trunc_subsecs(6));
        inner.records.insert(id, record.clone());

        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<ApplicationRecord, StorageError> {
        self.inner
            .lock()
            .records
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }
}
