//! In-memory stakeholder store.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use foodmap_common::{ImportAction, ImportRow, TenantId};

use crate::store::{
    records_from_rows, StakeholderRecord, StakeholderStore, StorageError, StorageResult,
};

/// Keeps records in a vector. Used for local runs without a database and in
/// tests; can be set to fail every write.
#[derive(Default)]
pub struct MemoryStakeholderStore {
    records: Mutex<Vec<StakeholderRecord>>,
    failure: Option<String>,
    calls: Mutex<usize>,
}

impl MemoryStakeholderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `insert_bulk` fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub async fn records(&self) -> Vec<StakeholderRecord> {
        self.records.lock().await.clone()
    }

    /// Number of `insert_bulk` calls received, including failed ones.
    pub async fn call_count(&self) -> usize {
        *self.calls.lock().await
    }
}

#[async_trait]
impl StakeholderStore for MemoryStakeholderStore {
    async fn insert_bulk(
        &self,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> StorageResult<usize> {
        *self.calls.lock().await += 1;

        if let Some(reason) = &self.failure {
            return Err(StorageError::Unavailable(reason.clone()));
        }

        let batch = records_from_rows(rows, tenant_id)?;
        let mut records = self.records.lock().await;

        // Validate the whole batch against existing keys before touching the
        // vector so a failed insert leaves it unchanged.
        if action == ImportAction::Insert {
            for (i, record) in batch.iter().enumerate() {
                let duplicate = records
                    .iter()
                    .chain(batch[..i].iter())
                    .any(|r| r.natural_key() == record.natural_key());
                if duplicate {
                    return Err(StorageError::Query(format!(
                        "duplicate stakeholder '{}' for tenant {}",
                        record.name, tenant_id
                    )));
                }
            }
        }

        for record in &batch {
            match records.iter_mut().find(|r| r.natural_key() == record.natural_key()) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
        }

        debug!(count = batch.len(), tenant_id, "Stored batch in memory");
        Ok(batch.len())
    }
}
