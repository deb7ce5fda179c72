use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::PreferenceStore,
    error::AppResult,
    models::{NewPreference, PreferenceRecord},
};

/// Process-local preference store
///
/// Used by tests and for running the service without a database.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    records: RwLock<Vec<PreferenceRecord>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, keeping their ids and timestamps
    pub fn with_records(records: Vec<PreferenceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn fetch_all(&self) -> AppResult<Vec<PreferenceRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, preference: NewPreference) -> AppResult<PreferenceRecord> {
        let record = PreferenceRecord {
            id: Uuid::new_v4(),
            name: preference.name,
            selections: preference.selections,
            timestamp: Utc::now(),
        };

        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.timestamp >= since).count() as u64)
    }
}
