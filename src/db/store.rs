use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{NewPreference, PreferenceRecord},
};

/// Persistent storage for preference submissions
///
/// Records are append-only: the store assigns id and timestamp on insert and
/// never updates or deletes them.
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// All records, in insertion order
    async fn fetch_all(&self) -> AppResult<Vec<PreferenceRecord>>;

    /// Stores one submission and returns it with its assigned id and timestamp
    async fn insert(&self, preference: NewPreference) -> AppResult<PreferenceRecord>;

    async fn count(&self) -> AppResult<u64>;

    /// Number of records submitted at or after `since`
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<u64>;
}
