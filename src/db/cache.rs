use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Display;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Group recommendation for the preference set with this content hash
    GroupRecommendation(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::GroupRecommendation(hash) => write!(f, "rec:group:{}", hash),
        }
    }
}

/// Key/value store for serialized recommendation results
#[async_trait::async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the raw cached value, if any
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>>;

    /// Stores a raw value. Write failures are logged, not returned.
    async fn set(&self, key: &CacheKey, value: String);
}

/// Process-local cache with no eviction; entries live until restart
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(&key.to_string()).cloned())
    }

    async fn set(&self, key: &CacheKey, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }
}

/// Lowercase hex SHA-256 of the canonical JSON encoding of `value`
///
/// Object keys are sorted at every depth and the output is compact, so two
/// values that differ only in key order hash identically.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let value = serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Cache key serialization error: {}", e)))?;
    let canonical = serde_json::to_string(&canonicalize(value))
        .map_err(|e| AppError::Internal(format!("Cache key serialization error: {}", e)))?;

    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

/// Rebuilds every object with its keys in sorted order
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
