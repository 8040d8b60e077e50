//! Session-lifetime cache of coverage classifications keyed by address and city.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use covscan_core::CoverageStatus;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    address: String,
    city: String,
}

impl CacheKey {
    fn new(address: &str, city: &str) -> Self {
        Self {
            address: address.trim().to_owned(),
            city: city.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageCacheEntry {
    pub status: CoverageStatus,
    pub checked_at: DateTime<Utc>,
}

/// Unbounded map from trimmed `(address, city)` to the last classification.
#[derive(Debug, Default)]
pub struct CoverageCache {
    entries: Mutex<HashMap<CacheKey, CoverageCacheEntry>>,
}

impl CoverageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, address: &str, city: &str) -> Option<CoverageCacheEntry> {
        self.entries
            .lock()
            .await
            .get(&CacheKey::new(address, city))
            .copied()
    }

    pub async fn insert(&self, address: &str, city: &str, status: CoverageStatus) {
        let entry = CoverageCacheEntry {
            status,
            checked_at: Utc::now(),
        };
        self.entries
            .lock()
            .await
            .insert(CacheKey::new(address, city), entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
