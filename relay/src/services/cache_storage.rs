//! In-memory cache storage
//!
//! Buckets live for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RelayResult;
use crate::traits::CacheStorage;
use crate::types::WorkerResponse;

type Bucket = HashMap<String, WorkerResponse>;

/// Real cache storage implementation
#[derive(Debug, Clone, Default)]
pub struct RealCacheStorage {
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
}

impl RealCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a bucket, zero if it does not exist
    pub async fn entry_count(&self, name: &str) -> usize {
        self.buckets.read().await.get(name).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl CacheStorage for RealCacheStorage {
    async fn open(&self, name: &str) -> RelayResult<()> {
        self.buckets.write().await.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn keys(&self) -> RelayResult<Vec<String>> {
        let mut names: Vec<String> = self.buckets.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> RelayResult<bool> {
        Ok(self.buckets.write().await.remove(name).is_some())
    }

    async fn match_request(&self, name: &str, key: &str) -> RelayResult<Option<WorkerResponse>> {
        let buckets = self.buckets.read().await;
        Ok(buckets.get(name).and_then(|bucket| bucket.get(key)).cloned())
    }

    async fn put(&self, name: &str, key: &str, response: WorkerResponse) -> RelayResult<()> {
        self.buckets
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }

    async fn evict(&self, name: &str, key: &str) -> RelayResult<bool> {
        let mut buckets = self.buckets.write().await;
        Ok(buckets
            .get_mut(name)
            .map_or(false, |bucket| bucket.remove(key).is_some()))
    }
}
