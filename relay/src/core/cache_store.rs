//! Handle on a single named cache bucket, plus version-rotation cleanup

use std::sync::Arc;

use futures_util::future::join_all;
use shared::{component_info, Component};

use crate::error::{RelayError, RelayResult};
use crate::traits::CacheStorage;
use crate::types::{WorkerRequest, WorkerResponse};

/// One logical bucket inside a [`CacheStorage`]
pub struct CacheStore<C: CacheStorage> {
    storage: Arc<C>,
    name: String,
}

impl<C: CacheStorage> Clone for CacheStore<C> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            name: self.name.clone(),
        }
    }
}

impl<C: CacheStorage> CacheStore<C> {
    /// Handle on a bucket without touching storage; the bucket is created on first write
    pub fn new(storage: Arc<C>, name: impl Into<String>) -> Self {
        Self {
            storage,
            name: name.into(),
        }
    }

    /// Open (creating if needed) the named bucket
    ///
    /// Opening an existing name yields the same logical bucket.
    pub async fn open(storage: Arc<C>, name: impl Into<String>) -> RelayResult<Self> {
        let store = Self::new(storage, name);
        store.storage.open(&store.name).await?;
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &Arc<C> {
        &self.storage
    }

    pub async fn match_request(&self, request: &WorkerRequest) -> RelayResult<Option<WorkerResponse>> {
        self.storage.match_request(&self.name, &request.cache_key()).await
    }

    pub async fn put(&self, request: &WorkerRequest, response: WorkerResponse) -> RelayResult<()> {
        self.storage.put(&self.name, &request.cache_key(), response).await
    }

    pub async fn evict(&self, request: &WorkerRequest) -> RelayResult<bool> {
        self.storage.evict(&self.name, &request.cache_key()).await
    }
}

/// Delete every bucket whose name differs from `current`
///
/// All deletions are attempted even if one fails; the first failure is
/// returned after the rest have completed. Returns the deleted names.
pub async fn delete_stale_buckets<C: CacheStorage + ?Sized>(storage: &C, current: &str) -> RelayResult<Vec<String>> {
    let stale: Vec<String> = storage.keys().await?.into_iter().filter(|name| name != current).collect();

    let results = join_all(stale.iter().map(|name| async move {
        let deleted = storage.delete(name).await?;
        if deleted {
            component_info!(Component::Cache, "🗑️ Deleted stale cache bucket {}", name);
        }
        Ok::<_, RelayError>((name.clone(), deleted))
    }))
    .await;

    let mut removed = Vec::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok((name, true)) => removed.push(name),
            Ok((_, false)) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(removed),
    }
}
