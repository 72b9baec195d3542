//! Request classification and the three fetch strategies
//!
//! Every intercepted request resolves to a concrete response. Transport
//! failures fall back to the cache and then to a synthesized 503; they are
//! never surfaced to the caller as errors. Cache writes run as detached tasks
//! so they never delay the response.

use std::sync::{Arc, Mutex};

use shared::{component_debug, component_warn, Component};
use tokio::task::JoinHandle;

use crate::core::cache_store::CacheStore;
use crate::traits::{CacheStorage, Network};
use crate::types::{FetchStrategy, OfflineKind, RequestDestination, WorkerRequest, WorkerResponse};

pub struct RequestRouter<N: Network, C: CacheStorage> {
    network: Arc<N>,
    cache: CacheStore<C>,
    api_prefix: String,
    pending_writes: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<N, C> RequestRouter<N, C>
where
    N: Network + 'static,
    C: CacheStorage + 'static,
{
    pub fn new(network: Arc<N>, cache: CacheStore<C>, api_prefix: impl Into<String>) -> Self {
        Self {
            network,
            cache,
            api_prefix: api_prefix.into(),
            pending_writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// First match wins: navigation, then API, then everything else
    pub fn classify(&self, request: &WorkerRequest) -> FetchStrategy {
        if request.destination == RequestDestination::Document || request.path() == "/" {
            FetchStrategy::AlwaysFresh
        } else if request.path().starts_with(&self.api_prefix) {
            FetchStrategy::NetworkFirst
        } else {
            FetchStrategy::CacheFirst
        }
    }

    pub async fn handle(&self, request: WorkerRequest) -> WorkerResponse {
        let strategy = self.classify(&request);
        component_debug!(
            Component::Router,
            "{} {} -> {:?}",
            request.method,
            request.url,
            strategy
        );

        match strategy {
            FetchStrategy::AlwaysFresh => self.always_fresh(request).await,
            FetchStrategy::NetworkFirst => self.network_first(request).await,
            FetchStrategy::CacheFirst => self.cache_first(request).await,
        }
    }

    async fn always_fresh(&self, request: WorkerRequest) -> WorkerResponse {
        match self.network.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                component_warn!(Component::Router, "📴 Page fetch failed for {}: {}", request.url, e);
                self.fallback(&request, OfflineKind::Document).await
            }
        }
    }

    async fn network_first(&self, request: WorkerRequest) -> WorkerResponse {
        match self.network.fetch(&request).await {
            Ok(response) => {
                if request.is_mutating() && response.is_ok() {
                    self.spawn_cache_write(&request, response.clone());
                }
                response
            }
            Err(e) => {
                component_warn!(Component::Router, "📴 API fetch failed for {}: {}", request.url, e);
                self.fallback(&request, OfflineKind::Api).await
            }
        }
    }

    async fn cache_first(&self, request: WorkerRequest) -> WorkerResponse {
        let cacheable = request.is_cacheable_method();
        if cacheable {
            if let Some(cached) = self.lookup(&request).await {
                return cached;
            }
        }

        match self.network.fetch(&request).await {
            Ok(response) => {
                if cacheable && response.is_cacheable_asset() {
                    self.spawn_cache_write(&request, response.clone());
                }
                response
            }
            Err(e) => {
                component_warn!(Component::Router, "📴 Asset fetch failed for {}: {}", request.url, e);
                WorkerResponse::offline(OfflineKind::Asset)
            }
        }
    }

    async fn fallback(&self, request: &WorkerRequest, kind: OfflineKind) -> WorkerResponse {
        match self.lookup(request).await {
            Some(cached) => cached,
            None => WorkerResponse::offline(kind),
        }
    }

    /// Cache lookup where a storage failure counts as a miss
    async fn lookup(&self, request: &WorkerRequest) -> Option<WorkerResponse> {
        match self.cache.match_request(request).await {
            Ok(hit) => hit,
            Err(e) => {
                component_warn!(Component::Cache, "Cache lookup failed for {}: {}", request.url, e);
                None
            }
        }
    }

    fn spawn_cache_write(&self, request: &WorkerRequest, response: WorkerResponse) {
        let cache = self.cache.clone();
        let request = request.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = cache.put(&request, response).await {
                component_warn!(Component::Cache, "⚠️ Cache write failed for {}: {}", request.url, e);
            } else {
                component_debug!(Component::Cache, "💾 Cached {}", request.url);
            }
        });

        let mut pending = self.pending_writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for every cache write started so far, returning how many were awaited
    pub async fn flush_pending_writes(&self) -> usize {
        let handles = {
            let mut pending = self.pending_writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *pending)
        };

        let count = handles.len();
        for handle in handles {
            let _ = handle.await;
        }
        count
    }
}
