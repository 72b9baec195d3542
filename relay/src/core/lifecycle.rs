//! Install and activate phases

use std::sync::Arc;

use futures_util::future::join_all;
use shared::{component_info, component_warn, Component};
use url::Url;

use crate::core::cache_store::{delete_stale_buckets, CacheStore};
use crate::error::{RelayError, RelayResult};
use crate::traits::{CacheStorage, ClientRegistry, Network};
use crate::types::{WorkerRequest, WorkerResponse};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstallReport {
    /// Assets stored in the current bucket
    pub precached: usize,
    /// Why precaching was skipped, if it was
    pub precache_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivateReport {
    /// Buckets removed by the version cleanup
    pub deleted: Vec<String>,
    /// Clients that became controlled
    pub claimed: usize,
    /// Why the version cleanup stopped short, if it did
    pub cleanup_error: Option<String>,
}

/// Open the current bucket and precache the asset list
///
/// Precaching is all-or-nothing: if any asset cannot be fetched or answers
/// with a non-success status, nothing is stored. That failure is reported
/// but does not fail the install; only a storage error does.
pub async fn install<N, C>(network: &N, storage: Arc<C>, bucket: &str, base: &Url, assets: &[String]) -> RelayResult<InstallReport>
where
    N: Network + ?Sized,
    C: CacheStorage,
{
    let store = CacheStore::open(storage, bucket).await?;

    match fetch_all(network, base, assets).await {
        Ok(entries) => {
            let precached = entries.len();
            for (request, response) in entries {
                store.put(&request, response).await?;
            }
            component_info!(Component::Lifecycle, "📦 Installed {} with {} precached asset(s)", bucket, precached);
            Ok(InstallReport {
                precached,
                precache_error: None,
            })
        }
        Err(e) => {
            component_warn!(Component::Lifecycle, "⚠️ Precache failed, continuing install: {}", e);
            Ok(InstallReport {
                precached: 0,
                precache_error: Some(e.to_string()),
            })
        }
    }
}

async fn fetch_all<N: Network + ?Sized>(
    network: &N,
    base: &Url,
    assets: &[String],
) -> RelayResult<Vec<(WorkerRequest, WorkerResponse)>> {
    let requests = assets
        .iter()
        .map(|asset| Ok(WorkerRequest::get(base.join(asset)?)))
        .collect::<RelayResult<Vec<_>>>()?;

    let responses = join_all(requests.iter().map(|request| network.fetch(request))).await;

    requests
        .into_iter()
        .zip(responses)
        .map(|(request, response)| {
            let response = response?;
            if !response.is_ok() {
                return Err(RelayError::transport(
                    request.url.as_str(),
                    format!("precache answered HTTP {}", response.status),
                ));
            }
            Ok((request, response))
        })
        .collect()
}

/// Remove every bucket but `current`, then take control of open clients
///
/// The cleanup is awaited in full before any client is claimed. A cleanup
/// failure is logged and reported; clients are claimed regardless.
pub async fn activate<C, R>(storage: &C, current: &str, registry: &R) -> ActivateReport
where
    C: CacheStorage + ?Sized,
    R: ClientRegistry + ?Sized,
{
    let (deleted, cleanup_error) = match delete_stale_buckets(storage, current).await {
        Ok(deleted) => (deleted, None),
        Err(e) => {
            component_warn!(Component::Lifecycle, "⚠️ Stale cache cleanup failed: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };
    let claimed = registry.claim().await;
    component_info!(
        Component::Lifecycle,
        "🚀 Activated {} (removed {} stale bucket(s), claimed {} client(s))",
        current,
        deleted.len(),
        claimed
    );
    ActivateReport {
        deleted,
        claimed,
        cleanup_error,
    }
}
