//! Main relay implementation
//!
//! Wires the real services into a [`ServiceWorker`] and serves it over HTTP.

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use shared::{component_info, Component};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::config::RelayConfig;
use crate::core::ClientBroadcastBus;
use crate::error::{RelayError, RelayResult};
use crate::services::{BroadcastNotifier, RealCacheStorage, RealClientRegistry, RealNetwork, SystemClock};
use crate::web::handlers::{health_check, proxy_handler, push_handler, status_handler, sync_handler, websocket_handler};
use crate::worker::{EventOutcome, ServiceWorker, WorkerEvent};

pub type RealServiceWorker =
    ServiceWorker<RealNetwork, RealCacheStorage, RealClientRegistry, SystemClock, BroadcastNotifier<RealClientRegistry>>;

/// Shared state of every handler
pub type AppState = Arc<RealServiceWorker>;

#[derive(Clone)]
pub struct RelayServer {
    worker: AppState,
}

impl RelayServer {
    /// Create a relay with the production services
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let registry = Arc::new(RealClientRegistry::new());
        let notifier = BroadcastNotifier::new(ClientBroadcastBus::new(Arc::clone(&registry)));

        let worker = ServiceWorker::new(
            config.clone(),
            Arc::new(RealNetwork::new(config.upstream.clone())),
            Arc::new(RealCacheStorage::new()),
            registry,
            Arc::new(SystemClock),
            Arc::new(notifier),
        )?;

        Ok(Self {
            worker: Arc::new(worker),
        })
    }

    pub fn worker(&self) -> &AppState {
        &self.worker
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/__relay/ws", get(websocket_handler))
            .route("/__relay/push", post(push_handler))
            .route("/__relay/sync", post(sync_handler))
            .route("/__relay/status", get(status_handler))
            .route("/__relay/health", get(health_check))
            // Everything else goes through the request router
            .fallback(proxy_handler)
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(Arc::clone(&self.worker))
    }

    /// Run install and activate, then start the monitor timer
    pub async fn start(&self) -> RelayResult<()> {
        for event in [WorkerEvent::Install, WorkerEvent::Activate] {
            if let EventOutcome::Failed { reason } = self.worker.dispatch(event).await {
                return Err(RelayError::ServerStartup(reason));
            }
        }
        self.worker.scheduler().start();
        Ok(())
    }

    /// Stop the timer and wait for outstanding cache writes
    pub async fn shutdown(&self) {
        self.worker.scheduler().stop();
        let flushed = self.worker.router().flush_pending_writes().await;
        component_info!(Component::Server, "🛑 Relay stopped ({} pending cache write(s) flushed)", flushed);
    }

    /// Start the relay on an already bound listener until `signal` resolves
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> RelayResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.start().await?;

        let result = axum::serve(listener, self.build_router())
            .with_graceful_shutdown(signal)
            .await;

        self.shutdown().await;
        result.map_err(|e| RelayError::ServerStartup(format!("Server error: {}", e)))
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(&self) -> RelayResult<()> {
        let bind_addr = self.worker.config().bind_addr;
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| RelayError::ServerStartup(format!("Failed to bind to {}: {}", bind_addr, e)))?;

        component_info!(Component::Server, "🌐 Relay listening on http://{}", bind_addr);
        component_info!(Component::Server, "🔁 Forwarding to {}", self.worker.config().upstream);

        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            component_info!(Component::Server, "Received shutdown signal");
        })
        .await
    }
}
