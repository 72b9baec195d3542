//! Typed event dispatcher tying the core together
//!
//! [`ServiceWorker`] owns every component and maps each [`WorkerEvent`] to
//! its handler, so callers (the HTTP layer, tests) never touch the
//! components directly.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use shared::{component_debug, component_error, component_info, Component, Notification};
use tokio::sync::RwLock;

use crate::config::RelayConfig;
use crate::core::{
    activate, install, ActivateReport, CacheStore, ClientBroadcastBus, DispatchOutcome, InstallReport, MessageDispatcher,
    MonitorCoordinator, MonitorDefaults, MonitorScheduler, MonitorState, MonitorStateHandle, RequestRouter,
};
use crate::error::RelayResult;
use crate::traits::{CacheStorage, ClientRegistry, Clock, Network, Notifier};
use crate::types::{WorkerRequest, WorkerResponse};

/// Tag of the only background sync the relay acknowledges
pub const SYNC_AUDIO_TAG: &str = "sync-audio";

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(WorkerRequest),
    /// Raw command from a client
    Message(Value),
    /// Background sync with its tag
    Sync(String),
    /// Push event with its data, if any
    Push(Option<Vec<u8>>),
}

impl WorkerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Message(_) => "message",
            WorkerEvent::Sync(_) => "sync",
            WorkerEvent::Push(_) => "push",
        }
    }
}

#[derive(Debug)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    Response(WorkerResponse),
    Dispatched(DispatchOutcome),
    Synced { tag: String },
    Notified { delivered: usize },
    /// Handled as a logged no-op
    Ignored { reason: String },
    /// The phase could not complete; logged
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    Parsed,
    Installed,
    Activated,
}

/// Snapshot served by the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatus {
    pub phase: LifecyclePhase,
    pub cache_version: String,
    /// Every bucket in storage; only the current one after activation
    pub buckets: Vec<String>,
    pub clients: usize,
    pub timer_running: bool,
    pub monitor: MonitorState,
}

pub struct ServiceWorker<N, C, R, K, P>
where
    N: Network,
    C: CacheStorage,
    R: ClientRegistry,
    K: Clock,
    P: Notifier,
{
    config: RelayConfig,
    network: Arc<N>,
    storage: Arc<C>,
    registry: Arc<R>,
    notifier: Arc<P>,
    router: RequestRouter<N, C>,
    dispatcher: MessageDispatcher<N, R, K>,
    scheduler: MonitorScheduler<N, R, K>,
    phase: RwLock<LifecyclePhase>,
}

impl<N, C, R, K, P> ServiceWorker<N, C, R, K, P>
where
    N: Network + 'static,
    C: CacheStorage + 'static,
    R: ClientRegistry + 'static,
    K: Clock + 'static,
    P: Notifier + 'static,
{
    /// Wire every component; nothing runs until the lifecycle events arrive
    pub fn new(
        config: RelayConfig,
        network: Arc<N>,
        storage: Arc<C>,
        registry: Arc<R>,
        clock: Arc<K>,
        notifier: Arc<P>,
    ) -> RelayResult<Self> {
        config.validate()?;

        let cache = CacheStore::new(Arc::clone(&storage), config.cache_version.clone());
        let router = RequestRouter::new(Arc::clone(&network), cache, config.api_prefix.clone());

        let defaults = MonitorDefaults {
            interval_ms: config.default_interval_ms,
            language: config.default_language.clone(),
        };
        let coordinator = Arc::new(MonitorCoordinator::new(
            MonitorStateHandle::new(defaults, clock.now_ms()),
            Arc::clone(&network),
            ClientBroadcastBus::new(Arc::clone(&registry)),
            clock,
            config.monitor_url()?,
        ));
        let dispatcher = MessageDispatcher::new(Arc::clone(&coordinator));
        let scheduler = MonitorScheduler::new(coordinator, config.tick_period);

        Ok(Self {
            config,
            network,
            storage,
            registry,
            notifier,
            router,
            dispatcher,
            scheduler,
            phase: RwLock::new(LifecyclePhase::Parsed),
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn storage(&self) -> &Arc<C> {
        &self.storage
    }

    pub fn router(&self) -> &RequestRouter<N, C> {
        &self.router
    }

    pub fn scheduler(&self) -> &MonitorScheduler<N, R, K> {
        &self.scheduler
    }

    pub fn monitor(&self) -> &MonitorStateHandle {
        self.dispatcher.coordinator().state()
    }

    pub async fn phase(&self) -> LifecyclePhase {
        *self.phase.read().await
    }

    pub async fn is_activated(&self) -> bool {
        self.phase().await == LifecyclePhase::Activated
    }

    pub async fn dispatch(&self, event: WorkerEvent) -> EventOutcome {
        component_debug!(Component::Dispatcher, "Event: {}", event.name());

        match event {
            WorkerEvent::Install => self.on_install().await,
            WorkerEvent::Activate => self.on_activate().await,
            WorkerEvent::Fetch(request) => EventOutcome::Response(self.handle_fetch(request).await),
            WorkerEvent::Message(value) => EventOutcome::Dispatched(self.dispatcher.dispatch_value(value).await),
            WorkerEvent::Sync(tag) => self.on_sync(tag),
            WorkerEvent::Push(data) => self.on_push(data).await,
        }
    }

    /// Route one intercepted request; always resolves to a response
    pub async fn handle_fetch(&self, request: WorkerRequest) -> WorkerResponse {
        self.router.handle(request).await
    }

    pub async fn status(&self) -> WorkerStatus {
        let buckets = self.storage.keys().await.unwrap_or_default();

        WorkerStatus {
            phase: self.phase().await,
            cache_version: self.config.cache_version.clone(),
            buckets,
            clients: self.registry.client_count().await,
            timer_running: self.scheduler.is_running(),
            monitor: self.monitor().snapshot().await,
        }
    }

    async fn on_install(&self) -> EventOutcome {
        let result = install(
            self.network.as_ref(),
            Arc::clone(&self.storage),
            &self.config.cache_version,
            &self.config.upstream,
            &self.config.precache_assets,
        )
        .await;

        match result {
            Ok(report) => {
                *self.phase.write().await = LifecyclePhase::Installed;
                EventOutcome::Installed(report)
            }
            Err(e) => {
                component_error!(Component::Lifecycle, "❌ Install failed: {}", e);
                EventOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    async fn on_activate(&self) -> EventOutcome {
        let report = activate(self.storage.as_ref(), &self.config.cache_version, self.registry.as_ref()).await;
        *self.phase.write().await = LifecyclePhase::Activated;
        EventOutcome::Activated(report)
    }

    fn on_sync(&self, tag: String) -> EventOutcome {
        if tag == SYNC_AUDIO_TAG {
            component_info!(Component::Lifecycle, "🔄 Syncing pending audio");
            EventOutcome::Synced { tag }
        } else {
            component_debug!(Component::Lifecycle, "Ignoring sync tag {}", tag);
            EventOutcome::Ignored {
                reason: format!("unknown sync tag {tag}"),
            }
        }
    }

    async fn on_push(&self, data: Option<Vec<u8>>) -> EventOutcome {
        let Some(data) = data else {
            return EventOutcome::Ignored {
                reason: "push without data".to_string(),
            };
        };

        match self.notifier.show(Notification::from_push_data(&data)).await {
            Ok(delivered) => EventOutcome::Notified { delivered },
            Err(e) => {
                component_error!(Component::Broadcast, "❌ Notification failed: {}", e);
                EventOutcome::Failed { reason: e.to_string() }
            }
        }
    }
}
