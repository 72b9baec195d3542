//! Routing, caching and file-monitoring core

pub mod broadcast;
pub mod cache_store;
pub mod coordinator;
pub mod dispatcher;
pub mod lifecycle;
pub mod monitor_state;
pub mod router;
pub mod scheduler;

pub use broadcast::{BroadcastReport, ClientBroadcastBus};
pub use cache_store::{delete_stale_buckets, CacheStore};
pub use coordinator::{MonitorCoordinator, TickOutcome};
pub use dispatcher::{DispatchOutcome, MessageDispatcher};
pub use lifecycle::{activate, install, ActivateReport, InstallReport};
pub use monitor_state::{MonitorDefaults, MonitorState, MonitorStateHandle, PollTicket, TickGate};
pub use router::RequestRouter;
pub use scheduler::MonitorScheduler;
