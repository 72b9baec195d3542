//! Speakerbot relay library
//!
//! An offline-capable request interceptor for the Speakerbot TTS client,
//! with a background file monitor that fans new lines out to every open tab.

pub mod config;
pub mod core;
pub mod error;
pub mod relay_impl;
pub mod services;
pub mod traits;
pub mod types;
pub mod web;
pub mod worker;

// Re-export main types
pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use relay_impl::{AppState, RealServiceWorker, RelayServer};
pub use types::*;
pub use worker::{EventOutcome, LifecyclePhase, ServiceWorker, WorkerEvent, WorkerStatus};

// Re-export trait definitions
pub use traits::{CacheStorage, ClientHandle, ClientRegistry, Clock, Network, Notifier};

// Re-export service implementations
pub use services::{BroadcastNotifier, RealCacheStorage, RealClientRegistry, RealNetwork, SystemClock};
