//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod cache_storage;
pub mod client_registry;
pub mod clock;
pub mod network;
pub mod notifier;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use cache_storage::RealCacheStorage;
pub use client_registry::RealClientRegistry;
pub use clock::SystemClock;
pub use network::{is_hop_by_hop, RealNetwork};
pub use notifier::BroadcastNotifier;
