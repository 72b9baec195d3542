//! Test helpers for relay service tests

use std::sync::Arc;

use tokio::sync::mpsc;

use shared::{ClientId, ClientMessage};

use crate::services::RealClientRegistry;
use crate::traits::ClientRegistry;

/// Registry with `count` registered clients, returning their receivers
pub async fn create_registry_with_clients(
    count: usize,
    controlled: bool,
) -> (Arc<RealClientRegistry>, Vec<(ClientId, mpsc::Receiver<ClientMessage>)>) {
    let registry = Arc::new(RealClientRegistry::new());
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        let (tx, rx) = super::fixtures::create_client_channel();
        let id = registry.register(tx, controlled).await;
        clients.push((id, rx));
    }
    (registry, clients)
}
