//! Client registry service implementation
//!
//! This service maintains a registry of open client connections.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{component_debug, component_info, ClientId, ClientMessage, Component};
use tokio::sync::{mpsc, RwLock};

use crate::traits::{ClientHandle, ClientRegistry};

/// Real client registry implementation
#[derive(Debug, Clone, Default)]
pub struct RealClientRegistry {
    clients: Arc<RwLock<HashMap<ClientId, ClientHandle>>>,
}

impl RealClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRegistry for RealClientRegistry {
    async fn register(&self, sender: mpsc::Sender<ClientMessage>, controlled: bool) -> ClientId {
        let id = ClientId::new();
        let mut clients = self.clients.write().await;
        clients.insert(id, ClientHandle::new(id, controlled, sender));
        component_info!(
            Component::Broadcast,
            "📝 Client {} registered (controlled: {}), {} open",
            id,
            controlled,
            clients.len()
        );
        id
    }

    async fn unregister(&self, client_id: ClientId) -> bool {
        let mut clients = self.clients.write().await;
        let removed = clients.remove(&client_id).is_some();
        if removed {
            component_info!(Component::Broadcast, "👋 Client {} left, {} open", client_id, clients.len());
        } else {
            component_debug!(Component::Broadcast, "Client {} was not registered", client_id);
        }
        removed
    }

    async fn match_all(&self, include_uncontrolled: bool) -> Vec<ClientHandle> {
        self.clients
            .read()
            .await
            .values()
            .filter(|client| include_uncontrolled || client.controlled)
            .filter(|client| !client.is_closed())
            .cloned()
            .collect()
    }

    async fn claim(&self) -> usize {
        let mut clients = self.clients.write().await;
        clients
            .values_mut()
            .filter(|client| !client.controlled)
            .map(|client| client.controlled = true)
            .count()
    }

    async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
