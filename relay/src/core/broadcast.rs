//! Fan-out of relay messages to every open client

use std::sync::Arc;

use shared::{component_debug, component_warn, ClientMessage, Component};

use crate::traits::ClientRegistry;

/// Result of one broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Clients enumerated at broadcast time
    pub targeted: usize,
    /// Clients whose channel accepted the message
    pub delivered: usize,
}

/// Posts a message to every client of the origin, controlled or not
///
/// Delivery is best-effort: a client whose channel is full or closing is
/// skipped and nothing is retried.
pub struct ClientBroadcastBus<R: ClientRegistry> {
    registry: Arc<R>,
}

impl<R: ClientRegistry> Clone for ClientBroadcastBus<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<R: ClientRegistry> ClientBroadcastBus<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub async fn broadcast(&self, message: ClientMessage) -> BroadcastReport {
        let clients = self.registry.match_all(true).await;
        let targeted = clients.len();

        let delivered = clients
            .iter()
            .filter(|client| {
                let posted = client.post_message(message.clone());
                if !posted {
                    component_debug!(Component::Broadcast, "Client {} did not accept message", client.id);
                }
                posted
            })
            .count();

        if targeted > 0 && delivered < targeted {
            component_warn!(
                Component::Broadcast,
                "📭 Delivered to {}/{} clients",
                delivered,
                targeted
            );
        }

        BroadcastReport { targeted, delivered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RealClientRegistry;
    use crate::traits::{ClientHandle, MockClientRegistry};
    use shared::ClientId;
    use tokio::sync::mpsc;

    fn update() -> ClientMessage {
        ClientMessage::file_monitor_update(vec!["a".to_string(), "b".to_string()], 5)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_controlled_and_uncontrolled_clients() {
        let registry = Arc::new(RealClientRegistry::new());
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        registry.register(tx1, true).await;
        registry.register(tx2, false).await;

        let bus = ClientBroadcastBus::new(registry);
        let report = bus.broadcast(update()).await;

        assert_eq!(report, BroadcastReport { targeted: 2, delivered: 2 });
        assert_eq!(rx1.recv().await, Some(update()));
        assert_eq!(rx2.recv().await, Some(update()));
    }

    #[tokio::test]
    async fn test_broadcast_with_no_clients() {
        let bus = ClientBroadcastBus::new(Arc::new(RealClientRegistry::new()));
        assert_eq!(bus.broadcast(update()).await, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_closing_client_is_skipped() {
        let (open_tx, mut open_rx) = mpsc::channel(8);
        let (closed_tx, closed_rx) = mpsc::channel(8);
        drop(closed_rx);

        let handles = vec![
            ClientHandle::new(ClientId::new(), true, open_tx),
            ClientHandle::new(ClientId::new(), true, closed_tx),
        ];
        let mut registry = MockClientRegistry::new();
        registry
            .expect_match_all()
            .withf(|include_uncontrolled| *include_uncontrolled)
            .times(1)
            .returning(move |_| handles.clone());

        let bus = ClientBroadcastBus::new(Arc::new(registry));
        let report = bus.broadcast(update()).await;

        assert_eq!(report.targeted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(open_rx.recv().await, Some(update()));
    }
}
