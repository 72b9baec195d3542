//! Notification delivery through the client broadcast bus

use async_trait::async_trait;
use shared::{component_info, ClientMessage, Component, Notification};

use crate::core::broadcast::ClientBroadcastBus;
use crate::error::RelayResult;
use crate::traits::{ClientRegistry, Notifier};

/// Shows a notification by asking every open client to display it
pub struct BroadcastNotifier<R: ClientRegistry> {
    bus: ClientBroadcastBus<R>,
}

impl<R: ClientRegistry> BroadcastNotifier<R> {
    pub fn new(bus: ClientBroadcastBus<R>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl<R: ClientRegistry> Notifier for BroadcastNotifier<R> {
    async fn show(&self, notification: Notification) -> RelayResult<usize> {
        component_info!(Component::Broadcast, "🔔 {}: {}", notification.title, notification.body);
        let report = self.bus.broadcast(ClientMessage::ShowNotification(notification)).await;
        Ok(report.delivered)
    }
}
