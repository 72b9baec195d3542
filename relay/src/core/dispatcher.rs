//! Inbound command handling
//!
//! Commands are fire-and-forget: nothing is sent back to the sender, and a
//! malformed or unknown message ends in a logged no-op.

use std::sync::Arc;

use serde_json::Value;
use shared::{component_debug, component_info, component_warn, Component, InboundCommand};
use tokio::task::JoinHandle;

use crate::core::coordinator::{MonitorCoordinator, TickOutcome};
use crate::traits::{ClientRegistry, Clock, Network};

/// What the dispatcher did with a message
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Session started; the out-of-band first tick is running
    Started { first_tick: JoinHandle<TickOutcome> },
    Stopped { was_active: bool },
    Updated,
    /// Not a recognized command
    Ignored { reason: String },
}

pub struct MessageDispatcher<N: Network, R: ClientRegistry, K: Clock> {
    coordinator: Arc<MonitorCoordinator<N, R, K>>,
}

impl<N: Network, R: ClientRegistry, K: Clock> Clone for MessageDispatcher<N, R, K> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<N, R, K> MessageDispatcher<N, R, K>
where
    N: Network + 'static,
    R: ClientRegistry + 'static,
    K: Clock + 'static,
{
    pub fn new(coordinator: Arc<MonitorCoordinator<N, R, K>>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<MonitorCoordinator<N, R, K>> {
        &self.coordinator
    }

    /// Parse and dispatch a raw message from a client
    pub async fn dispatch_value(&self, value: Value) -> DispatchOutcome {
        match InboundCommand::from_value(value) {
            Ok(Some(command)) => self.dispatch(command).await,
            Ok(None) => {
                component_debug!(Component::Dispatcher, "Ignoring message with unknown type");
                DispatchOutcome::Ignored {
                    reason: "unknown message type".to_string(),
                }
            }
            Err(e) => {
                component_warn!(Component::Dispatcher, "⚠️ Ignoring malformed message: {}", e);
                DispatchOutcome::Ignored { reason: e.to_string() }
            }
        }
    }

    pub async fn dispatch(&self, command: InboundCommand) -> DispatchOutcome {
        component_debug!(Component::Dispatcher, "📨 {}", command.kind());
        let state = self.coordinator.state();

        match command {
            InboundCommand::StartFileMonitoring(payload) => {
                let now = self.coordinator.clock().now_ms();
                let started = state.start(&payload, now).await;
                component_info!(
                    Component::Dispatcher,
                    "▶️ Monitoring {} every {}ms from line {}",
                    started.file_path,
                    started.interval_ms,
                    started.last_line_count
                );

                let coordinator = Arc::clone(&self.coordinator);
                let first_tick = tokio::spawn(async move { coordinator.tick_immediate().await });
                DispatchOutcome::Started { first_tick }
            }
            InboundCommand::StopFileMonitoring => {
                let was_active = state.stop().await;
                component_info!(Component::Dispatcher, "⏹️ Monitoring stopped");
                DispatchOutcome::Stopped { was_active }
            }
            InboundCommand::UpdateFileMonitorState(update) => {
                if update.is_empty() {
                    component_debug!(Component::Dispatcher, "Empty state update");
                }
                state.merge(&update).await;
                DispatchOutcome::Updated
            }
        }
    }
}
