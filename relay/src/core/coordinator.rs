//! Polling loop body: one tick of file monitoring
//!
//! A tick that passes the gate polls the backend once. Failures are logged
//! and leave the cursor untouched, so the next tick retries from the same
//! position. There is no backoff.

use std::sync::Arc;

use shared::{component_debug, component_info, component_warn, ClientMessage, Component, ReadFileRequest, ReadFileResponse};
use url::Url;

use crate::core::broadcast::ClientBroadcastBus;
use crate::core::monitor_state::{MonitorStateHandle, PollTicket, TickGate};
use crate::error::{RelayError, RelayResult};
use crate::traits::{ClientRegistry, Clock, Network};
use crate::types::WorkerRequest;

/// What a tick ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Inactive or no file configured
    Idle,
    /// Interval not yet elapsed; no request made
    Debounced,
    /// Transport failure, non-success status or unreadable body
    PollFailed,
    /// Backend answered `success: false`
    Rejected,
    /// A newer start command replaced the session this poll belonged to
    Superseded,
    /// Cursor refreshed, nothing to broadcast
    NoNewLines { total_lines: u64 },
    /// New lines broadcast
    Broadcast { new_lines: usize, delivered: usize },
}

impl TickOutcome {
    /// Whether the tick issued a request to the backend
    pub fn polled(&self) -> bool {
        !matches!(self, TickOutcome::Idle | TickOutcome::Debounced)
    }
}

pub struct MonitorCoordinator<N: Network, R: ClientRegistry, K: Clock> {
    state: MonitorStateHandle,
    network: Arc<N>,
    bus: ClientBroadcastBus<R>,
    clock: Arc<K>,
    monitor_url: Url,
}

impl<N, R, K> MonitorCoordinator<N, R, K>
where
    N: Network,
    R: ClientRegistry,
    K: Clock,
{
    pub fn new(state: MonitorStateHandle, network: Arc<N>, bus: ClientBroadcastBus<R>, clock: Arc<K>, monitor_url: Url) -> Self {
        Self {
            state,
            network,
            bus,
            clock,
            monitor_url,
        }
    }

    pub fn state(&self) -> &MonitorStateHandle {
        &self.state
    }

    pub fn clock(&self) -> &Arc<K> {
        &self.clock
    }

    /// Timer-driven tick, subject to the configured interval
    pub async fn tick(&self) -> TickOutcome {
        self.run_tick(false).await
    }

    /// Out-of-band tick that ignores the interval
    pub async fn tick_immediate(&self) -> TickOutcome {
        self.run_tick(true).await
    }

    async fn run_tick(&self, force: bool) -> TickOutcome {
        let now = self.clock.now_ms();
        let ticket = match self.state.begin_tick(now, force).await {
            TickGate::Idle => return TickOutcome::Idle,
            TickGate::Debounced { .. } => return TickOutcome::Debounced,
            TickGate::Poll(ticket) => ticket,
        };

        let body = match self.poll(&ticket).await {
            Ok(body) => body,
            Err(e) => {
                component_warn!(Component::Monitor, "❌ Poll of {} failed: {}", ticket.file_path, e);
                return TickOutcome::PollFailed;
            }
        };

        if !body.success {
            component_warn!(
                Component::Monitor,
                "⚠️ Backend rejected poll of {}: {}",
                ticket.file_path,
                body.error.as_deref().unwrap_or("unknown error")
            );
            return TickOutcome::Rejected;
        }

        if !self.state.record_poll(&ticket, body.total_lines).await {
            component_debug!(
                Component::Monitor,
                "Discarded poll of {} from superseded session {}",
                ticket.file_path,
                ticket.session
            );
            return TickOutcome::Superseded;
        }

        if !body.has_new_lines() {
            return TickOutcome::NoNewLines {
                total_lines: body.total_lines,
            };
        }

        let new_lines = body.new_lines.len();
        component_info!(
            Component::Monitor,
            "✅ {} new line(s) in {} (total {})",
            new_lines,
            ticket.file_path,
            body.total_lines
        );

        let report = self
            .bus
            .broadcast(ClientMessage::file_monitor_update(body.new_lines, body.total_lines))
            .await;

        TickOutcome::Broadcast {
            new_lines,
            delivered: report.delivered,
        }
    }

    async fn poll(&self, ticket: &PollTicket) -> RelayResult<ReadFileResponse> {
        let request = WorkerRequest::post_json(
            self.monitor_url.clone(),
            &ReadFileRequest {
                file_path: ticket.file_path.clone(),
                last_line_count: ticket.last_line_count,
            },
        )?;

        let response = self.network.fetch(&request).await?;
        if !response.is_ok() {
            return Err(RelayError::PollFailed {
                message: format!("HTTP {}", response.status),
            });
        }

        response.json()
    }
}
