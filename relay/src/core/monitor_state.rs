//! Process-wide file monitoring state
//!
//! The state lives behind [`MonitorStateHandle`]; commands mutate it through
//! `start`/`stop`/`merge`, the coordinator through `begin_tick` and
//! `record_poll`. Each method is one short critical section, so concurrent
//! commands from several tabs resolve as last-write-wins.

use std::sync::Arc;

use serde::Serialize;
use shared::{MonitorStartPayload, MonitorStateUpdate};
use tokio::sync::RwLock;

/// Values applied when a start command leaves a field out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorDefaults {
    pub interval_ms: u64,
    pub language: String,
}

impl Default for MonitorDefaults {
    fn default() -> Self {
        Self {
            interval_ms: crate::config::DEFAULT_POLL_INTERVAL_MS,
            language: crate::config::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorState {
    pub active: bool,
    /// Watched file; empty means no target
    pub file_path: String,
    /// Minimum spacing between effective ticks
    #[serde(rename = "interval")]
    pub interval_ms: u64,
    /// Lines already observed and delivered
    pub last_line_count: u64,
    pub language: String,
    pub voice: String,
    pub use_random_voice: bool,
    /// Epoch millis of the last effective tick
    pub last_check: u64,
    /// Incremented by every start command
    pub session: u64,
}

impl MonitorState {
    pub fn new(defaults: &MonitorDefaults, now_ms: u64) -> Self {
        Self {
            active: false,
            file_path: String::new(),
            interval_ms: defaults.interval_ms,
            last_line_count: 0,
            language: defaults.language.clone(),
            voice: String::new(),
            use_random_voice: false,
            last_check: now_ms,
            session: 0,
        }
    }

    /// Active with a target configured
    pub fn should_poll(&self) -> bool {
        self.active && !self.file_path.is_empty()
    }
}

/// Snapshot handed to the coordinator for one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTicket {
    pub session: u64,
    pub file_path: String,
    pub last_line_count: u64,
}

/// Decision taken at the top of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickGate {
    /// Inactive or no file configured
    Idle,
    /// Interval not yet elapsed
    Debounced { remaining_ms: u64 },
    /// `last_check` has been stamped; go poll
    Poll(PollTicket),
}

/// Shared, injectable owner of the [`MonitorState`]
#[derive(Debug, Clone)]
pub struct MonitorStateHandle {
    inner: Arc<RwLock<MonitorState>>,
    defaults: MonitorDefaults,
}

impl MonitorStateHandle {
    pub fn new(defaults: MonitorDefaults, now_ms: u64) -> Self {
        let state = MonitorState::new(&defaults, now_ms);
        Self {
            inner: Arc::new(RwLock::new(state)),
            defaults,
        }
    }

    pub fn defaults(&self) -> &MonitorDefaults {
        &self.defaults
    }

    pub async fn snapshot(&self) -> MonitorState {
        self.inner.read().await.clone()
    }

    /// Begin a new session from a start command
    ///
    /// Absent fields take their defaults; an interval of zero counts as
    /// absent. The cursor starts at the payload's count or zero.
    pub async fn start(&self, payload: &MonitorStartPayload, now_ms: u64) -> MonitorState {
        let mut state = self.inner.write().await;
        state.active = true;
        state.file_path = payload.file_path.clone().unwrap_or_default();
        state.interval_ms = payload
            .interval
            .filter(|interval| *interval > 0)
            .unwrap_or(self.defaults.interval_ms);
        state.language = payload
            .language
            .clone()
            .filter(|language| !language.is_empty())
            .unwrap_or_else(|| self.defaults.language.clone());
        state.voice = payload.voice.clone().unwrap_or_default();
        state.use_random_voice = payload.use_random_voice.unwrap_or(false);
        state.last_line_count = payload.last_line_count.unwrap_or(0);
        state.last_check = now_ms;
        state.session += 1;
        state.clone()
    }

    /// Deactivate, keeping every other field; returns whether it was active
    pub async fn stop(&self) -> bool {
        let mut state = self.inner.write().await;
        std::mem::replace(&mut state.active, false)
    }

    /// Overwrite only the fields present in the update
    pub async fn merge(&self, update: &MonitorStateUpdate) -> MonitorState {
        let mut state = self.inner.write().await;
        if let Some(active) = update.active {
            state.active = active;
        }
        if let Some(file_path) = &update.file_path {
            state.file_path = file_path.clone();
        }
        if let Some(interval) = update.interval {
            state.interval_ms = interval;
        }
        if let Some(count) = update.last_line_count {
            state.last_line_count = count;
        }
        if let Some(language) = &update.language {
            state.language = language.clone();
        }
        if let Some(voice) = &update.voice {
            state.voice = voice.clone();
        }
        if let Some(use_random_voice) = update.use_random_voice {
            state.use_random_voice = use_random_voice;
        }
        state.clone()
    }

    /// Gate a tick and, when it proceeds, stamp `last_check` in the same step
    ///
    /// With `force` the interval check is skipped (out-of-band tick after a
    /// start command); the idle check still applies.
    pub async fn begin_tick(&self, now_ms: u64, force: bool) -> TickGate {
        let mut state = self.inner.write().await;
        if !state.should_poll() {
            return TickGate::Idle;
        }

        let elapsed = now_ms.saturating_sub(state.last_check);
        if !force && elapsed < state.interval_ms {
            return TickGate::Debounced {
                remaining_ms: state.interval_ms - elapsed,
            };
        }

        state.last_check = now_ms;
        TickGate::Poll(PollTicket {
            session: state.session,
            file_path: state.file_path.clone(),
            last_line_count: state.last_line_count,
        })
    }

    /// Apply the server-reported total as the new cursor
    ///
    /// Applies even if monitoring was stopped while the poll was in flight.
    /// A result from an earlier session is discarded so it cannot clobber the
    /// cursor a newer start command set. Returns whether it was applied.
    pub async fn record_poll(&self, ticket: &PollTicket, total_lines: u64) -> bool {
        let mut state = self.inner.write().await;
        if state.session != ticket.session {
            return false;
        }
        state.last_line_count = total_lines;
        true
    }
}
