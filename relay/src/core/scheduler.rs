//! Timer driving the monitor coordinator
//!
//! The timer fires every `period` (finer than any poll interval); the
//! coordinator's own gate decides whether a tick turns into a request. Each
//! tick runs as its own task so a hung poll never holds up later ticks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use shared::{component_debug, component_info, Component};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::core::coordinator::{MonitorCoordinator, TickOutcome};
use crate::traits::{ClientRegistry, Clock, Network};

pub struct MonitorScheduler<N: Network, R: ClientRegistry, K: Clock> {
    coordinator: Arc<MonitorCoordinator<N, R, K>>,
    period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<N, R, K> MonitorScheduler<N, R, K>
where
    N: Network + 'static,
    R: ClientRegistry + 'static,
    K: Clock + 'static,
{
    pub fn new(coordinator: Arc<MonitorCoordinator<N, R, K>>, period: Duration) -> Self {
        Self {
            coordinator,
            period,
            timer: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start the repeating timer; returns false if it was already running
    pub fn start(&self) -> bool {
        let mut timer = self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let coordinator = Arc::clone(&self.coordinator);
        let period = self.period;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    let outcome = coordinator.tick().await;
                    if outcome.polled() {
                        component_debug!(Component::Monitor, "Tick finished: {:?}", outcome);
                    }
                });
            }
        }));

        component_info!(Component::Monitor, "⏱️ Monitor timer started ({}ms)", self.period.as_millis());
        true
    }

    /// Stop the timer; ticks already spawned run to completion
    pub fn stop(&self) -> bool {
        let handle = self
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                component_info!(Component::Monitor, "⏱️ Monitor timer stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one tick inline, for callers that drive time themselves
    pub async fn tick(&self) -> TickOutcome {
        self.coordinator.tick().await
    }
}

impl<N: Network, R: ClientRegistry, K: Clock> Drop for MonitorScheduler<N, R, K> {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}
