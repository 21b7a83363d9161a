use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Counters accumulated over the lifetime of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub motion_events: u64,
    pub transitions: u64,
    pub alerts_raised: u64,
    pub rejected: u64,
    /// Activity entries pushed out of the bounded log.
    pub evicted: u64,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_tick(&self, motion_started: bool) {
        self.update(|metrics| {
            metrics.ticks += 1;
            if motion_started {
                metrics.motion_events += 1;
            }
        });
    }

    pub fn record_transition(&self) {
        self.update(|metrics| metrics.transitions += 1);
    }

    pub fn record_alert(&self) {
        self.update(|metrics| metrics.alerts_raised += 1);
    }

    pub fn record_rejected(&self) {
        self.update(|metrics| metrics.rejected += 1);
    }

    pub fn record_evicted(&self, count: usize) {
        self.update(|metrics| metrics.evicted += count as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        *self.guard()
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        apply(&mut self.guard());
    }

    // Poisoning is ignored: every update leaves the counters consistent.
    fn guard(&self) -> MutexGuard<'_, MetricsSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
