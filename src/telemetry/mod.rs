//! Observability for the feature extraction pipeline.
//!
//! The pipeline reports stage timings, undefined features, and rejected
//! input to an [`AnalysisObserver`] handed to it by the caller. Nothing here
//! is global: each extractor owns its observer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

pub mod events;

pub use events::{AnalysisEvent, AnalysisStage, Feature, UndefinedReason};

/// Receives pipeline events
///
/// Implementations must be shareable across threads because one extractor
/// may serve concurrent `extract` calls.
pub trait AnalysisObserver: Send + Sync {
    fn on_event(&self, event: &AnalysisEvent);
}

/// Default observer: forwards every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        match event {
            AnalysisEvent::StageCompleted { stage, elapsed_us } => {
                tracing::debug!("[FeatureExtractor] {:?} took {} us", stage, elapsed_us);
            }
            AnalysisEvent::FeatureUndefined { feature, reason } => {
                tracing::info!("[FeatureExtractor] {:?} undefined: {:?}", feature, reason);
            }
            AnalysisEvent::InputRejected { code, message } => {
                tracing::warn!(
                    "[FeatureExtractor] input rejected: code={}, message={}",
                    code,
                    message
                );
            }
        }
    }
}

/// Observer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {
    fn on_event(&self, _event: &AnalysisEvent) {}
}

/// Snapshot of collector state for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<AnalysisEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Observer retaining a bounded history of events.
pub struct EventCollector {
    history: Mutex<VecDeque<AnalysisEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl EventCollector {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }

    /// Retained events matching `predicate`
    pub fn events_where(&self, predicate: impl Fn(&AnalysisEvent) -> bool) -> Vec<AnalysisEvent> {
        self.snapshot()
            .recent
            .into_iter()
            .filter(|event| predicate(event))
            .collect()
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new(64)
    }
}

impl AnalysisObserver for EventCollector {
    fn on_event(&self, event: &AnalysisEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity == 0 {
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if history.len() == self.history_capacity {
            history.pop_front();
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
        }
        history.push_back(event.clone());
    }
}
