//! Render loop metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the render loop and its owner
#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Product sets handed to the presenter
    presented: AtomicU64,
    /// Published sets replaced before the render loop saw them
    skipped: AtomicU64,
    /// Presenter write failures
    failures: AtomicU64,
    /// Sequence of the last presented set
    last_sequence: AtomicU64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence.load(Ordering::Relaxed)
    }

    /// Record a successful present of `sequence`
    pub fn record_presented(&self, sequence: u64) {
        self.presented.fetch_add(1, Ordering::Relaxed);
        self.last_sequence.store(sequence, Ordering::Relaxed);
    }

    pub fn add_skipped(&self, count: u64) {
        self.skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            presented: self.presented(),
            skipped: self.skipped(),
            failures: self.failures(),
            last_sequence: self.last_sequence(),
        }
    }
}

/// Snapshot of render metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub presented: u64,
    pub skipped: u64,
    pub failures: u64,
    pub last_sequence: u64,
}
