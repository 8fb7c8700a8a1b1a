//! RenderLoop - presents the latest published products
//!
//! Runs on its own OS thread. Never waits for ingestion: each tick it
//! takes whatever set is current and presents it if it is newer than the
//! last one shown. Intermediate sets are skipped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use contracts::{FrameProducts, Presenter};
use tracing::{debug, error, info, instrument, warn};

use crate::error::PublisherError;
use crate::input::InputSlot;
use crate::metrics::{RenderMetrics, RenderSnapshot};
use crate::slot::PublicationSlot;

/// Render loop configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Tick cadence
    pub interval: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(16),
        }
    }
}

/// Consumer side of the publication slot
pub struct RenderLoop<P: Presenter> {
    presenter: P,
    slot: Arc<PublicationSlot>,
    input: Arc<InputSlot>,
    running: Arc<AtomicBool>,
    config: RenderConfig,
    metrics: Arc<RenderMetrics>,
    last_sequence: u64,
}

impl<P: Presenter> RenderLoop<P> {
    pub fn new(
        presenter: P,
        slot: Arc<PublicationSlot>,
        input: Arc<InputSlot>,
        running: Arc<AtomicBool>,
        config: RenderConfig,
    ) -> Self {
        Self {
            presenter,
            slot,
            input,
            running,
            config,
            metrics: Arc::new(RenderMetrics::new()),
            last_sequence: 0,
        }
    }

    /// Shared metrics handle, readable while the loop runs
    pub fn metrics(&self) -> Arc<RenderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until the presenter closes or `running` is cleared
    ///
    /// Clears `running` on exit so the ingestion side shuts down with it.
    #[instrument(name = "render_loop_run", skip(self), fields(presenter = %self.presenter.name()))]
    pub fn run(mut self) -> Result<RenderSnapshot, PublisherError> {
        info!(
            presenter = %self.presenter.name(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Render loop started"
        );

        while self.running.load(Ordering::Acquire) {
            if !self.presenter.is_open() {
                info!(presenter = %self.presenter.name(), "Presenter closed, stopping");
                break;
            }

            let tick = Instant::now();
            self.input.store(self.presenter.input());
            self.present_latest();

            if let Some(rest) = self.config.interval.checked_sub(tick.elapsed()) {
                thread::sleep(rest);
            }
        }

        self.running.store(false, Ordering::Release);

        // Show a set published after the last tick
        if self.presenter.is_open() {
            self.present_latest();
        }
        self.presenter.close()?;

        let snapshot = self.metrics.snapshot();
        info!(
            presented = snapshot.presented,
            skipped = snapshot.skipped,
            failures = snapshot.failures,
            "Render loop stopped"
        );
        Ok(snapshot)
    }

    fn present_latest(&mut self) {
        let latest = self.slot.peek_latest();
        if latest.sequence <= self.last_sequence {
            return;
        }

        let skipped = latest.sequence - self.last_sequence - 1;
        if skipped > 0 {
            self.metrics.add_skipped(skipped);
            observability::metrics::record_frames_skipped(skipped);
            debug!(skipped, sequence = latest.sequence, "Render fell behind");
        }
        self.last_sequence = latest.sequence;

        self.present(&latest);
    }

    fn present(&mut self, products: &FrameProducts) {
        let name = self.presenter.name().to_string();
        match self.presenter.present(products) {
            Ok(()) => {
                self.metrics.record_presented(products.sequence);
                observability::metrics::record_frame_presented(&name, true);
            }
            Err(e) => {
                self.metrics.inc_failures();
                observability::metrics::record_frame_presented(&name, false);
                error!(
                    presenter = %name,
                    sequence = products.sequence,
                    error = %e,
                    "Present failed"
                );
                if !self.presenter.is_open() {
                    warn!(presenter = %name, "Presenter closed after failure");
                }
            }
        }
    }
}
