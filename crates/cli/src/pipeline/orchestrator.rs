//! Pipeline orchestrator - wires the ingestion and render threads.
//!
//! Both loops are blocking and run on dedicated OS threads. The async side
//! only waits for them and turns shutdown signals or the timeout into a
//! cleared running flag.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{AppConfig, Presenter, PresenterKind, SensorInfo, SensorSession, SourceKind};
use ingestion::{IngestionConfig, IngestionLoop, MockSession, UdpConfig, UdpSession};
use publisher::{
    InputSlot, LogPresenter, PublicationSlot, PublisherError, RenderConfig, RenderLoop,
    SnapshotConfig, SnapshotPresenter,
};
use scan_products::{ProductComputer, XyzLut};
use tracing::{info, warn};

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated application configuration
    pub app: AppConfig,

    /// Validated sensor metadata
    pub info: SensorInfo,

    /// Maximum number of frames to publish (None = unlimited)
    pub max_frames: Option<u64>,

    /// Run timeout (None = no timeout)
    pub timeout: Option<Duration>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run both loops to completion
    ///
    /// `shutdown` resolving (or the timeout elapsing) clears the running
    /// flag; both threads are always joined before returning.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let app = &self.config.app;
        let info = &self.config.info;

        let session = create_session(app, info)?;
        let presenter = create_presenter(app)?;

        info!("Building XYZ lookup table...");
        let lut = Arc::new(XyzLut::new(info));
        let computer = ProductComputer::new(lut, app.view.field);

        let slot = Arc::new(PublicationSlot::new(info.width(), info.height()));
        let input = Arc::new(InputSlot::new());
        let running = Arc::new(AtomicBool::new(true));

        let ingestion = IngestionLoop::new(
            session,
            info.clone(),
            computer,
            Arc::clone(&slot),
            Arc::clone(&input),
            Arc::clone(&running),
            IngestionConfig::new(self.config.max_frames),
        );
        let render = RenderLoop::new(
            presenter,
            Arc::clone(&slot),
            Arc::clone(&input),
            Arc::clone(&running),
            RenderConfig {
                interval: Duration::from_millis(app.view.render_interval_ms),
            },
        );

        let ingestion_handle = thread::Builder::new()
            .name("ingestion".to_string())
            .spawn(move || ingestion.run())
            .context("Failed to spawn ingestion thread")?;
        let render_handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || render.run())
            .context("Failed to spawn render thread")?;

        info!(
            max_frames = ?self.config.max_frames,
            source = ?app.sensor.source,
            presenter = ?app.view.presenter,
            "Viewer running"
        );

        let joined = async {
            tokio::join!(
                tokio::task::spawn_blocking(move || ingestion_handle.join()),
                tokio::task::spawn_blocking(move || render_handle.join()),
            )
        };
        tokio::pin!(joined);

        let timeout = async {
            match self.config.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        let (ingestion_result, render_result) = tokio::select! {
            results = &mut joined => results,
            _ = shutdown => {
                warn!("Received shutdown signal, stopping viewer...");
                running.store(false, Ordering::Release);
                joined.await
            }
            _ = timeout => {
                warn!(timeout = ?self.config.timeout, "Viewer timed out");
                running.store(false, Ordering::Release);
                joined.await
            }
        };

        // Ingestion failures take precedence over render failures
        let summary = ingestion_result
            .context("Ingestion join task failed")?
            .map_err(|_| CliError::thread_panicked("ingestion"))?
            .map_err(CliError::from)?;
        let render = render_result
            .context("Render join task failed")?
            .map_err(|_| CliError::thread_panicked("render"))?
            .map_err(CliError::from)?;

        let stats = PipelineStats::new(summary, render, start_time.elapsed());
        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "Viewer shutdown complete"
        );
        Ok(stats)
    }
}

fn create_session(app: &AppConfig, info: &SensorInfo) -> Result<Box<dyn SensorSession>> {
    match app.sensor.source {
        SourceKind::Mock => {
            info!(frames = app.mock.frames, "Running with MOCK sensor");
            let session = MockSession::new(info, app.mock.clone())
                .context("Failed to create mock sensor session")?;
            Ok(Box::new(session))
        }
        SourceKind::Udp => {
            info!(
                hostname = app.sensor.hostname.as_deref().unwrap_or("-"),
                lidar_port = app.sensor.lidar_port,
                imu_port = app.sensor.imu_port,
                "Listening for sensor packets"
            );
            let session = UdpSession::bind(&UdpConfig::from(&app.sensor))
                .context("Failed to bind UDP sensor session")?;
            Ok(Box::new(session))
        }
    }
}

fn create_presenter(app: &AppConfig) -> Result<Box<dyn Presenter>> {
    match app.view.presenter {
        PresenterKind::Log => Ok(Box::new(LogPresenter::new("log"))),
        PresenterKind::Snapshot => {
            let base_path = app.view.snapshot_dir.clone().ok_or_else(|| {
                PublisherError::presenter_creation("snapshot", "view.snapshot_dir is not set")
            })?;
            let presenter = SnapshotPresenter::new(
                "snapshot",
                SnapshotConfig {
                    base_path,
                    every: app.view.snapshot_every,
                    max_presents: None,
                },
            )
            .map_err(|e| PublisherError::presenter_creation("snapshot", e.to_string()))?;
            Ok(Box::new(presenter))
        }
    }
}
