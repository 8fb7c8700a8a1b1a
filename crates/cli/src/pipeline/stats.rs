//! Pipeline statistics and metrics.

use std::time::Duration;

use ingestion::{IngestionSummary, StopReason};
use observability::MetricsSummary;
use publisher::RenderSnapshot;

/// Statistics from a viewer run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Product sets published by ingestion
    pub frames_published: u64,

    /// Product sets shown by the presenter
    pub frames_presented: u64,

    /// Published sets the render loop never saw
    pub frames_skipped: u64,

    /// Frames abandoned before their window completed
    pub frames_superseded: u64,

    /// Lidar packets received
    pub packets_received: u64,

    /// IMU packets received (discarded)
    pub imu_packets: u64,

    /// Presenter failures
    pub present_failures: u64,

    /// Why ingestion stopped
    pub stop_reason: StopReason,

    /// Total duration of the run
    pub duration: Duration,

    /// Per-frame aggregates from the ingestion loop
    pub summary: MetricsSummary,
}

impl PipelineStats {
    pub fn new(ingestion: IngestionSummary, render: RenderSnapshot, duration: Duration) -> Self {
        Self {
            frames_published: ingestion.frames_published,
            frames_presented: render.presented,
            frames_skipped: render.skipped,
            frames_superseded: ingestion.metrics.frames_superseded,
            packets_received: ingestion.metrics.packets_received,
            imu_packets: ingestion.metrics.imu_packets,
            present_failures: render.failures,
            stop_reason: ingestion.stop_reason,
            duration,
            summary: ingestion.summary,
        }
    }

    /// Published frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_published as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Share of published frames the presenter showed, as a percentage
    pub fn present_rate(&self) -> f64 {
        if self.frames_published > 0 {
            (self.frames_presented as f64 / self.frames_published as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                       Viewer Statistics                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Stop reason: {:?}", self.stop_reason);
        println!("   ├─ Lidar packets: {}", self.packets_received);
        println!("   ├─ IMU packets: {}", self.imu_packets);
        println!("   ├─ Frames published: {}", self.frames_published);
        println!("   └─ FPS: {:.2}", self.fps());

        println!("\nRender");
        println!(
            "   ├─ Frames presented: {} ({:.2}%)",
            self.frames_presented,
            self.present_rate()
        );
        println!("   ├─ Frames skipped: {}", self.frames_skipped);
        println!("   └─ Present failures: {}", self.present_failures);

        println!("\n{}", self.summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingestion::MetricsSnapshot;

    #[test]
    fn test_stats_from_loop_reports() {
        let ingestion = IngestionSummary {
            frames_published: 20,
            stop_reason: StopReason::MaxFrames,
            metrics: MetricsSnapshot {
                packets_received: 1280,
                frames_superseded: 2,
                ..Default::default()
            },
            summary: MetricsSummary::default(),
        };
        let render = RenderSnapshot {
            presented: 15,
            skipped: 5,
            failures: 0,
            last_sequence: 20,
        };

        let stats = PipelineStats::new(ingestion, render, Duration::from_secs(2));
        assert_eq!(stats.fps(), 10.0);
        assert_eq!(stats.present_rate(), 75.0);
        assert_eq!(stats.frames_superseded, 2);
    }
}
