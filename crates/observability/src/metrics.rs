//! Viewer metrics collection
//!
//! Prometheus recorders for the ingestion and render loops, plus an
//! in-memory aggregator for the end-of-run summary.

use metrics::{counter, gauge, histogram};

/// Record a packet read from the sensor session
///
/// `kind` is `"lidar"` or `"imu"`.
pub fn record_packet_received(kind: &'static str) {
    counter!("lidar_view_packets_received_total", "kind" => kind).increment(1);
}

/// Record a packet rejected by the decoder
pub fn record_decode_error(reason: &'static str) {
    counter!("lidar_view_decode_errors_total", "reason" => reason).increment(1);
}

/// Record a completed frame
pub fn record_frame_completed(frame_id: u16, columns_written: usize) {
    counter!("lidar_view_frames_completed_total").increment(1);
    gauge!("lidar_view_last_frame_id").set(f64::from(frame_id));
    histogram!("lidar_view_frame_columns_written").record(columns_written as f64);
}

/// Record frames abandoned before their window completed
pub fn record_frames_superseded(count: u64) {
    if count > 0 {
        counter!("lidar_view_frames_superseded_total").increment(count);
    }
}

/// Record time spent deriving products from one scan
pub fn record_products_latency_ms(latency_ms: f64) {
    histogram!("lidar_view_products_latency_ms").record(latency_ms);
}

/// Record the sequence number of the latest published product set
pub fn record_published(sequence: u64) {
    gauge!("lidar_view_published_sequence").set(sequence as f64);
}

/// Record a presenter call
pub fn record_frame_presented(presenter: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "lidar_view_frames_presented_total",
        "presenter" => presenter.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record published product sets the render loop never presented
pub fn record_frames_skipped(count: u64) {
    if count > 0 {
        counter!("lidar_view_frames_skipped_total").increment(count);
    }
}

/// Per-frame figures fed into the aggregator
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSample {
    /// Columns written when the window completed
    pub columns_written: usize,
    /// Product computation time
    pub products_ms: f64,
    /// Time since the previous completed frame
    pub interval_ms: Option<f64>,
    /// Frames superseded since the previous completed frame
    pub superseded: u64,
}

/// Run metrics aggregator
///
/// Aggregates in memory for the summary printed at shutdown.
#[derive(Debug, Clone, Default)]
pub struct RunMetricsAggregator {
    /// Completed frames
    pub total_frames: u64,

    /// Frames abandoned on rollover
    pub total_superseded: u64,

    /// Columns written per completed frame
    pub columns_stats: RunningStats,

    /// Product computation latency (ms)
    pub products_stats: RunningStats,

    /// Interval between completed frames (ms)
    pub interval_stats: RunningStats,
}

impl RunMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed frame into the totals
    pub fn update(&mut self, sample: &FrameSample) {
        self.total_frames += 1;
        self.total_superseded += sample.superseded;
        self.columns_stats.push(sample.columns_written as f64);
        self.products_stats.push(sample.products_ms);
        if let Some(interval) = sample.interval_ms {
            self.interval_stats.push(interval);
        }
    }

    /// Generate summary report
    pub fn summary(&self) -> MetricsSummary {
        let attempted = self.total_frames + self.total_superseded;
        MetricsSummary {
            total_frames: self.total_frames,
            total_superseded: self.total_superseded,
            supersede_rate: if attempted > 0 {
                self.total_superseded as f64 / attempted as f64 * 100.0
            } else {
                0.0
            },
            frame_rate_hz: if self.interval_stats.count() > 0 && self.interval_stats.mean() > 0.0 {
                1000.0 / self.interval_stats.mean()
            } else {
                0.0
            },
            columns_written: StatsSummary::from(&self.columns_stats),
            products_ms: StatsSummary::from(&self.products_stats),
            interval_ms: StatsSummary::from(&self.interval_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub total_superseded: u64,
    pub supersede_rate: f64,
    pub frame_rate_hz: f64,
    pub columns_written: StatsSummary,
    pub products_ms: StatsSummary,
    pub interval_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Scan Metrics Summary ===")?;
        writeln!(f, "Completed frames: {}", self.total_frames)?;
        writeln!(
            f,
            "Superseded frames: {} ({:.2}%)",
            self.total_superseded, self.supersede_rate
        )?;
        writeln!(f, "Frame rate (Hz): {:.2}", self.frame_rate_hz)?;
        writeln!(f, "Columns written: {}", self.columns_written)?;
        writeln!(f, "Products latency (ms): {}", self.products_ms)?;
        writeln!(f, "Frame interval (ms): {}", self.interval_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(value);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = RunMetricsAggregator::new();

        aggregator.update(&FrameSample {
            columns_written: 1024,
            products_ms: 2.0,
            interval_ms: None,
            superseded: 1,
        });
        aggregator.update(&FrameSample {
            columns_written: 1024,
            products_ms: 4.0,
            interval_ms: Some(100.0),
            superseded: 0,
        });

        assert_eq!(aggregator.total_frames, 2);
        assert_eq!(aggregator.total_superseded, 1);

        let summary = aggregator.summary();
        assert!((summary.frame_rate_hz - 10.0).abs() < 1e-9);
        assert!((summary.products_ms.mean - 3.0).abs() < 1e-9);
        assert!((summary.supersede_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_display() {
        let summary = MetricsSummary {
            total_frames: 100,
            total_superseded: 5,
            supersede_rate: 4.76,
            frame_rate_hz: 10.0,
            columns_written: StatsSummary {
                count: 100,
                min: 1024.0,
                max: 1024.0,
                mean: 1024.0,
                std_dev: 0.0,
            },
            products_ms: StatsSummary::default(),
            interval_ms: StatsSummary::default(),
        };

        let output = format!("{}", summary);
        assert!(output.contains("Completed frames: 100"));
        assert!(output.contains("4.76%"));
        assert!(output.contains("Products latency (ms): N/A"));
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No global recorder installed; calls are no-ops
        record_packet_received("lidar");
        record_decode_error("size");
        record_frame_completed(7, 1024);
        record_frames_superseded(0);
        record_frame_presented("log", true);
    }
}
