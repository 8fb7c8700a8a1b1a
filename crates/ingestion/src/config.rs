//! Ingestion loop configuration and metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion loop configuration
#[derive(Debug, Clone, Default)]
pub struct IngestionConfig {
    /// Stop after this many published frames
    pub max_frames: Option<u64>,
}

impl IngestionConfig {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self { max_frames }
    }
}

/// Ingestion metrics
///
/// Written by the ingestion thread only, readable from anywhere.
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Lidar packets read
    pub packets_received: AtomicU64,

    /// IMU packets read and discarded
    pub imu_packets: AtomicU64,

    /// Packets rejected by the decoder
    pub decode_errors: AtomicU64,

    /// Frames whose window was fully covered
    pub frames_completed: AtomicU64,

    /// Frames abandoned before completion
    pub frames_superseded: AtomicU64,

    /// Product sets published to the slot
    pub frames_published: AtomicU64,

    /// Polls that returned with nothing ready
    pub poll_timeouts: AtomicU64,
}

impl IngestionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_packet(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_imu_packet(&self) {
        self.imu_packets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.frames_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Store the batcher's running superseded count
    pub fn set_superseded(&self, count: u64) {
        self.frames_superseded.store(count, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.frames_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_timeout(&self) {
        self.poll_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            imu_packets: self.imu_packets.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            frames_completed: self.frames_completed.load(Ordering::Relaxed),
            frames_superseded: self.frames_superseded.load(Ordering::Relaxed),
            frames_published: self.frames_published.load(Ordering::Relaxed),
            poll_timeouts: self.poll_timeouts.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub packets_received: u64,
    pub imu_packets: u64,
    pub decode_errors: u64,
    pub frames_completed: u64,
    pub frames_superseded: u64,
    pub frames_published: u64,
    pub poll_timeouts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let metrics = IngestionMetrics::new();
        metrics.record_packet();
        metrics.record_packet();
        metrics.record_completed();
        metrics.set_superseded(3);
        metrics.set_superseded(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_received, 2);
        assert_eq!(snapshot.frames_completed, 1);
        assert_eq!(snapshot.frames_superseded, 4);
        assert_eq!(snapshot.decode_errors, 0);
    }
}
