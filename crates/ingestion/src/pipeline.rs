//! Ingestion loop - sensor session to publication slot
//!
//! Runs on its own thread. Polls the session, assembles frames with the
//! `ScanBatcher`, and publishes derived products for every completed frame.
//! Products are computed before the slot lock is taken.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use contracts::{LidarScan, SensorInfo, SensorSession};
use observability::{metrics, FrameSample, MetricsSummary, RunMetricsAggregator};
use publisher::{InputSlot, PublicationSlot};
use scan_products::ProductComputer;
use tracing::{debug, error, info, instrument, warn};

use crate::batcher::{FrameEvent, ScanBatcher};
use crate::config::{IngestionConfig, IngestionMetrics, MetricsSnapshot};
use crate::error::{IngestionError, Result};
use crate::packet::IMU_PACKET_BYTES;

/// Why the loop returned without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The session reported `exit`
    SessionExit,
    /// `max_frames` frames were published
    MaxFrames,
    /// The shared running flag was cleared
    Stopped,
}

/// End-of-run report
#[derive(Debug, Clone)]
pub struct IngestionSummary {
    pub frames_published: u64,
    pub stop_reason: StopReason,
    pub metrics: MetricsSnapshot,
    pub summary: MetricsSummary,
}

/// Producer side of the publication slot
pub struct IngestionLoop<S: SensorSession> {
    session: S,
    info: SensorInfo,
    batcher: ScanBatcher,
    scan: LidarScan,
    computer: ProductComputer,
    slot: Arc<PublicationSlot>,
    input: Arc<InputSlot>,
    running: Arc<AtomicBool>,
    config: IngestionConfig,
    metrics: Arc<IngestionMetrics>,
    aggregator: RunMetricsAggregator,
    sequence: u64,
    last_completed: Option<Instant>,
    last_superseded: u64,
}

impl<S: SensorSession> IngestionLoop<S> {
    pub fn new(
        session: S,
        info: SensorInfo,
        computer: ProductComputer,
        slot: Arc<PublicationSlot>,
        input: Arc<InputSlot>,
        running: Arc<AtomicBool>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            batcher: ScanBatcher::from_info(&info),
            scan: LidarScan::new(info.width(), info.height()),
            session,
            info,
            computer,
            slot,
            input,
            running,
            config,
            metrics: Arc::new(IngestionMetrics::new()),
            aggregator: RunMetricsAggregator::new(),
            sequence: 0,
            last_completed: None,
            last_superseded: 0,
        }
    }

    /// Shared metrics handle, readable while the loop runs
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until the session exits, `max_frames` is reached, or `running`
    /// is cleared
    ///
    /// Always clears `running` on return so the render side stops too.
    #[instrument(name = "ingestion_loop_run", skip(self), fields(sensor = %self.info.prod_sn))]
    pub fn run(mut self) -> Result<IngestionSummary> {
        self.log_banner();

        let outcome = self.run_inner();
        self.running.store(false, Ordering::Release);

        match outcome {
            Ok(stop_reason) => {
                let summary = self.summary(stop_reason);
                info!(
                    frames_published = summary.frames_published,
                    superseded = summary.metrics.frames_superseded,
                    stop_reason = ?stop_reason,
                    "Ingestion loop stopped"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "Ingestion loop failed");
                Err(e)
            }
        }
    }

    fn log_banner(&self) {
        let window = self.info.column_window();
        info!(
            prod_line = %self.info.prod_line,
            prod_sn = %self.info.prod_sn,
            build_rev = %self.info.build_rev,
            lidar_mode = %self.info.lidar_mode,
            udp_profile = %self.info.data_format.udp_profile_lidar,
            columns = self.info.width(),
            rows = self.info.height(),
            columns_per_packet = self.info.data_format.columns_per_packet,
            window_start = window.start,
            window_end = window.end,
            field = %self.computer.field(),
            "Ingestion loop started"
        );
    }

    fn run_inner(&mut self) -> Result<StopReason> {
        // One extra byte so oversized datagrams fail the size check
        let mut lidar_buf = vec![0u8; self.batcher.format().lidar_packet_size() + 1];
        let mut imu_buf = vec![0u8; IMU_PACKET_BYTES + 1];

        while self.running.load(Ordering::Acquire) {
            let state = self.session.poll()?;

            if state.error {
                return Err(IngestionError::Transport(contracts::ContractError::transport(
                    "sensor session reported an error",
                )));
            }
            if state.exit {
                info!("Sensor session ended");
                return Ok(StopReason::SessionExit);
            }
            if state.is_timeout() {
                self.metrics.record_poll_timeout();
                debug!("No packets before poll timeout");
                continue;
            }

            if state.lidar_data {
                let n = self.session.read_lidar_packet(&mut lidar_buf)?;
                self.metrics.record_packet();
                metrics::record_packet_received("lidar");

                let event = match self.batcher.ingest(&lidar_buf[..n], &mut self.scan) {
                    Ok(event) => event,
                    Err(e) => {
                        self.metrics.record_decode_error();
                        metrics::record_decode_error(e.kind());
                        return Err(e);
                    }
                };

                if event == FrameEvent::Completed {
                    self.publish_frame()?;
                    if self
                        .config
                        .max_frames
                        .is_some_and(|max| self.sequence >= max)
                    {
                        info!(frames = self.sequence, "Reached max frames");
                        return Ok(StopReason::MaxFrames);
                    }
                }
            }

            if state.imu_data {
                let n = self.session.read_imu_packet(&mut imu_buf)?;
                self.metrics.record_imu_packet();
                metrics::record_packet_received("imu");
                if n != IMU_PACKET_BYTES {
                    warn!(expected = IMU_PACKET_BYTES, actual = n, "Unexpected IMU packet size");
                }
            }
        }

        Ok(StopReason::Stopped)
    }

    fn publish_frame(&mut self) -> Result<()> {
        let frame_id = self.scan.frame_id().unwrap_or_default();
        let columns_written = self.scan.written_columns();
        let superseded_total = self.batcher.superseded_frames();
        let superseded = superseded_total - self.last_superseded;
        self.last_superseded = superseded_total;

        self.metrics.record_completed();
        self.metrics.set_superseded(superseded_total);
        metrics::record_frame_completed(frame_id, columns_written);
        metrics::record_frames_superseded(superseded);

        let target = self
            .input
            .load()
            .probe_target(self.scan.width(), self.scan.height());
        let probe = self.computer.probe(&self.scan, target);
        if let Some(p) = probe {
            info!(x = p.x, y = p.y, value = p.value, "Probe");
        }

        let started = Instant::now();
        let products = self.computer.compute(&self.scan, self.sequence + 1, probe)?;
        let products_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::record_products_latency_ms(products_ms);

        self.sequence = self.slot.publish(products);
        self.metrics.record_published();
        metrics::record_published(self.sequence);

        let now = Instant::now();
        let interval_ms = self
            .last_completed
            .map(|prev| now.duration_since(prev).as_secs_f64() * 1000.0);
        self.last_completed = Some(now);

        self.aggregator.update(&FrameSample {
            columns_written,
            products_ms,
            interval_ms,
            superseded,
        });

        debug!(
            frame_id,
            sequence = self.sequence,
            columns_written,
            products_ms,
            probe = ?probe,
            "Frame published"
        );
        Ok(())
    }

    fn summary(&self, stop_reason: StopReason) -> IngestionSummary {
        self.metrics.set_superseded(self.batcher.superseded_frames());
        IngestionSummary {
            frames_published: self.sequence,
            stop_reason,
            metrics: self.metrics.snapshot(),
            summary: self.aggregator.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{PacketFormat, PacketWriter, Pixel, COLUMN_VALID};
    use crate::session::MockSession;
    use contracts::{
        ChanField, ClientState, ColumnHeader, ContractError, InputSnapshot, MockConfig,
    };
    use scan_products::XyzLut;
    use std::collections::VecDeque;

    /// Session replaying a fixed list of lidar packets, then exiting
    struct ScriptedSession {
        packets: VecDeque<Vec<u8>>,
        fail_at_end: bool,
    }

    impl SensorSession for ScriptedSession {
        fn poll(&mut self) -> std::result::Result<ClientState, ContractError> {
            if self.packets.is_empty() {
                return Ok(ClientState {
                    exit: !self.fail_at_end,
                    error: self.fail_at_end,
                    ..Default::default()
                });
            }
            Ok(ClientState {
                lidar_data: true,
                ..Default::default()
            })
        }

        fn read_lidar_packet(&mut self, buf: &mut [u8]) -> std::result::Result<usize, ContractError> {
            let packet = self
                .packets
                .pop_front()
                .ok_or_else(|| ContractError::transport("empty"))?;
            buf[..packet.len()].copy_from_slice(&packet);
            Ok(packet.len())
        }

        fn read_imu_packet(&mut self, _buf: &mut [u8]) -> std::result::Result<usize, ContractError> {
            Err(ContractError::transport("no imu"))
        }
    }

    struct Harness {
        info: SensorInfo,
        slot: Arc<PublicationSlot>,
        input: Arc<InputSlot>,
        running: Arc<AtomicBool>,
    }

    impl Harness {
        fn new(width: usize, height: usize) -> Self {
            let mut info = SensorInfo::synthetic(width, height, 20.0);
            info.data_format.columns_per_packet = 2;
            Self {
                slot: Arc::new(PublicationSlot::new(width, height)),
                input: Arc::new(InputSlot::new()),
                running: Arc::new(AtomicBool::new(true)),
                info,
            }
        }

        fn build<S: SensorSession>(&self, session: S, max_frames: Option<u64>) -> IngestionLoop<S> {
            let computer =
                ProductComputer::new(Arc::new(XyzLut::new(&self.info)), ChanField::Range);
            IngestionLoop::new(
                session,
                self.info.clone(),
                computer,
                Arc::clone(&self.slot),
                Arc::clone(&self.input),
                Arc::clone(&self.running),
                IngestionConfig::new(max_frames),
            )
        }
    }

    fn full_frame(format: PacketFormat, frame_id: u16) -> Vec<Vec<u8>> {
        let mut writer = PacketWriter::new(format);
        (0..format.columns_per_frame)
            .collect::<Vec<_>>()
            .chunks(format.columns_per_packet)
            .map(|cols| {
                for col in cols {
                    let header = ColumnHeader {
                        measurement_id: *col as u16,
                        status: COLUMN_VALID,
                        ..Default::default()
                    };
                    let pixels = vec![
                        Pixel {
                            range: 1000 + *col as u32,
                            ..Default::default()
                        };
                        format.pixels_per_column
                    ];
                    writer.push_column(frame_id, header, &pixels);
                }
                writer.finish(frame_id).to_vec()
            })
            .collect()
    }

    #[test]
    fn test_publishes_each_completed_frame() {
        let harness = Harness::new(4, 2);
        let format = PacketFormat::from_info(&harness.info);
        let packets: VecDeque<_> = full_frame(format, 1)
            .into_iter()
            .chain(full_frame(format, 2))
            .collect();

        let summary = harness
            .build(
                ScriptedSession {
                    packets,
                    fail_at_end: false,
                },
                None,
            )
            .run()
            .unwrap();

        assert_eq!(summary.stop_reason, StopReason::SessionExit);
        assert_eq!(summary.frames_published, 2);
        assert_eq!(summary.metrics.packets_received, 4);
        assert_eq!(summary.summary.total_frames, 2);

        let latest = harness.slot.peek_latest();
        assert_eq!(latest.sequence, 2);
        assert_eq!(latest.frame_id, Some(2));
        assert!(!harness.running.load(Ordering::Acquire));
    }

    #[test]
    fn test_probe_follows_input_slot() {
        let harness = Harness::new(4, 2);
        harness.input.store(InputSnapshot {
            x: 3,
            y: 1,
            button: true,
        });
        let format = PacketFormat::from_info(&harness.info);

        harness
            .build(
                ScriptedSession {
                    packets: full_frame(format, 1).into(),
                    fail_at_end: false,
                },
                None,
            )
            .run()
            .unwrap();

        let probe = harness.slot.peek_latest().probe.unwrap();
        assert_eq!((probe.x, probe.y, probe.value), (3, 1, 1003));
    }

    #[test]
    fn test_stops_at_max_frames() {
        let harness = Harness::new(4, 1);
        let format = PacketFormat::from_info(&harness.info);
        let packets: VecDeque<_> = (1..=5).flat_map(|id| full_frame(format, id)).collect();

        let summary = harness
            .build(
                ScriptedSession {
                    packets,
                    fail_at_end: false,
                },
                Some(3),
            )
            .run()
            .unwrap();

        assert_eq!(summary.stop_reason, StopReason::MaxFrames);
        assert_eq!(harness.slot.sequence(), 3);
    }

    #[test]
    fn test_decode_error_is_fatal() {
        let harness = Harness::new(4, 1);
        let err = harness
            .build(
                ScriptedSession {
                    packets: vec![vec![0u8; 5]].into(),
                    fail_at_end: false,
                },
                None,
            )
            .run()
            .unwrap_err();

        assert!(matches!(err, IngestionError::Decode { actual: 5, .. }));
        assert_eq!(harness.slot.sequence(), 0);
        assert!(!harness.running.load(Ordering::Acquire));
    }

    #[test]
    fn test_session_error_is_transport_error() {
        let harness = Harness::new(4, 1);
        let err = harness
            .build(
                ScriptedSession {
                    packets: VecDeque::new(),
                    fail_at_end: true,
                },
                None,
            )
            .run()
            .unwrap_err();
        assert!(matches!(err, IngestionError::Transport(_)));
    }

    #[test]
    fn test_cleared_running_flag_stops_loop() {
        let harness = Harness::new(4, 1);
        harness.running.store(false, Ordering::Release);
        let summary = harness
            .build(
                ScriptedSession {
                    packets: VecDeque::new(),
                    fail_at_end: false,
                },
                None,
            )
            .run()
            .unwrap();
        assert_eq!(summary.stop_reason, StopReason::Stopped);
    }

    #[test]
    fn test_mock_session_with_dropout_supersedes_frames() {
        let harness = Harness::new(16, 2);
        let session = MockSession::new(
            &harness.info,
            MockConfig {
                frames: 6,
                realtime: false,
                dropout_every: 16,
            },
        )
        .unwrap();

        let summary = harness.build(session, None).run().unwrap();

        // 8 packets per frame, so every second frame loses a column. The
        // last partial frame is never followed by a new id.
        assert_eq!(summary.stop_reason, StopReason::SessionExit);
        assert_eq!(summary.frames_published, 3);
        assert_eq!(summary.metrics.frames_superseded, 2);
    }
}
