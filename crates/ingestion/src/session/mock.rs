//! Mock sensor session
//!
//! Synthesizes LEGACY packets for a room-like scene so the viewer can run
//! without hardware. Packets sweep the full ring in order; only columns
//! inside the metadata column window carry valid data.

use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use contracts::{
    ClientState, ColumnHeader, ColumnWindow, ContractError, MockConfig, SensorInfo, SensorSession,
};
use tracing::{debug, trace};

use crate::packet::{encode_imu_packet, PacketFormat, PacketWriter, Pixel, COLUMN_VALID};

/// One IMU packet per this many lidar packets
const IMU_EVERY: u64 = 10;

/// Encoder ticks per rotation
const ENCODER_TICKS: u64 = 90_112;

/// Mock sensor session
#[derive(Debug)]
pub struct MockSession {
    config: MockConfig,
    format: PacketFormat,
    window: ColumnWindow,
    writer: PacketWriter,
    frame_period: Duration,
    packet_period: Duration,
    next_deadline: Option<Instant>,
    frame_id: u16,
    frames_emitted: u64,
    next_packet: usize,
    packets_sent: u64,
    lidar_pending: Option<Bytes>,
    imu_pending: Option<Bytes>,
}

impl MockSession {
    pub fn new(info: &SensorInfo, config: MockConfig) -> Result<Self, ContractError> {
        let format = PacketFormat::from_info(info);
        if format.columns_per_packet == 0 || format.columns_per_frame == 0 {
            return Err(ContractError::config_validation(
                "data_format",
                "mock session needs a non-empty packet layout",
            ));
        }

        let rate = info.mode()?.frequency_hz.max(1);
        let frame_period = Duration::from_secs_f64(1.0 / f64::from(rate));
        let packet_period = frame_period / format.packets_per_frame() as u32;

        debug!(
            columns = format.columns_per_frame,
            rows = format.pixels_per_column,
            rate_hz = rate,
            frames = config.frames,
            realtime = config.realtime,
            "mock sensor session created"
        );

        Ok(Self {
            writer: PacketWriter::new(format),
            window: info.column_window(),
            config,
            format,
            frame_period,
            packet_period,
            next_deadline: None,
            frame_id: 0,
            frames_emitted: 0,
            next_packet: 0,
            packets_sent: 0,
            lidar_pending: None,
            imu_pending: None,
        })
    }

    /// Frames fully emitted so far
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    fn exhausted(&self) -> bool {
        self.config.frames > 0 && self.frames_emitted >= self.config.frames
    }

    fn pace(&mut self) {
        if !self.config.realtime {
            return;
        }
        let now = Instant::now();
        let deadline = *self.next_deadline.get_or_insert(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline + self.packet_period);
    }

    fn frame_timestamp_ns(&self) -> u64 {
        self.frames_emitted * self.frame_period.as_nanos() as u64
    }

    fn next_lidar_packet(&mut self) -> Bytes {
        let width = self.format.columns_per_frame;
        let cpp = self.format.columns_per_packet;
        let first = self.next_packet * cpp;
        let last = (first + cpp).min(width);

        let dropout = self.config.dropout_every > 0
            && (self.packets_sent + 1) % self.config.dropout_every == 0;
        let column_ns = self.frame_period.as_nanos() as u64 / width as u64;
        let frame_ns = self.frame_timestamp_ns();

        for col in first..last {
            let mut header = ColumnHeader {
                timestamp: frame_ns + col as u64 * column_ns,
                measurement_id: col as u16,
                encoder_count: (col as u64 * ENCODER_TICKS / width as u64) as u32,
                status: COLUMN_VALID,
            };
            if !self.window.contains(col) || (dropout && col == first) {
                header.status = 0;
            }
            let pixels = scene_column(col, width, self.format.pixels_per_column);
            self.writer.push_column(self.frame_id, header, &pixels);
        }
        if dropout {
            trace!(frame_id = self.frame_id, column = first, "mock column dropout");
        }

        let packet = self.writer.finish(self.frame_id);
        self.packets_sent += 1;
        self.next_packet += 1;
        if self.next_packet == self.format.packets_per_frame() {
            self.next_packet = 0;
            self.frames_emitted += 1;
            self.frame_id = self.frame_id.wrapping_add(1);
        }
        packet
    }
}

/// Synthetic scene: a rectangular room seen from its center with a few
/// gaps where nothing returns
fn scene_column(col: usize, width: usize, height: usize) -> Vec<Pixel> {
    let azimuth = std::f64::consts::TAU * col as f64 / width as f64;
    let (half_x, half_y) = (6000.0, 4000.0);
    let wall = (half_x / azimuth.cos().abs()).min(half_y / azimuth.sin().abs());

    (0..height)
        .map(|row| {
            if (row + col) % 23 == 0 {
                return Pixel::default();
            }
            let range = (wall + 50.0 * row as f64) as u32;
            Pixel {
                range,
                reflectivity: ((row * 7 + col) % 256) as u16,
                signal: (range / 16).min(u32::from(u16::MAX)) as u16,
                near_ir: ((col * 3) % 1024) as u16,
            }
        })
        .collect()
}

impl SensorSession for MockSession {
    fn poll(&mut self) -> Result<ClientState, ContractError> {
        if self.lidar_pending.is_none() && self.imu_pending.is_none() {
            if self.exhausted() {
                return Ok(ClientState {
                    exit: true,
                    ..Default::default()
                });
            }
            self.pace();
            self.lidar_pending = Some(self.next_lidar_packet());
            if self.packets_sent % IMU_EVERY == 0 {
                let ts = self.frame_timestamp_ns();
                self.imu_pending = Some(encode_imu_packet(ts, [0.0, 0.0, 1.0], [0.0; 3]));
            }
        }

        Ok(ClientState {
            lidar_data: self.lidar_pending.is_some(),
            imu_data: self.imu_pending.is_some(),
            ..Default::default()
        })
    }

    fn read_lidar_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        let packet = self
            .lidar_pending
            .take()
            .ok_or_else(|| ContractError::transport("no lidar packet pending"))?;
        let n = packet.len().min(buf.len());
        buf[..n].copy_from_slice(&packet[..n]);
        Ok(n)
    }

    fn read_imu_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        let packet = self
            .imu_pending
            .take()
            .ok_or_else(|| ContractError::transport("no imu packet pending"))?;
        let n = packet.len().min(buf.len());
        buf[..n].copy_from_slice(&packet[..n]);
        Ok(n)
    }
}
