//! Lidar packet codec (LEGACY profile)
//!
//! A packet is `columns_per_packet` column blocks:
//!
//! ```text
//! header  16 B  timestamp u64 | measurement_id u16 | frame_id u16 | encoder u32
//! pixels  12 B  range u32 (low 20 bits, mm) | reflectivity u16 | signal u16
//!               | near_ir u16 | reserved u16              (x pixels_per_column)
//! status   4 B  0xFFFF_FFFF when the column is valid
//! ```
//!
//! All fields are little-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use contracts::{ColumnHeader, SensorInfo};

use crate::error::{IngestionError, Result};

pub const COLUMN_HEADER_BYTES: usize = 16;
pub const PIXEL_BYTES: usize = 12;
pub const COLUMN_STATUS_BYTES: usize = 4;
pub const COLUMN_VALID: u32 = 0xFFFF_FFFF;
pub const RANGE_MASK: u32 = 0x000F_FFFF;
pub const IMU_PACKET_BYTES: usize = 48;

/// Offset of `frame_id` inside a column header
const FRAME_ID_OFFSET: usize = 10;

/// One decoded pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub range: u32,
    pub reflectivity: u16,
    pub signal: u16,
    pub near_ir: u16,
}

/// One column block borrowed from a packet
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub header: ColumnHeader,
    pub frame_id: u16,
    pixels: &'a [u8],
}

impl<'a> Column<'a> {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.header.status == COLUMN_VALID
    }

    /// Decoded pixels, row 0 first
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + 'a {
        self.pixels.chunks_exact(PIXEL_BYTES).map(|mut raw| Pixel {
            range: raw.get_u32_le() & RANGE_MASK,
            reflectivity: raw.get_u16_le(),
            signal: raw.get_u16_le(),
            near_ir: raw.get_u16_le(),
        })
    }
}

/// Packet layout derived from sensor metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketFormat {
    pub columns_per_packet: usize,
    pub pixels_per_column: usize,
    pub columns_per_frame: usize,
}

impl PacketFormat {
    pub fn new(columns_per_packet: usize, pixels_per_column: usize, columns_per_frame: usize) -> Self {
        Self {
            columns_per_packet,
            pixels_per_column,
            columns_per_frame,
        }
    }

    pub fn from_info(info: &SensorInfo) -> Self {
        Self::new(
            info.data_format.columns_per_packet,
            info.height(),
            info.width(),
        )
    }

    /// Bytes per column block
    #[inline]
    pub fn column_bytes(&self) -> usize {
        COLUMN_HEADER_BYTES + self.pixels_per_column * PIXEL_BYTES + COLUMN_STATUS_BYTES
    }

    /// Bytes per lidar packet
    #[inline]
    pub fn lidar_packet_size(&self) -> usize {
        self.columns_per_packet * self.column_bytes()
    }

    /// Packets needed to cover a full rotation
    pub fn packets_per_frame(&self) -> usize {
        self.columns_per_frame.div_ceil(self.columns_per_packet.max(1))
    }

    /// Reject packets whose length does not match the layout
    pub fn check_size(&self, packet: &[u8]) -> Result<()> {
        let expected = self.lidar_packet_size();
        if packet.len() != expected {
            return Err(IngestionError::Decode {
                expected,
                actual: packet.len(),
            });
        }
        Ok(())
    }

    /// Frame id of a size-checked packet (taken from its first column)
    pub fn frame_id(&self, packet: &[u8]) -> u16 {
        (&packet[FRAME_ID_OFFSET..]).get_u16_le()
    }

    /// Iterate the column blocks of a size-checked packet
    pub fn columns<'a>(&self, packet: &'a [u8]) -> impl Iterator<Item = Column<'a>> + 'a {
        let pixel_bytes = self.pixels_per_column * PIXEL_BYTES;
        packet
            .chunks_exact(self.column_bytes())
            .map(move |block| {
                let mut head = &block[..COLUMN_HEADER_BYTES];
                let timestamp = head.get_u64_le();
                let measurement_id = head.get_u16_le();
                let frame_id = head.get_u16_le();
                let encoder_count = head.get_u32_le();

                let pixels = &block[COLUMN_HEADER_BYTES..COLUMN_HEADER_BYTES + pixel_bytes];
                let status = (&block[COLUMN_HEADER_BYTES + pixel_bytes..]).get_u32_le();

                Column {
                    header: ColumnHeader {
                        timestamp,
                        measurement_id,
                        encoder_count,
                        status,
                    },
                    frame_id,
                    pixels,
                }
            })
    }
}

/// Encodes packets in the LEGACY layout
///
/// Columns not pushed before `finish` are emitted with an invalid status.
#[derive(Debug)]
pub struct PacketWriter {
    format: PacketFormat,
    buf: BytesMut,
    columns: usize,
}

impl PacketWriter {
    pub fn new(format: PacketFormat) -> Self {
        Self {
            format,
            buf: BytesMut::with_capacity(format.lidar_packet_size()),
            columns: 0,
        }
    }

    pub fn format(&self) -> &PacketFormat {
        &self.format
    }

    /// Append one column block
    ///
    /// Missing pixels are zero-filled, extra pixels are ignored. Columns
    /// beyond `columns_per_packet` are dropped.
    pub fn push_column(&mut self, frame_id: u16, header: ColumnHeader, pixels: &[Pixel]) {
        if self.columns == self.format.columns_per_packet {
            return;
        }

        self.buf.put_u64_le(header.timestamp);
        self.buf.put_u16_le(header.measurement_id);
        self.buf.put_u16_le(frame_id);
        self.buf.put_u32_le(header.encoder_count);

        for row in 0..self.format.pixels_per_column {
            let px = pixels.get(row).copied().unwrap_or_default();
            self.buf.put_u32_le(px.range & RANGE_MASK);
            self.buf.put_u16_le(px.reflectivity);
            self.buf.put_u16_le(px.signal);
            self.buf.put_u16_le(px.near_ir);
            self.buf.put_u16_le(0);
        }

        self.buf.put_u32_le(header.status);
        self.columns += 1;
    }

    /// Pad to a full packet and take the encoded bytes
    pub fn finish(&mut self, frame_id: u16) -> Bytes {
        while self.columns < self.format.columns_per_packet {
            self.push_column(frame_id, ColumnHeader::default(), &[]);
        }
        self.columns = 0;
        self.buf.split().freeze()
    }
}

/// Encode an IMU packet
///
/// Three timestamps (ns) followed by acceleration (g) and angular
/// velocity (deg/s).
pub fn encode_imu_packet(timestamp: u64, accel: [f32; 3], gyro: [f32; 3]) -> Bytes {
    let mut buf = BytesMut::with_capacity(IMU_PACKET_BYTES);
    for _ in 0..3 {
        buf.put_u64_le(timestamp);
    }
    for v in accel.iter().chain(gyro.iter()) {
        buf.put_f32_le(*v);
    }
    buf.freeze()
}
