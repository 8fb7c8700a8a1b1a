//! # Ingestion
//!
//! Sensor packets to published frame products.
//!
//! Responsibilities:
//! - Decode LEGACY lidar packets (`PacketFormat`)
//! - Assemble columns into frames and detect window completion (`ScanBatcher`)
//! - Provide sensor sessions (UDP sockets or a synthetic mock)
//! - Run the producer loop that publishes into the `PublicationSlot`
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{IngestionConfig, IngestionLoop, MockSession};
//!
//! let session = MockSession::new(&info, mock_config)?;
//! let ingestion = IngestionLoop::new(
//!     session, info, computer, slot, input, running, IngestionConfig::default(),
//! );
//! let summary = std::thread::spawn(move || ingestion.run()).join();
//! ```

pub mod batcher;
pub mod completeness;
mod config;
mod error;
pub mod packet;
mod pipeline;
pub mod session;

// Re-exports
pub use batcher::{FrameEvent, ScanBatcher};
pub use completeness::{is_complete, WindowCoverage};
pub use config::{IngestionConfig, IngestionMetrics, MetricsSnapshot};
pub use error::{IngestionError, Result};
pub use packet::{PacketFormat, PacketWriter, Pixel};
pub use pipeline::{IngestionLoop, IngestionSummary, StopReason};
pub use session::{MockSession, UdpConfig, UdpSession};
