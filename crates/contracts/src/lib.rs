//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Frame Model
//! - A frame is one sensor rotation identified by a 16-bit `frame_id`
//! - Channels are `H x W` grids (row = beam, column = azimuth step)
//! - Range `0` marks a pixel with no return

mod app_config;
mod channel;
mod column_window;
mod error;
mod metadata;
mod presenter;
mod products;
mod scan;
mod session;

pub use app_config::*;
pub use channel::ChanField;
pub use column_window::ColumnWindow;
pub use error::*;
pub use metadata::*;
pub use presenter::Presenter;
pub use products::*;
pub use scan::{ColumnHeader, LidarScan};
pub use session::{ClientState, SensorSession};
