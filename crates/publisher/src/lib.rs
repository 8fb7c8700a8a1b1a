//! # Publisher
//!
//! Hand-off between the ingestion and render threads.
//!
//! Responsibilities:
//! - Hold the latest completed `FrameProducts` (`PublicationSlot`)
//! - Carry pointer state back to ingestion (`InputSlot`)
//! - Drive a `Presenter` at a fixed cadence without blocking ingestion

pub mod error;
pub mod input;
pub mod metrics;
pub mod presenters;
pub mod render;
pub mod rgba;
pub mod slot;

pub use contracts::{FrameProducts, Presenter};
pub use error::PublisherError;
pub use input::InputSlot;
pub use metrics::{RenderMetrics, RenderSnapshot};
pub use presenters::{LogPresenter, SnapshotConfig, SnapshotPresenter};
pub use render::{RenderConfig, RenderLoop};
pub use rgba::{to_rgba_image, PROBE_COLOR};
pub use slot::PublicationSlot;
