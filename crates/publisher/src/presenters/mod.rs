//! Presenter implementations
//!
//! Contains LogPresenter and SnapshotPresenter.

mod log;
mod snapshot;

pub use self::log::LogPresenter;
pub use self::snapshot::{SnapshotConfig, SnapshotPresenter};
