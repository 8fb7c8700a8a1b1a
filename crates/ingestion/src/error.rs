//! Ingestion error types

use contracts::ContractError;
use scan_products::ProductsError;
use thiserror::Error;

/// Ingestion errors
///
/// All variants end the ingestion loop. Frame anomalies (superseded or
/// partially written frames) are not errors and never surface here.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Packet length does not match the metadata layout
    #[error("malformed lidar packet: expected {expected} bytes, got {actual}")]
    Decode {
        /// Layout size
        expected: usize,
        /// Received size
        actual: usize,
    },

    /// Valid column whose index lies outside the frame
    #[error("column measurement_id {measurement_id} out of range for {columns} columns")]
    InvalidColumn {
        /// Reported measurement id
        measurement_id: u16,
        /// Frame width
        columns: usize,
    },

    /// Sensor session failure
    #[error("sensor transport failure: {0}")]
    Transport(#[from] ContractError),

    /// Product computation failure
    #[error("product computation failed: {0}")]
    Products(#[from] ProductsError),
}

impl IngestionError {
    /// Short label used as a metrics dimension
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::Decode { .. } => "size",
            IngestionError::InvalidColumn { .. } => "measurement_id",
            IngestionError::Transport(_) => "transport",
            IngestionError::Products(_) => "products",
        }
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
