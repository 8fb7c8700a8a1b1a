//! Product computation errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsError {
    /// Scan and geometry table were built for different sensors
    #[error("scan is {scan_width}x{scan_height} but geometry table is {lut_width}x{lut_height}")]
    ShapeMismatch {
        scan_width: usize,
        scan_height: usize,
        lut_width: usize,
        lut_height: usize,
    },
}

pub type Result<T> = std::result::Result<T, ProductsError>;
