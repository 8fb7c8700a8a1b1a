//! # Scan Products
//!
//! Derives real-time products from completed scans.
//!
//! Responsibilities:
//! - Build the per-pixel geometry table (`XyzLut`)
//! - Normalize one channel into an 8-bit grayscale image
//! - Project the range channel into a point cloud
//!
//! ## Usage
//!
//! ```ignore
//! use scan_products::{ProductComputer, XyzLut};
//!
//! let computer = ProductComputer::new(Arc::new(XyzLut::new(&info)), ChanField::Range);
//! let products = computer.compute(&scan, sequence, None)?;
//! ```

mod cartesian;
mod error;
mod grayscale;
mod lut;
mod products;

pub use cartesian::cartesian;
pub use error::{ProductsError, Result};
pub use grayscale::normalize;
pub use lut::{XyzLut, RANGE_UNIT};
pub use products::{compute_products, ProductComputer};
