//! Presenter trait - render loop output interface

use crate::{ContractError, FrameProducts, InputSnapshot};

/// Display surface driven by the render loop
///
/// All presenter implementations must implement this trait. Calls come
/// from the render thread only.
pub trait Presenter: Send {
    /// Presenter name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Whether the surface is still open; the render loop stops once this
    /// returns `false`
    fn is_open(&self) -> bool;

    /// Current pointer state
    fn input(&self) -> InputSnapshot {
        InputSnapshot::default()
    }

    /// Present one product set
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn present(&mut self, products: &FrameProducts) -> Result<(), ContractError>;

    /// Close the surface
    fn close(&mut self) -> Result<(), ContractError>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn input(&self) -> InputSnapshot {
        (**self).input()
    }

    fn present(&mut self, products: &FrameProducts) -> Result<(), ContractError> {
        (**self).present(products)
    }

    fn close(&mut self) -> Result<(), ContractError> {
        (**self).close()
    }
}
