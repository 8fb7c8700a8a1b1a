//! LogPresenter - logs frame summary via tracing

use contracts::{ContractError, FrameProducts, Presenter};
use tracing::{info, instrument};

/// Presenter that logs product summaries instead of drawing them
pub struct LogPresenter {
    name: String,
    open: bool,
}

impl LogPresenter {
    /// Create a new LogPresenter with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: true,
        }
    }

    fn log_frame_summary(&self, products: &FrameProducts) {
        let valid_points = products.valid_points().count();
        let mean_luminance = if products.image.is_empty() {
            0.0
        } else {
            products.image.iter().map(|v| f64::from(*v)).sum::<f64>() / products.image.len() as f64
        };

        info!(
            presenter = %self.name,
            frame_id = ?products.frame_id,
            sequence = products.sequence,
            field = %products.field,
            valid_points,
            mean_luminance,
            probe = ?products.probe,
            "Frame presented"
        );
    }
}

impl Presenter for LogPresenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.open
    }

    #[instrument(
        name = "log_presenter_present",
        skip(self, products),
        fields(presenter = %self.name, sequence = products.sequence)
    )]
    fn present(&mut self, products: &FrameProducts) -> Result<(), ContractError> {
        self.log_frame_summary(products);
        Ok(())
    }

    #[instrument(name = "log_presenter_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        self.open = false;
        info!(presenter = %self.name, "LogPresenter closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_presenter_present() {
        let mut presenter = LogPresenter::new("test_log");
        let products = FrameProducts::placeholder(4, 2);
        assert!(presenter.present(&products).is_ok());
        assert!(presenter.is_open());
    }

    #[test]
    fn test_log_presenter_close() {
        let mut presenter = LogPresenter::new("my_logger");
        assert_eq!(presenter.name(), "my_logger");
        presenter.close().unwrap();
        assert!(!presenter.is_open());
    }
}
