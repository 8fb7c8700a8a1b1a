//! PublicationSlot - latest completed product set
//!
//! Single producer (ingestion thread), any number of readers. The lock is
//! held only to swap or clone an `Arc`; product sets are built and wrapped
//! before the lock is taken.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::FrameProducts;
use tracing::trace;

/// Shared slot holding the most recently published products
#[derive(Debug)]
pub struct PublicationSlot {
    latest: Mutex<Arc<FrameProducts>>,
}

impl PublicationSlot {
    /// Create a slot seeded with the `width x height` placeholder
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            latest: Mutex::new(Arc::new(FrameProducts::placeholder(width, height))),
        }
    }

    /// Replace the current set, returning its sequence number
    pub fn publish(&self, products: FrameProducts) -> u64 {
        let products = Arc::new(products);
        let sequence = products.sequence;

        let previous = {
            let mut latest = self.lock();
            std::mem::replace(&mut *latest, products)
        };
        debug_assert!(
            previous.sequence < sequence,
            "publish sequence must increase"
        );

        trace!(sequence, "products published");
        sequence
    }

    /// Most recently published set, or the placeholder before the first
    /// publish
    pub fn peek_latest(&self) -> Arc<FrameProducts> {
        Arc::clone(&self.lock())
    }

    /// Sequence of the current set (`0` for the placeholder)
    pub fn sequence(&self) -> u64 {
        self.lock().sequence
    }

    // The guarded value is a single `Arc`, always whole
    fn lock(&self) -> MutexGuard<'_, Arc<FrameProducts>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
