//! Cooperative cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap, cloneable cancellation flag.
///
/// The engine sets it from `abort()` (possibly on another thread) and
/// passes it into [`Timer::advance`](crate::timer::Timer::advance) so
/// a blocked time source can wake and let the run unwind. Cancellation
/// is cooperative: nothing is pre-empted, the flag is observed at the
/// next polling point.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// A cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the flag is raised.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear the flag for the next run.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}
