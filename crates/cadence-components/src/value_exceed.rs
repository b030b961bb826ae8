//! Value-threshold stop condition.

use cadence_core::{StopCode, StopCondition, StopLatch, TimeStep};
use cadence_registry::StateCell;

/// Ends the run once a watched state variable exceeds a limit.
///
/// Watches a [`StateCell`] shared with the producing component (or
/// fetched from a registry) and fires a configurable code — by default
/// [`StopCode::SimEnded`] — when the value reaches or passes the limit.
pub struct ValueExceed<T: PartialOrd + Copy + 'static> {
    value: StateCell<T>,
    limit: T,
    code: StopCode,
    latch: StopLatch,
}

impl<T: PartialOrd + Copy + 'static> ValueExceed<T> {
    /// Watch `value` against `limit`, ending the run with
    /// [`StopCode::SimEnded`].
    pub fn new(value: &StateCell<T>, limit: T) -> Self {
        Self {
            value: value.clone(),
            limit,
            code: StopCode::SimEnded,
            latch: StopLatch::new(),
        }
    }

    /// Fire `code` instead of [`StopCode::SimEnded`] when the limit is
    /// reached.
    pub fn with_code(mut self, code: StopCode) -> Self {
        self.code = code;
        self
    }
}

impl<T: PartialOrd + Copy + 'static> StopCondition for ValueExceed<T> {
    fn evaluate(&mut self, _step: TimeStep) {
        if self.value.get() >= self.limit {
            self.latch.stop(self.code);
        }
    }

    fn code(&self) -> StopCode {
        self.latch.code()
    }

    fn reset(&mut self) {
        self.latch.reset();
    }
}
