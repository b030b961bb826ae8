//! Time-based stop condition.

use cadence_core::{StopCode, StopCondition, StopLatch, TimeStep, EPS_SIM_TIME};

/// Ends the run with [`StopCode::SimEnded`] once simulation time
/// reaches a configured stop time.
///
/// The comparison carries a small epsilon so a run whose last step
/// lands within floating-point noise of the stop time still ends on
/// that step.
#[derive(Debug)]
pub struct TimeIsUp {
    stop_time: f64,
    latch: StopLatch,
}

impl TimeIsUp {
    /// A condition ending the run at `stop_time` seconds.
    pub fn new(stop_time: f64) -> Self {
        Self {
            stop_time,
            latch: StopLatch::new(),
        }
    }

    /// The configured stop time.
    pub fn stop_time(&self) -> f64 {
        self.stop_time
    }
}

impl StopCondition for TimeIsUp {
    fn evaluate(&mut self, step: TimeStep) {
        if step.time >= self.stop_time - EPS_SIM_TIME {
            self.latch.end();
        }
    }

    fn code(&self) -> StopCode {
        self.latch.code()
    }

    fn reset(&mut self) {
        self.latch.reset();
    }
}
