//! The time source abstraction.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ClockError;
use crate::interrupt::Interrupt;
use crate::time::TimeStep;

/// An advancing source of simulation time.
///
/// Exactly one timer paces a run. The engine calls `check` before
/// touching any component (setup validation), `reset` at the start of
/// each run, and `advance` once per step cycle.
///
/// # Contract
///
/// - After `reset`, the first `advance` reports the start time with
///   `dt = 0.0` and must not block.
/// - Subsequent advances report a strictly increasing time. `dt` is
///   the configured step size for a fixed-step source, or the actual
///   (accelerated/external) interval for paced sources.
/// - A blocking `advance` polls `interrupt` and returns
///   [`ClockError::Interrupted`] once it fires; it never reorders or
///   skips component execution, only delays when the next step begins.
pub trait Timer {
    /// Validate the timer's configuration before a run starts.
    ///
    /// The default accepts anything; fixed-step and paced sources
    /// reject non-positive step sizes or accelerations here so the
    /// engine can fail setup before any component is initialized.
    fn check(&self) -> Result<(), ClockError> {
        Ok(())
    }

    /// Rewind to the start time and clear first-step state.
    fn reset(&mut self);

    /// Produce the next time step, blocking if the source is paced.
    fn advance(&mut self, interrupt: &Interrupt) -> Result<TimeStep, ClockError>;

    /// The current simulation time.
    fn time(&self) -> f64;
}

/// Shared handle to a timer.
///
/// The engine holds exactly one of these; the host keeps its own clone
/// for inspection between runs.
pub type TimerHandle = Rc<RefCell<dyn Timer>>;
