//! The component lifecycle contract.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ComponentError;

/// A unit of simulation behaviour driven by the engine through a
/// three-phase lifecycle.
///
/// The engine calls `initialize` once at the start of a run, `step`
/// once per advance of the time source, and `terminate` once at the
/// end — always in registration order, on a single thread, so side
/// effects of one component are visible to every later component in
/// the same step.
///
/// Implementations needing to end the run early either publish state
/// a [`StopCondition`](crate::stop::StopCondition) watches, or hold an
/// abort handle from the engine and latch it during `step`.
pub trait Component {
    /// Called once when the run starts, with the start time.
    fn initialize(&mut self, time: f64) -> Result<(), ComponentError>;

    /// Called once per step with the current simulation time and the
    /// elapsed interval since the previous step (`0.0` on the first
    /// step of a run).
    fn step(&mut self, time: f64, dt: f64) -> Result<(), ComponentError>;

    /// Called once when the run ends, with the final time.
    fn terminate(&mut self, time: f64) -> Result<(), ComponentError>;
}

/// Shared handle to a component.
///
/// The host owns the component and registers a clone of the handle
/// with the engine; `Rc` identity is what makes duplicate registration
/// detectable.
pub type ComponentHandle = Rc<RefCell<dyn Component>>;
