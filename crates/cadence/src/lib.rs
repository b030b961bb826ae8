//! Cadence: a discrete-time simulation kernel.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Cadence sub-crates. For most users, adding `cadence` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cadence::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // A model with one published state variable.
//! struct Decay {
//!     value: StateCell<f64>,
//! }
//! impl Component for Decay {
//!     fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
//!         self.value.set(1.0);
//!         Ok(())
//!     }
//!     fn step(&mut self, _time: f64, dt: f64) -> Result<(), ComponentError> {
//!         let v = self.value.get();
//!         self.value.set(v - 0.5 * v * dt);
//!         Ok(())
//!     }
//!     fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//! }
//!
//! // Publish the state so hosts can inspect and snapshot it.
//! let value = StateCell::new(1.0_f64);
//! let mut registry = Registry::new();
//! registry.publish("decay.value", &value);
//!
//! // Wire clock, model, and deadline into a loop.
//! let timer: TimerHandle = Rc::new(RefCell::new(FixedClock::new(0.1)));
//! let model: ComponentHandle = Rc::new(RefCell::new(Decay { value: value.clone() }));
//! let deadline: StopConditionHandle = Rc::new(RefCell::new(TimeIsUp::new(1.0)));
//!
//! let mut sim = Loop::new();
//! sim.set_timer(&timer).unwrap();
//! sim.add_component(&model).unwrap();
//! sim.add_stop_condition(&deadline).unwrap();
//!
//! let before = registry.capture();
//! let report = sim.run().unwrap();
//!
//! // t = 0.0, 0.1, …, 1.0 inclusive: eleven steps, regular ending.
//! assert_eq!(report.steps, 11);
//! assert_eq!(report.stop_code, StopCode::SimEnded);
//! assert!(value.get() < 1.0);
//!
//! // Roll the published state back to the pre-run snapshot.
//! registry.restore(&before);
//! assert_eq!(value.get(), 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cadence-core` | Lifecycle traits, stop codes, time types, errors |
//! | [`clock`] | `cadence-clock` | Fixed-step, real-time, and externally driven clocks |
//! | [`registry`] | `cadence-registry` | `StateCell`, `Registry`, snapshot capture/restore |
//! | [`engine`] | `cadence-engine` | The `Loop` state machine, abort handle, run reports |
//! | [`components`] | `cadence-components` | Stop conditions and CSV/JSON/registry reporters |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Lifecycle traits, stop codes, time types, and errors
/// (`cadence-core`).
///
/// Contains the [`types::Component`], [`types::StopCondition`], and
/// [`types::Timer`] traits the rest of the workspace builds on.
pub use cadence_core as types;

/// Time source implementations (`cadence-clock`).
///
/// [`clock::FixedClock`] for pure simulated time,
/// [`clock::RealtimeClock`] for wall-clock-paced runs, and
/// [`clock::ExternalClock`] for runs paced by a remote tick.
pub use cadence_clock as clock;

/// Typed, type-erased state registry (`cadence-registry`).
///
/// Publish [`registry::StateCell`] handles by name, read them back
/// typed, and capture/restore the published state as a
/// [`registry::Snapshot`].
pub use cadence_registry as registry;

/// The run orchestrator (`cadence-engine`).
///
/// [`engine::Loop`] drives components through
/// initialize/step/terminate; [`engine::AbortHandle`] stops a run from
/// another thread.
pub use cadence_engine as engine;

/// Reference components and stop conditions (`cadence-components`).
///
/// Includes [`components::TimeIsUp`], [`components::ValueExceed`], and
/// the CSV/JSON/registry reporters.
pub use cadence_components as components;

/// Common imports for typical Cadence usage.
///
/// ```rust
/// use cadence::prelude::*;
/// ```
pub mod prelude {
    // Lifecycle traits and handles
    pub use cadence_core::{
        Component, ComponentError, ComponentHandle, Interrupt, StopCode, StopCondition,
        StopConditionHandle, StopLatch, TimeStep, Timer, TimerHandle,
    };

    // Clocks
    pub use cadence_clock::{ExternalClock, ExternalClockDriver, FixedClock, RealtimeClock};

    // Registry
    pub use cadence_registry::{Plain, Registry, RegistryError, Snapshot, StateCell};

    // Engine
    pub use cadence_engine::{AbortHandle, Loop, LoopError, RunReport, Status};

    // Reference components
    pub use cadence_components::{
        CsvReporter, JsonReporter, ProgressLogger, RegistryDumper, TimeIsUp, ValueExceed,
    };
}
