//! Core traits and types for the Cadence simulation kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the lifecycle contract every simulation component implements, the
//! time source abstraction, stop conditions with their outcome codes,
//! the cooperative cancellation flag, and the error types shared by
//! the rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod error;
pub mod interrupt;
pub mod stop;
pub mod time;
pub mod timer;

pub use component::{Component, ComponentHandle};
pub use error::{ClockError, ComponentError};
pub use interrupt::Interrupt;
pub use stop::{StopCode, StopCondition, StopConditionHandle, StopLatch};
pub use time::{TimeStep, EPS_SIM_TIME};
pub use timer::{Timer, TimerHandle};
