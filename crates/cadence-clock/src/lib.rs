//! Time source implementations for the Cadence simulation kernel.
//!
//! Three variants of [`cadence_core::Timer`]:
//!
//! - [`FixedClock`] — adds a fixed step size per advance, never blocks.
//! - [`RealtimeClock`] — paces the run against the wall clock with a
//!   configurable acceleration factor.
//! - [`ExternalClock`] — suspends each advance until an external event
//!   (delivered through an [`ExternalClockDriver`]) releases it.
//!
//! All blocking variants observe the engine's [`Interrupt`] so an
//! abort can cancel a pending wait.
//!
//! [`Interrupt`]: cadence_core::Interrupt

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod external;
pub mod fixed;
pub mod realtime;

pub use external::{ExternalClock, ExternalClockDriver, ExternalEvent};
pub use fixed::FixedClock;
pub use realtime::RealtimeClock;
