//! Orchestration state machine for Cadence simulation runs.
//!
//! [`Loop`] owns the ordered component and stop-condition lists plus the
//! one timer handle, and drives them through the
//! initialize/step/terminate lifecycle. A run is a status-machine walk:
//! `Stopped → Initializing → Initialized → Running → Terminating →
//! Stopped`, with every phase entry checked against the current status.
//!
//! One logical thread drives the loop; the only thing another thread may
//! do is [`AbortHandle::abort`], which trips the cooperative stop latch
//! the timers also observe.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod control;
pub mod error;
pub mod sim_loop;
pub mod status;

pub use control::AbortHandle;
pub use error::{LoopError, ProcessError, SetupError};
pub use sim_loop::{Loop, RunReport};
pub use status::Status;
