//! Engine error types.
//!
//! Two kinds at the kernel boundary: **Setup** errors (invalid wiring,
//! caught before any component is touched and before status changes)
//! and **Process** errors (an operation requested in the wrong status —
//! host misuse, not a data problem). Component and clock failures
//! surfacing out of a run are carried through [`LoopError`] unchanged.

use std::error::Error;
use std::fmt;

use cadence_core::{ClockError, ComponentError};

use crate::status::Status;

// ── SetupError ──────────────────────────────────────────────────

/// Invalid wiring, rejected synchronously before a run mutates status.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    /// No timer is attached.
    NoTimer,
    /// The component handle is already registered.
    DuplicateComponent,
    /// The stop-condition handle is already registered.
    DuplicateStopCondition,
    /// The timer rejected its own configuration.
    Clock(ClockError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTimer => write!(f, "no timer attached"),
            Self::DuplicateComponent => write!(f, "component is already registered"),
            Self::DuplicateStopCondition => write!(f, "stop condition is already registered"),
            Self::Clock(e) => write!(f, "timer configuration rejected: {e}"),
        }
    }
}

impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Clock(e) => Some(e),
            _ => None,
        }
    }
}

// ── ProcessError ────────────────────────────────────────────────

/// An operation requested while the loop is in the wrong status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessError {
    /// A phase method was entered from the wrong status.
    InvalidStatus {
        /// Status the operation requires.
        expected: Status,
        /// Status the loop was actually in.
        actual: Status,
        /// The rejected operation.
        operation: &'static str,
    },
    /// `abort()` was requested outside `Running`.
    NotRunning {
        /// Status the loop was actually in.
        actual: Status,
    },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStatus {
                expected,
                actual,
                operation,
            } => write!(
                f,
                "{operation} requires status {expected}, but the loop is {actual}"
            ),
            Self::NotRunning { actual } => {
                write!(f, "abort requires status running, but the loop is {actual}")
            }
        }
    }
}

impl Error for ProcessError {}

// ── LoopError ───────────────────────────────────────────────────

/// Any failure surfacing from a [`Loop`](crate::Loop) call.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopError {
    /// Invalid wiring (see [`SetupError`]).
    Setup(SetupError),
    /// Wrong-status misuse (see [`ProcessError`]).
    Process(ProcessError),
    /// A component callback failed; the run was unwound.
    Component(ComponentError),
    /// The timer failed while advancing; the run was unwound.
    Clock(ClockError),
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "setup error: {e}"),
            Self::Process(e) => write!(f, "process error: {e}"),
            Self::Component(e) => write!(f, "component failed: {e}"),
            Self::Clock(e) => write!(f, "clock failed: {e}"),
        }
    }
}

impl Error for LoopError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::Process(e) => Some(e),
            Self::Component(e) => Some(e),
            Self::Clock(e) => Some(e),
        }
    }
}

impl From<SetupError> for LoopError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

impl From<ProcessError> for LoopError {
    fn from(e: ProcessError) -> Self {
        Self::Process(e)
    }
}

impl From<ComponentError> for LoopError {
    fn from(e: ComponentError) -> Self {
        Self::Component(e)
    }
}

impl From<ClockError> for LoopError {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}
