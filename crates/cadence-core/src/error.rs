//! Error types shared across the Cadence workspace.
//!
//! Component callbacks and time sources report failures through these
//! enums; the engine wraps them at its boundary. Setup and process
//! misuse errors live in `cadence-engine` next to the state machine
//! they protect.

use std::error::Error;
use std::fmt;

/// Error raised by a component lifecycle callback.
///
/// The engine never retries or swallows these: one failing component
/// aborts the whole run and the error propagates to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentError {
    /// The component's callback failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl ComponentError {
    /// Convenience constructor for [`ComponentError::ExecutionFailed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for ComponentError {}

impl From<std::io::Error> for ComponentError {
    fn from(e: std::io::Error) -> Self {
        Self::ExecutionFailed {
            reason: e.to_string(),
        }
    }
}

/// Error from a time source.
#[derive(Clone, Debug, PartialEq)]
pub enum ClockError {
    /// The configured step size is not finite and positive.
    InvalidStepSize {
        /// The offending value.
        value: f64,
    },
    /// The configured acceleration factor is not finite and positive.
    InvalidAcceleration {
        /// The offending value.
        value: f64,
    },
    /// A blocking advance was cancelled through the abort latch.
    Interrupted,
    /// The external event source hung up while an advance was pending,
    /// or the clock side was dropped while driving it.
    Disconnected,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStepSize { value } => {
                write!(f, "step size must be finite and positive, got {value}")
            }
            Self::InvalidAcceleration { value } => {
                write!(f, "acceleration must be finite and positive, got {value}")
            }
            Self::Interrupted => write!(f, "advance interrupted by abort"),
            Self::Disconnected => write!(f, "external event source disconnected"),
        }
    }
}

impl Error for ClockError {}
