//! Loop lifecycle status.

use std::fmt;

/// Where the [`Loop`](crate::Loop) is in its lifecycle.
///
/// `Stopped` is both the initial and the between-runs terminal status;
/// the transient statuses are only observable from another thread (via
/// [`AbortHandle::status`](crate::AbortHandle::status)) while a phase
/// method is executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// Not running; registration is permitted.
    Stopped = 0,
    /// Components are receiving `initialize`.
    Initializing = 1,
    /// Initialization finished; ready to execute.
    Initialized = 2,
    /// The advance/step/evaluate cycle is in progress.
    Running = 3,
    /// Components are receiving `terminate`.
    Terminating = 4,
}

impl Status {
    /// Decode a stored discriminant. Values other than the five written
    /// by the loop read back as `Stopped`.
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Initializing,
            2 => Self::Initialized,
            3 => Self::Running,
            4 => Self::Terminating,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Initializing => "initializing",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Terminating => "terminating",
        };
        f.write_str(name)
    }
}
