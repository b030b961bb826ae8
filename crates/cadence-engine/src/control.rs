//! Shared run state and the cross-thread abort handle.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use cadence_core::Interrupt;

use crate::error::ProcessError;
use crate::status::Status;

/// State shared between the [`Loop`](crate::Loop) and its
/// [`AbortHandle`]s: the current status and the stop latch.
///
/// The latch is the same [`Interrupt`] the timer receives in
/// `advance()`, so tripping it wakes a blocked wait.
pub(crate) struct SharedState {
    status: AtomicU8,
    stop: Interrupt,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            status: AtomicU8::new(Status::Stopped as u8),
            stop: Interrupt::new(),
        }
    }

    pub(crate) fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status.store(status as u8, Ordering::Release);
    }

    pub(crate) fn stop(&self) -> &Interrupt {
        &self.stop
    }

    /// Trip the stop latch, valid only while `Running`.
    ///
    /// The status check and the latch set are two separate atomic
    /// operations; a run that stops between them simply finds the latch
    /// already cleared at its next `initialize()`.
    pub(crate) fn request_stop(&self) -> Result<(), ProcessError> {
        let actual = self.status();
        if actual != Status::Running {
            return Err(ProcessError::NotRunning { actual });
        }
        self.stop.set();
        Ok(())
    }
}

/// Cheap cloneable handle for stopping a run in progress.
///
/// Obtained from [`Loop::abort_handle`](crate::Loop::abort_handle);
/// usable from any thread, or from inside a component that wants to
/// request an early stop without going through a stop condition.
#[derive(Clone)]
pub struct AbortHandle {
    shared: Arc<SharedState>,
}

impl AbortHandle {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Trip the stop latch.
    ///
    /// The in-flight step finishes (remaining components of the current
    /// cycle still execute); no new cycle begins, and termination still
    /// runs exactly once.
    ///
    /// # Errors
    ///
    /// [`ProcessError::NotRunning`] unless the loop is `Running`.
    pub fn abort(&self) -> Result<(), ProcessError> {
        self.shared.request_stop()
    }

    /// The loop's current status.
    pub fn status(&self) -> Status {
        self.shared.status()
    }
}

impl std::fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortHandle")
            .field("status", &self.shared.status())
            .finish()
    }
}
