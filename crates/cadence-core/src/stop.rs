//! Stop conditions and run outcome codes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::time::TimeStep;

/// Outcome code a stop condition can end a run with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StopCode {
    /// Still running; no stop requested.
    #[default]
    None,
    /// Ordinary time-based conclusion.
    SimEnded,
    /// The run's objectives were reached.
    ObjectivesReached,
    /// The run's objectives were missed.
    ObjectivesMissed,
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::SimEnded => write!(f, "sim ended"),
            Self::ObjectivesReached => write!(f, "objectives reached"),
            Self::ObjectivesMissed => write!(f, "objectives missed"),
        }
    }
}

/// Set-at-most-once-per-run holder for a [`StopCode`].
///
/// The first verb to fire wins; later calls are no-ops until the latch
/// is reset for the next run. Stop condition implementations embed one
/// of these and fire it from `evaluate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StopLatch {
    code: StopCode,
}

impl StopLatch {
    /// A cleared latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// The code set this run, or [`StopCode::None`].
    pub fn code(&self) -> StopCode {
        self.code
    }

    /// Whether any code has been set this run.
    pub fn is_set(&self) -> bool {
        self.code != StopCode::None
    }

    /// Set an explicit code. Returns `false` if a code was already set
    /// this run (first setter wins) or if `code` is [`StopCode::None`].
    pub fn stop(&mut self, code: StopCode) -> bool {
        if self.code != StopCode::None || code == StopCode::None {
            return false;
        }
        self.code = code;
        true
    }

    /// End the run regularly ([`StopCode::SimEnded`]).
    pub fn end(&mut self) -> bool {
        self.stop(StopCode::SimEnded)
    }

    /// End the run successfully ([`StopCode::ObjectivesReached`]).
    pub fn success(&mut self) -> bool {
        self.stop(StopCode::ObjectivesReached)
    }

    /// End the run as failed ([`StopCode::ObjectivesMissed`]).
    pub fn fail(&mut self) -> bool {
        self.stop(StopCode::ObjectivesMissed)
    }

    /// Clear the latch for the next run.
    pub fn reset(&mut self) {
        self.code = StopCode::None;
    }
}

/// A predicate polled by the engine after every step, able to end the
/// run with an outcome code.
///
/// The engine calls `reset` and `initialize` at the start of a run,
/// `evaluate` after each component step cycle, and `terminate` at the
/// end — in registration order. The engine imposes no precedence among
/// conditions firing in the same step beyond first registered, first
/// checked.
pub trait StopCondition {
    /// Called once when the run starts, after `reset`.
    fn initialize(&mut self, time: f64) {
        let _ = time;
    }

    /// Polled after every step cycle; implementations fire their
    /// embedded [`StopLatch`] here.
    fn evaluate(&mut self, step: TimeStep);

    /// Called once when the run ends.
    fn terminate(&mut self, time: f64) {
        let _ = time;
    }

    /// The code set this run, or [`StopCode::None`].
    fn code(&self) -> StopCode;

    /// Clear the condition's code for the next run.
    fn reset(&mut self);

    /// Whether this condition has requested a stop.
    fn has_stopped(&self) -> bool {
        self.code() != StopCode::None
    }
}

/// Shared handle to a stop condition, mirroring
/// [`ComponentHandle`](crate::component::ComponentHandle).
pub type StopConditionHandle = Rc<RefCell<dyn StopCondition>>;
