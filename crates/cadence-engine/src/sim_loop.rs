//! The run orchestrator.
//!
//! [`Loop`] drives the registered components through one or more runs.
//! Each run is three phases, callable individually or together via
//! [`run()`](Loop::run):
//!
//! 1. [`initialize()`](Loop::initialize) — validate wiring, reset the
//!    timer and conditions, initialize every component then condition
//!    in registration order.
//! 2. [`execute()`](Loop::execute) — the advance/step/evaluate cycle
//!    until a stop condition fires or the stop latch is tripped.
//! 3. [`terminate()`](Loop::terminate) — terminate every component
//!    then condition, reset the latch, return to `Stopped`.
//!
//! Registration order is execution order for every phase — a component
//! may rely on the side effects of earlier components within the same
//! step. The loop never retries a failed component: the first error
//! unwinds the run (terminating what was started, best effort) and
//! propagates to the host.

use std::rc::Rc;
use std::sync::Arc;

use cadence_core::{
    ClockError, ComponentError, ComponentHandle, StopCode, StopConditionHandle, TimerHandle,
};

use crate::control::{AbortHandle, SharedState};
use crate::error::{LoopError, ProcessError, SetupError};
use crate::status::Status;

// ── RunReport ───────────────────────────────────────────────────

/// Outcome of a completed (non-erroring) run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    /// Code of the first stop condition that fired, in registration
    /// order; `None` when the run ended through the abort latch.
    pub stop_code: StopCode,
    /// Whether the abort latch ended the run.
    pub aborted: bool,
    /// Number of completed step cycles, the initial `dt = 0` cycle
    /// included.
    pub steps: u64,
    /// Simulation time when the run ended.
    pub final_time: f64,
}

// ── Loop ────────────────────────────────────────────────────────

/// Orchestrator and status machine for a simulation run.
///
/// Constructed empty by the host; a timer, components, and stop
/// conditions are attached while `Stopped`, then [`run()`](Loop::run)
/// drives a full cycle. The loop is reusable: after a run returns to
/// `Stopped` it can run again with the same attachments.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use cadence_clock::FixedClock;
/// use cadence_components::TimeIsUp;
/// use cadence_core::{
///     Component, ComponentError, ComponentHandle, StopCode, StopConditionHandle, TimerHandle,
/// };
/// use cadence_engine::Loop;
///
/// struct Ticker {
///     ticks: u32,
/// }
///
/// impl Component for Ticker {
///     fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
///         self.ticks = 0;
///         Ok(())
///     }
///
///     fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
///         self.ticks += 1;
///         Ok(())
///     }
///
///     fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
///         Ok(())
///     }
/// }
///
/// let ticker = Rc::new(RefCell::new(Ticker { ticks: 0 }));
/// let model: ComponentHandle = ticker.clone();
/// let clock: TimerHandle = Rc::new(RefCell::new(FixedClock::new(0.1)));
/// let deadline: StopConditionHandle = Rc::new(RefCell::new(TimeIsUp::new(1.0)));
///
/// let mut sim = Loop::new();
/// sim.set_timer(&clock).unwrap();
/// sim.add_component(&model).unwrap();
/// sim.add_stop_condition(&deadline).unwrap();
///
/// let report = sim.run().unwrap();
/// assert_eq!(report.stop_code, StopCode::SimEnded);
/// assert_eq!(ticker.borrow().ticks, 11);
/// ```
#[derive(Default)]
pub struct Loop {
    components: Vec<ComponentHandle>,
    conditions: Vec<StopConditionHandle>,
    timer: Option<TimerHandle>,
    shared: Arc<SharedState>,
}

impl Loop {
    /// An empty loop in status `Stopped`.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            conditions: Vec::new(),
            timer: None,
            shared: Arc::new(SharedState::new()),
        }
    }

    // ── Wiring ──────────────────────────────────────────────

    /// Attach (or replace) the timer. Only legal while `Stopped`.
    pub fn set_timer(&mut self, timer: &TimerHandle) -> Result<(), LoopError> {
        self.require(Status::Stopped, "set_timer")?;
        self.timer = Some(Rc::clone(timer));
        Ok(())
    }

    /// Register a component at the end of the execution order.
    ///
    /// # Errors
    ///
    /// [`SetupError::DuplicateComponent`] if the same handle is already
    /// registered (the list is unchanged); a Process error outside
    /// `Stopped`.
    pub fn add_component(&mut self, component: &ComponentHandle) -> Result<(), LoopError> {
        self.require(Status::Stopped, "add_component")?;
        if self.components.iter().any(|c| Rc::ptr_eq(c, component)) {
            return Err(SetupError::DuplicateComponent.into());
        }
        self.components.push(Rc::clone(component));
        Ok(())
    }

    /// Register a stop condition at the end of the evaluation order.
    ///
    /// # Errors
    ///
    /// [`SetupError::DuplicateStopCondition`] for a handle already
    /// registered; a Process error outside `Stopped`.
    pub fn add_stop_condition(&mut self, condition: &StopConditionHandle) -> Result<(), LoopError> {
        self.require(Status::Stopped, "add_stop_condition")?;
        if self.conditions.iter().any(|c| Rc::ptr_eq(c, condition)) {
            return Err(SetupError::DuplicateStopCondition.into());
        }
        self.conditions.push(Rc::clone(condition));
        Ok(())
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of registered stop conditions.
    pub fn stop_condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// The loop's current status.
    pub fn status(&self) -> Status {
        self.shared.status()
    }

    /// A cloneable handle for aborting the run from another thread or
    /// from inside a component.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle::new(Arc::clone(&self.shared))
    }

    /// Trip the stop latch on the running loop.
    ///
    /// The current step cycle completes; no further cycle begins, and
    /// termination still runs exactly once.
    ///
    /// # Errors
    ///
    /// [`ProcessError::NotRunning`] unless the loop is `Running`.
    pub fn abort(&self) -> Result<(), ProcessError> {
        self.shared.request_stop()
    }

    // ── Phases ──────────────────────────────────────────────

    /// Phase 1: validate wiring and initialize every participant.
    ///
    /// Wiring is checked before any component is touched: a missing
    /// timer or a timer that rejects its configuration raises a Setup
    /// error with status still `Stopped`. The timer is then reset, the
    /// latch cleared, every condition's code reset, and `initialize(t0)`
    /// delivered to every component then condition in registration
    /// order.
    ///
    /// # Errors
    ///
    /// A failing component unwinds the phase: every component already
    /// initialized receives `terminate(t0)` (best effort), status
    /// returns to `Stopped`, and the error propagates.
    pub fn initialize(&mut self) -> Result<(), LoopError> {
        self.require(Status::Stopped, "initialize")?;
        let timer = match &self.timer {
            Some(t) => Rc::clone(t),
            None => return Err(SetupError::NoTimer.into()),
        };
        timer.borrow().check().map_err(SetupError::Clock)?;

        self.shared.set_status(Status::Initializing);
        self.shared.stop().clear();
        timer.borrow_mut().reset();
        for condition in &self.conditions {
            condition.borrow_mut().reset();
        }

        let t0 = timer.borrow().time();
        tracing::debug!(
            start_time = t0,
            components = self.components.len(),
            conditions = self.conditions.len(),
            "initializing run"
        );

        for (index, component) in self.components.iter().enumerate() {
            let initialized = component.borrow_mut().initialize(t0);
            if let Err(e) = initialized {
                tracing::debug!(component = index, error = %e, "initialize failed, unwinding");
                Self::terminate_best_effort(&self.components[..index], t0);
                self.shared.set_status(Status::Stopped);
                return Err(e.into());
            }
        }
        for condition in &self.conditions {
            condition.borrow_mut().initialize(t0);
        }

        self.shared.set_status(Status::Initialized);
        Ok(())
    }

    /// Phase 2: the advance/step/evaluate cycle.
    ///
    /// Each cycle: consult the stop latch (tripped → stop, counted as
    /// an abort); ask the timer to advance (a blocked advance that
    /// observes the latch also counts as an abort); `step(t, dt)` every
    /// component in registration order; `evaluate` every condition in
    /// registration order and stop at the first non-`None` code.
    ///
    /// Returns the run's report; status stays `Running` so the host (or
    /// [`run()`](Loop::run)) follows with [`terminate()`](Loop::terminate).
    ///
    /// # Errors
    ///
    /// A component step error or a clock error (other than the latch
    /// wake-up) unwinds the run: every component is terminated (best
    /// effort), status returns to `Stopped`, the error propagates.
    pub fn execute(&mut self) -> Result<RunReport, LoopError> {
        self.require(Status::Initialized, "execute")?;
        let timer = match &self.timer {
            Some(t) => Rc::clone(t),
            None => return Err(SetupError::NoTimer.into()),
        };

        self.shared.set_status(Status::Running);
        let interrupt = self.shared.stop().clone();
        let mut steps: u64 = 0;
        let mut stop_code = StopCode::None;
        let mut aborted = false;

        'cycle: loop {
            if interrupt.is_set() {
                aborted = true;
                break;
            }

            let advanced = timer.borrow_mut().advance(&interrupt);
            let step = match advanced {
                Ok(step) => step,
                Err(ClockError::Interrupted) => {
                    aborted = true;
                    break;
                }
                Err(e) => {
                    self.unwind(timer.borrow().time());
                    return Err(e.into());
                }
            };

            for component in &self.components {
                let stepped = component.borrow_mut().step(step.time, step.dt);
                if let Err(e) = stepped {
                    tracing::debug!(time = step.time, error = %e, "step failed, unwinding");
                    self.unwind(step.time);
                    return Err(e.into());
                }
            }
            steps += 1;

            for condition in &self.conditions {
                condition.borrow_mut().evaluate(step);
            }
            // First registered, first checked; no other precedence.
            for condition in &self.conditions {
                let code = condition.borrow().code();
                if code != StopCode::None {
                    stop_code = code;
                    break 'cycle;
                }
            }
        }

        let final_time = timer.borrow().time();
        tracing::debug!(steps, final_time, %stop_code, aborted, "run finished");
        Ok(RunReport {
            stop_code,
            aborted,
            steps,
            final_time,
        })
    }

    /// Phase 3: terminate every participant and return to `Stopped`.
    ///
    /// `terminate(t)` is delivered to every component then condition in
    /// registration order; the first component error is recorded but
    /// the remaining handles are still terminated. Stop-condition codes
    /// are left readable for host inspection; the next
    /// [`initialize()`](Loop::initialize) resets them.
    pub fn terminate(&mut self) -> Result<(), LoopError> {
        self.require(Status::Running, "terminate")?;
        self.shared.set_status(Status::Terminating);

        let t = match &self.timer {
            Some(timer) => timer.borrow().time(),
            None => 0.0,
        };
        let mut first_error: Option<ComponentError> = None;
        for component in &self.components {
            if let Err(e) = component.borrow_mut().terminate(t) {
                tracing::debug!(error = %e, "terminate failed, continuing");
                first_error.get_or_insert(e);
            }
        }
        for condition in &self.conditions {
            condition.borrow_mut().terminate(t);
        }

        self.shared.stop().clear();
        self.shared.set_status(Status::Stopped);
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// One full run: [`initialize()`](Loop::initialize),
    /// [`execute()`](Loop::execute), [`terminate()`](Loop::terminate).
    ///
    /// On success the loop is back in `Stopped` and can run again with
    /// the same attachments.
    pub fn run(&mut self) -> Result<RunReport, LoopError> {
        self.initialize()?;
        let report = self.execute()?;
        self.terminate()?;
        Ok(report)
    }

    // ── Internals ───────────────────────────────────────────

    fn require(&self, expected: Status, operation: &'static str) -> Result<(), ProcessError> {
        let actual = self.shared.status();
        if actual != expected {
            return Err(ProcessError::InvalidStatus {
                expected,
                actual,
                operation,
            });
        }
        Ok(())
    }

    /// Unwind a failed run: terminate everything (best effort), clear
    /// the latch, return to `Stopped`.
    fn unwind(&self, time: f64) {
        self.shared.set_status(Status::Terminating);
        Self::terminate_best_effort(&self.components, time);
        for condition in &self.conditions {
            condition.borrow_mut().terminate(time);
        }
        self.shared.stop().clear();
        self.shared.set_status(Status::Stopped);
    }

    fn terminate_best_effort(components: &[ComponentHandle], time: f64) {
        for component in components {
            if let Err(e) = component.borrow_mut().terminate(time) {
                tracing::debug!(error = %e, "terminate during unwind failed, continuing");
            }
        }
    }
}
