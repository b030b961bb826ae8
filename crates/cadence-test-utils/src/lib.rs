//! Test utilities and mock types for Cadence development.
//!
//! Provides instrumented implementations of the core traits
//! ([`Component`], [`StopCondition`]) plus a shared [`CallLog`] for
//! asserting call ordering across several participants of a run.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::{
    Component, ComponentError, ComponentHandle, StopCode, StopCondition, StopConditionHandle,
    TimeStep,
};

/// Wrap a component in the shared handle the engine registers.
pub fn component<C: Component + 'static>(inner: C) -> ComponentHandle {
    Rc::new(RefCell::new(inner))
}

/// Wrap a stop condition in the shared handle the engine registers.
pub fn condition<C: StopCondition + 'static>(inner: C) -> StopConditionHandle {
    Rc::new(RefCell::new(inner))
}

/// Shared, ordered record of lifecycle events.
///
/// Clones alias the same log, so several mocks registered with one
/// engine can append interleaved entries and a test can assert the
/// global ordering afterwards.
#[derive(Clone, Default)]
pub struct CallLog {
    events: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    /// All events logged so far, in order.
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Component that appends `"<name>.initialize"`, `"<name>.step"`, and
/// `"<name>.terminate"` entries to a [`CallLog`].
pub struct RecordingComponent {
    name: String,
    log: CallLog,
}

impl RecordingComponent {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl Component for RecordingComponent {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.initialize", self.name));
        Ok(())
    }

    fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.step", self.name));
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.terminate", self.name));
        Ok(())
    }
}

/// Component that counts lifecycle calls and remembers the last
/// `(time, dt)` it was stepped with.
#[derive(Default)]
pub struct CountingComponent {
    pub initialized: usize,
    pub steps: usize,
    pub terminated: usize,
    pub last_time: f64,
    pub last_dt: f64,
}

impl CountingComponent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for CountingComponent {
    fn initialize(&mut self, time: f64) -> Result<(), ComponentError> {
        self.initialized += 1;
        self.last_time = time;
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), ComponentError> {
        self.steps += 1;
        self.last_time = time;
        self.last_dt = dt;
        Ok(())
    }

    fn terminate(&mut self, time: f64) -> Result<(), ComponentError> {
        self.terminated += 1;
        self.last_time = time;
        Ok(())
    }
}

/// Which lifecycle phase a [`FailingComponent`] fails in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPhase {
    Initialize,
    Step,
    Terminate,
}

/// Component that returns an error from one chosen phase and logs its
/// calls like [`RecordingComponent`].
pub struct FailingComponent {
    name: String,
    log: CallLog,
    phase: FailPhase,
    /// For [`FailPhase::Step`]: fail on the nth step call (0-based).
    pub fail_on_step: usize,
    steps_seen: usize,
}

impl FailingComponent {
    pub fn new(name: impl Into<String>, log: &CallLog, phase: FailPhase) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            phase,
            fail_on_step: 0,
            steps_seen: 0,
        }
    }

    fn fail(&self) -> Result<(), ComponentError> {
        Err(ComponentError::failed(format!("{} induced failure", self.name)))
    }
}

impl Component for FailingComponent {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.initialize", self.name));
        if self.phase == FailPhase::Initialize {
            return self.fail();
        }
        Ok(())
    }

    fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.step", self.name));
        let n = self.steps_seen;
        self.steps_seen += 1;
        if self.phase == FailPhase::Step && n >= self.fail_on_step {
            return self.fail();
        }
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.log.push(format!("{}.terminate", self.name));
        if self.phase == FailPhase::Terminate {
            return self.fail();
        }
        Ok(())
    }
}

/// Stop condition that stops with a chosen code after a fixed number
/// of evaluations, and appends its calls to a [`CallLog`].
pub struct ManualCondition {
    name: String,
    log: CallLog,
    stop_after: Option<usize>,
    stop_with: StopCode,
    evaluations: usize,
    code: StopCode,
}

impl ManualCondition {
    /// A condition that never stops on its own.
    pub fn passive(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            stop_after: None,
            stop_with: StopCode::None,
            evaluations: 0,
            code: StopCode::None,
        }
    }

    /// A condition that stops with `code` on its nth evaluation
    /// (0-based).
    pub fn stopping_after(
        name: impl Into<String>,
        log: &CallLog,
        evaluations: usize,
        code: StopCode,
    ) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            stop_after: Some(evaluations),
            stop_with: code,
            evaluations: 0,
            code: StopCode::None,
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

impl StopCondition for ManualCondition {
    fn initialize(&mut self, _time: f64) {
        self.log.push(format!("{}.initialize", self.name));
    }

    fn evaluate(&mut self, _step: TimeStep) {
        self.log.push(format!("{}.evaluate", self.name));
        let n = self.evaluations;
        self.evaluations += 1;
        if self.code == StopCode::None {
            if let Some(after) = self.stop_after {
                if n >= after {
                    self.code = self.stop_with;
                }
            }
        }
    }

    fn terminate(&mut self, _time: f64) {
        self.log.push(format!("{}.terminate", self.name));
    }

    fn code(&self) -> StopCode {
        self.code
    }

    fn reset(&mut self) {
        self.code = StopCode::None;
        self.evaluations = 0;
    }
}

/// Stop condition that records every [`TimeStep`] it is asked to
/// evaluate. Never stops.
#[derive(Default)]
pub struct RecordingCondition {
    pub steps: Vec<TimeStep>,
}

impl RecordingCondition {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StopCondition for RecordingCondition {
    fn evaluate(&mut self, step: TimeStep) {
        self.steps.push(step);
    }

    fn code(&self) -> StopCode {
        StopCode::None
    }

    fn reset(&mut self) {
        self.steps.clear();
    }
}
