//! Lifecycle ordering, reuse, abort, and failure-unwind behavior.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cadence_clock::{ExternalClock, FixedClock};
use cadence_core::{Component, ComponentError, StopCode, StopCondition, TimerHandle};
use cadence_engine::{AbortHandle, Loop, LoopError, Status};
use cadence_test_utils::{
    component, condition, CallLog, CountingComponent, FailPhase, FailingComponent,
    ManualCondition, RecordingComponent, RecordingCondition,
};

fn fixed_timer(step_size: f64) -> TimerHandle {
    Rc::new(RefCell::new(FixedClock::new(step_size)))
}

#[test]
fn registration_order_is_call_order_for_every_phase() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    sim.add_component(&component(RecordingComponent::new("a", &log)))
        .unwrap();
    sim.add_component(&component(RecordingComponent::new("b", &log)))
        .unwrap();
    sim.add_stop_condition(&condition(ManualCondition::stopping_after(
        "stop",
        &log,
        1,
        StopCode::SimEnded,
    )))
    .unwrap();

    sim.run().unwrap();

    assert_eq!(
        log.events(),
        vec![
            "a.initialize",
            "b.initialize",
            "stop.initialize",
            "a.step",
            "b.step",
            "stop.evaluate",
            "a.step",
            "b.step",
            "stop.evaluate",
            "a.terminate",
            "b.terminate",
            "stop.terminate",
        ]
    );
}

#[test]
fn conditions_see_the_zero_dt_first_step_then_the_step_size() {
    let log = CallLog::new();
    let recorder = Rc::new(RefCell::new(RecordingCondition::new()));
    let recorder_handle: cadence_core::StopConditionHandle = recorder.clone();

    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(0.25)).unwrap();
    sim.add_stop_condition(&recorder_handle).unwrap();
    sim.add_stop_condition(&condition(ManualCondition::stopping_after(
        "stop",
        &log,
        2,
        StopCode::SimEnded,
    )))
    .unwrap();

    sim.run().unwrap();

    let steps = recorder.borrow().steps.clone();
    assert_eq!(steps.len(), 3);
    assert_eq!((steps[0].time, steps[0].dt), (0.0, 0.0));
    assert_eq!((steps[1].time, steps[1].dt), (0.25, 0.25));
    assert_eq!((steps[2].time, steps[2].dt), (0.5, 0.25));
}

#[test]
fn loop_is_reusable_across_runs() {
    let log = CallLog::new();
    let counter = Rc::new(RefCell::new(CountingComponent::new()));
    let handle: Rc<RefCell<dyn Component>> = counter.clone();

    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(0.5)).unwrap();
    sim.add_component(&handle).unwrap();
    sim.add_stop_condition(&condition(ManualCondition::stopping_after(
        "stop",
        &log,
        2,
        StopCode::ObjectivesReached,
    )))
    .unwrap();

    let first = sim.run().unwrap();
    let second = sim.run().unwrap();

    assert_eq!(first.stop_code, StopCode::ObjectivesReached);
    // The condition's evaluation counter resets with the run, so the
    // second run stops on the same schedule.
    assert_eq!(second.steps, first.steps);
    assert_eq!(counter.borrow().initialized, 2);
    assert_eq!(counter.borrow().terminated, 2);
    // Timer also restarts: the second run's final time matches.
    assert_eq!(second.final_time, first.final_time);
}

#[test]
fn stop_code_stays_readable_until_next_initialize() {
    let log = CallLog::new();
    let stopper = Rc::new(RefCell::new(ManualCondition::stopping_after(
        "stop",
        &log,
        0,
        StopCode::ObjectivesMissed,
    )));

    let stopper_handle: cadence_core::StopConditionHandle = stopper.clone();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    sim.add_stop_condition(&stopper_handle).unwrap();

    sim.run().unwrap();
    assert_eq!(stopper.borrow().code(), StopCode::ObjectivesMissed);

    sim.initialize().unwrap();
    assert_eq!(stopper.borrow().code(), StopCode::None);
    let report = sim.execute().unwrap();
    sim.terminate().unwrap();
    assert_eq!(report.stop_code, StopCode::ObjectivesMissed);
}

// ── Abort ───────────────────────────────────────────────────────

/// Component that trips the abort latch on its nth step (0-based).
struct AbortingComponent {
    log: CallLog,
    handle: AbortHandle,
    abort_on: usize,
    steps: usize,
}

impl Component for AbortingComponent {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        Ok(())
    }

    fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
        self.log.push("aborter.step");
        if self.steps == self.abort_on {
            self.handle
                .abort()
                .map_err(|e| ComponentError::failed(e.to_string()))?;
        }
        self.steps += 1;
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.log.push("aborter.terminate");
        Ok(())
    }
}

#[test]
fn abort_from_component_finishes_the_current_cycle() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    let aborter = component(AbortingComponent {
        log: log.clone(),
        handle: sim.abort_handle(),
        abort_on: 2,
        steps: 0,
    });
    sim.add_component(&aborter).unwrap();
    sim.add_component(&component(RecordingComponent::new("after", &log)))
        .unwrap();

    let report = sim.run().unwrap();

    assert!(report.aborted);
    assert_eq!(report.stop_code, StopCode::None);
    // The cycle that observed the abort still stepped the later
    // component; no further cycle began; terminate ran exactly once.
    assert_eq!(report.steps, 3);
    let events = log.events();
    assert_eq!(
        events.iter().filter(|e| *e == "after.step").count(),
        3
    );
    assert_eq!(
        events.iter().filter(|e| *e == "aborter.terminate").count(),
        1
    );
    assert_eq!(sim.status(), Status::Stopped);
}

#[test]
fn abort_from_another_thread_wakes_a_blocked_timer() {
    let (clock, driver) = ExternalClock::new(0.1);
    let timer: TimerHandle = Rc::new(RefCell::new(clock));

    let counter = Rc::new(RefCell::new(CountingComponent::new()));
    let counter_handle: Rc<RefCell<dyn Component>> = counter.clone();
    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter_handle).unwrap();

    let abort = sim.abort_handle();
    let aborter = std::thread::spawn(move || {
        // Let the run reach its blocked advance, then stop it.
        while abort.status() != Status::Running {
            std::thread::yield_now();
        }
        std::thread::sleep(Duration::from_millis(20));
        abort.abort().unwrap();
    });

    let report = sim.run().unwrap();
    aborter.join().unwrap();
    drop(driver);

    assert!(report.aborted);
    // The non-blocking first advance delivers one step; the second
    // advance blocks until the abort cancels it.
    assert_eq!(counter.borrow().steps, 1);
    assert_eq!(sim.status(), Status::Stopped);
}

// ── Failure unwinding ──────────────────────────────────────────

#[test]
fn initialize_failure_terminates_already_initialized_components() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    sim.add_component(&component(RecordingComponent::new("first", &log)))
        .unwrap();
    sim.add_component(&component(FailingComponent::new(
        "bad",
        &log,
        FailPhase::Initialize,
    )))
    .unwrap();
    sim.add_component(&component(RecordingComponent::new("last", &log)))
        .unwrap();

    let err = sim.run().unwrap_err();

    assert!(matches!(err, LoopError::Component(_)));
    assert_eq!(sim.status(), Status::Stopped);
    assert_eq!(
        log.events(),
        vec![
            "first.initialize",
            "bad.initialize",
            // Only the component that made it through initialize is
            // unwound; the never-initialized one is untouched.
            "first.terminate",
        ]
    );
}

#[test]
fn step_failure_unwinds_and_leaves_the_loop_reusable() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    let failing = Rc::new(RefCell::new(FailingComponent::new(
        "bad",
        &log,
        FailPhase::Step,
    )));
    failing.borrow_mut().fail_on_step = 1;
    let failing_handle: Rc<RefCell<dyn Component>> = failing.clone();
    sim.add_component(&failing_handle).unwrap();
    sim.add_component(&component(RecordingComponent::new("other", &log)))
        .unwrap();

    let err = sim.run().unwrap_err();
    assert!(matches!(err, LoopError::Component(_)));
    assert_eq!(sim.status(), Status::Stopped);

    let events = log.events();
    // Both components were terminated by the unwind.
    assert!(events.contains(&"bad.terminate".to_string()));
    assert!(events.contains(&"other.terminate".to_string()));
    // After the erroring cycle no further step was delivered.
    assert_eq!(events.iter().filter(|e| *e == "bad.step").count(), 2);
    assert_eq!(events.iter().filter(|e| *e == "other.step").count(), 1);
}

#[test]
fn timer_check_failure_precedes_component_contact() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(0.0)).unwrap();
    sim.add_component(&component(RecordingComponent::new("c", &log)))
        .unwrap();

    let err = sim.run().unwrap_err();
    assert!(matches!(err, LoopError::Setup(_)));
    assert_eq!(sim.status(), Status::Stopped);
    assert!(log.is_empty());
}

#[test]
fn registration_is_rejected_between_initialize_and_terminate() {
    let log = CallLog::new();
    let mut sim = Loop::new();
    sim.set_timer(&fixed_timer(1.0)).unwrap();
    sim.add_stop_condition(&condition(ManualCondition::stopping_after(
        "stop",
        &log,
        0,
        StopCode::SimEnded,
    )))
    .unwrap();
    sim.initialize().unwrap();

    assert!(matches!(
        sim.add_component(&component(CountingComponent::new())),
        Err(LoopError::Process(_))
    ));
    assert!(matches!(
        sim.set_timer(&fixed_timer(1.0)),
        Err(LoopError::Process(_))
    ));
    assert_eq!(sim.component_count(), 0);

    sim.execute().unwrap();
    sim.terminate().unwrap();
    assert_eq!(sim.status(), Status::Stopped);
}
