//! End-to-end scenarios wiring clocks, components, conditions, and the
//! registry through the facade.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use cadence::prelude::*;

/// Component that counts its own steps into a published cell.
struct StepCounter {
    count: StateCell<f64>,
}

impl Component for StepCounter {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.count.set(0.0);
        Ok(())
    }

    fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
        let n = self.count.get();
        self.count.set(n + 1.0);
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        Ok(())
    }
}

#[test]
fn fixed_step_run_hits_the_stop_time_exactly_once_per_step() {
    let count = StateCell::new(0.0_f64);
    let timer: TimerHandle = Rc::new(RefCell::new(FixedClock::new(0.1)));
    let counter: ComponentHandle = Rc::new(RefCell::new(StepCounter {
        count: count.clone(),
    }));
    let deadline = Rc::new(RefCell::new(TimeIsUp::new(10.0)));
    let deadline_handle: StopConditionHandle = deadline.clone();

    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter).unwrap();
    sim.add_stop_condition(&deadline_handle).unwrap();

    let report = sim.run().unwrap();

    // t = 0.0, 0.1, …, 10.0 inclusive.
    assert_eq!(report.steps, 101);
    assert_eq!(count.get(), 101.0);
    assert_eq!(report.stop_code, StopCode::SimEnded);
    assert!(!report.aborted);
    assert!((report.final_time - 10.0).abs() < 0.1);
    // The condition's own code is inspectable after the run.
    assert_eq!(deadline.borrow().code(), StopCode::SimEnded);
}

#[test]
fn accelerated_realtime_run_finishes_in_a_tenth_of_simulated_time() {
    let timer: TimerHandle = Rc::new(RefCell::new(
        RealtimeClock::new(0.1).with_acceleration(10.0),
    ));
    let count = StateCell::new(0.0_f64);
    let counter: ComponentHandle = Rc::new(RefCell::new(StepCounter {
        count: count.clone(),
    }));
    let deadline: StopConditionHandle = Rc::new(RefCell::new(TimeIsUp::new(1.0)));

    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter).unwrap();
    sim.add_stop_condition(&deadline).unwrap();

    let wall_start = Instant::now();
    let report = sim.run().unwrap();
    let wall = wall_start.elapsed().as_secs_f64();

    assert_eq!(report.stop_code, StopCode::SimEnded);
    assert!(report.final_time >= 1.0 - 1e-9);
    // One simulated second at 10x is a tenth of a wall second; leave
    // generous headroom for a loaded host, which only ever slows the
    // run down.
    assert!(wall >= 0.09, "run finished too fast: {wall}s");
    assert!(wall < 1.0, "run paced slower than simulated time: {wall}s");
}

#[test]
fn value_exceed_ends_the_run_with_its_configured_code() {
    let count = StateCell::new(0.0_f64);
    let timer: TimerHandle = Rc::new(RefCell::new(FixedClock::new(1.0)));
    let counter: ComponentHandle = Rc::new(RefCell::new(StepCounter {
        count: count.clone(),
    }));
    let limit: StopConditionHandle = Rc::new(RefCell::new(
        ValueExceed::new(&count, 5.0).with_code(StopCode::ObjectivesReached),
    ));

    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter).unwrap();
    sim.add_stop_condition(&limit).unwrap();

    let report = sim.run().unwrap();
    assert_eq!(report.stop_code, StopCode::ObjectivesReached);
    assert_eq!(count.get(), 5.0);
}

/// Writer handle that leaves the buffer readable after the reporter is
/// registered behind a component handle.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn reporters_observe_the_same_time_step_as_the_model() {
    let count = StateCell::new(0.0_f64);
    let mut registry = Registry::new();
    registry.publish("counter.count", &count);

    let timer: TimerHandle = Rc::new(RefCell::new(FixedClock::new(0.5)));
    let counter: ComponentHandle = Rc::new(RefCell::new(StepCounter {
        count: count.clone(),
    }));
    let buf = SharedBuf::default();
    let mut csv = CsvReporter::new(buf.clone());
    csv.add_from_registry(&registry, "counter.count").unwrap();
    let csv_handle: ComponentHandle = Rc::new(RefCell::new(csv));
    let deadline: StopConditionHandle = Rc::new(RefCell::new(TimeIsUp::new(1.0)));

    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter).unwrap();
    sim.add_component(&csv_handle).unwrap();
    sim.add_stop_condition(&deadline).unwrap();

    sim.run().unwrap();

    // The reporter ran after the counter in each cycle, so each row
    // shows the count already incremented for that step.
    let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
    assert_eq!(
        text,
        "time,timeStepSize,counter.count\n\
         0,0,1\n\
         0.5,0.5,2\n\
         1,0.5,3\n"
    );
}

#[test]
fn snapshot_restores_state_across_runs() {
    let count = StateCell::new(0.0_f64);
    let mut registry = Registry::new();
    registry.publish("counter.count", &count);

    let timer: TimerHandle = Rc::new(RefCell::new(FixedClock::new(1.0)));
    let counter: ComponentHandle = Rc::new(RefCell::new(StepCounter {
        count: count.clone(),
    }));
    let deadline: StopConditionHandle = Rc::new(RefCell::new(TimeIsUp::new(3.0)));

    let mut sim = Loop::new();
    sim.set_timer(&timer).unwrap();
    sim.add_component(&counter).unwrap();
    sim.add_stop_condition(&deadline).unwrap();

    sim.run().unwrap();
    let after_first = registry.capture();
    // t = 0, 1, 2, 3: four steps.
    assert_eq!(after_first.value::<f64>("counter.count"), Some(4.0));

    // A later run re-initializes and re-mutates the state; restoring
    // the snapshot brings back the first run's final value.
    sim.run().unwrap();
    count.set(-1.0);
    registry.restore(&after_first);
    assert_eq!(count.get(), 4.0);
}
