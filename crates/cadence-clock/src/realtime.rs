//! Wall-clock-paced time source.

use std::time::{Duration, Instant};

use cadence_core::{ClockError, Interrupt, TimeStep, Timer};

/// Maximum slice slept per poll while waiting out a step, so a raised
/// interrupt is observed within about a millisecond.
const POLL_SLICE: Duration = Duration::from_millis(1);

/// Wall-clock-paced time source.
///
/// Each advance blocks until enough wall time has passed for the next
/// step at the configured acceleration (`acceleration` = simulated
/// seconds per wall second), then reports the accelerated elapsed time
/// since the run started. The wait target is cumulative
/// (`step_size × steps`), so pacing error does not accumulate across
/// steps; `dt` is the actual accelerated interval, which can exceed
/// the step size when the host falls behind. Overrun is not an error —
/// the run simply progresses slower than intended.
#[derive(Clone, Debug)]
pub struct RealtimeClock {
    step_size: f64,
    start_time: f64,
    acceleration: f64,
    time: f64,
    steps: u64,
    wall_ref: Option<Instant>,
}

impl RealtimeClock {
    /// A real-time clock with acceleration 1.0, starting at time zero.
    pub fn new(step_size: f64) -> Self {
        Self {
            step_size,
            start_time: 0.0,
            acceleration: 1.0,
            time: 0.0,
            steps: 0,
            wall_ref: None,
        }
    }

    /// Set the acceleration factor (builder style).
    ///
    /// 1.0 runs in real time; x runs the simulation x times faster
    /// than the wall clock.
    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the start time (builder style).
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self.time = start_time;
        self
    }

    /// The configured step size in seconds.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// The configured acceleration factor.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Accelerated wall time elapsed since the run started.
    fn elapsed(&self, wall_ref: Instant) -> f64 {
        wall_ref.elapsed().as_secs_f64() * self.acceleration
    }
}

impl Timer for RealtimeClock {
    fn check(&self) -> Result<(), ClockError> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ClockError::InvalidStepSize {
                value: self.step_size,
            });
        }
        if !self.acceleration.is_finite() || self.acceleration <= 0.0 {
            return Err(ClockError::InvalidAcceleration {
                value: self.acceleration,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.time = self.start_time;
        self.steps = 0;
        self.wall_ref = None;
    }

    fn advance(&mut self, interrupt: &Interrupt) -> Result<TimeStep, ClockError> {
        let wall_ref = match self.wall_ref {
            None => {
                // First advance: capture the wall reference, report the
                // start time without blocking.
                self.wall_ref = Some(Instant::now());
                return Ok(TimeStep::new(self.start_time, 0.0));
            }
            Some(wall_ref) => wall_ref,
        };

        self.steps += 1;
        let target = self.step_size * self.steps as f64;

        loop {
            let elapsed = self.elapsed(wall_ref);
            if elapsed >= target {
                let previous = self.time;
                self.time = self.start_time + elapsed;
                return Ok(TimeStep::new(self.time, self.time - previous));
            }
            if interrupt.is_set() {
                return Err(ClockError::Interrupted);
            }
            let remaining_wall = Duration::from_secs_f64((target - elapsed) / self.acceleration);
            std::thread::sleep(remaining_wall.min(POLL_SLICE));
        }
    }

    fn time(&self) -> f64 {
        self.time
    }
}
