//! Fixed-step time source.

use cadence_core::{ClockError, Interrupt, TimeStep, Timer};

/// Fixed-step time source.
///
/// Each advance adds exactly the configured step size; the first
/// advance of a run reports the start time with `dt = 0.0`. Never
/// blocks, so the interrupt is never consulted.
#[derive(Clone, Debug)]
pub struct FixedClock {
    step_size: f64,
    start_time: f64,
    time: f64,
    started: bool,
}

impl FixedClock {
    /// A fixed-step clock starting at time zero.
    pub fn new(step_size: f64) -> Self {
        Self {
            step_size,
            start_time: 0.0,
            time: 0.0,
            started: false,
        }
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

    /// The configured start time in seconds.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }
}

impl Timer for FixedClock {
    fn check(&self) -> Result<(), ClockError> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ClockError::InvalidStepSize {
                value: self.step_size,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.time = self.start_time;
        self.started = false;
    }

    fn advance(&mut self, _interrupt: &Interrupt) -> Result<TimeStep, ClockError> {
        if !self.started {
            self.started = true;
            return Ok(TimeStep::new(self.start_time, 0.0));
        }
        self.time += self.step_size;
        Ok(TimeStep::new(self.time, self.step_size))
    }

    fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_is_start_time_with_zero_dt() {
        let mut clock = FixedClock::new(0.1).with_start_time(5.0);
        clock.reset();
        let ts = clock.advance(&Interrupt::new()).unwrap();
        assert_eq!(ts, TimeStep::new(5.0, 0.0));
    }

    #[test]
    fn subsequent_advances_add_step_size() {
        let mut clock = FixedClock::new(0.5);
        let interrupt = Interrupt::new();
        clock.reset();
        clock.advance(&interrupt).unwrap();
        assert_eq!(clock.advance(&interrupt).unwrap(), TimeStep::new(0.5, 0.5));
        assert_eq!(clock.advance(&interrupt).unwrap(), TimeStep::new(1.0, 0.5));
        assert_eq!(clock.time(), 1.0);
    }

    #[test]
    fn reset_rewinds_to_start() {
        let mut clock = FixedClock::new(0.1);
        let interrupt = Interrupt::new();
        clock.reset();
        for _ in 0..5 {
            clock.advance(&interrupt).unwrap();
        }
        clock.reset();
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.advance(&interrupt).unwrap(), TimeStep::new(0.0, 0.0));
    }

    #[test]
    fn check_rejects_bad_step_sizes() {
        assert!(matches!(
            FixedClock::new(0.0).check(),
            Err(ClockError::InvalidStepSize { .. })
        ));
        assert!(matches!(
            FixedClock::new(-1.0).check(),
            Err(ClockError::InvalidStepSize { .. })
        ));
        assert!(matches!(
            FixedClock::new(f64::NAN).check(),
            Err(ClockError::InvalidStepSize { .. })
        ));
        assert!(FixedClock::new(0.1).check().is_ok());
    }
}
