//! Externally-driven time source.

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use cadence_core::{ClockError, Interrupt, TimeStep, Timer};

/// How often a pending [`ExternalClock::advance`] wakes to poll the
/// interrupt while no event has arrived.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// An event released into an [`ExternalClock`] by its driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExternalEvent {
    /// Advance simulation time by this delta, in seconds.
    Advance(f64),
    /// Advance by the clock's nominal step size.
    Release,
}

/// Externally-driven time source.
///
/// Each advance suspends the engine until the paired
/// [`ExternalClockDriver`] supplies an event — used when the owning
/// process is paced by a remote clock such as a network heartbeat. The
/// driver is cheap to clone and may live on another thread.
///
/// A pending advance wakes for three reasons: an event arrives, the
/// engine's abort latch fires ([`ClockError::Interrupted`]), or every
/// driver has been dropped ([`ClockError::Disconnected`]).
#[derive(Debug)]
pub struct ExternalClock {
    step_size: f64,
    start_time: f64,
    time: f64,
    started: bool,
    events: Receiver<ExternalEvent>,
}

/// Driving half of an [`ExternalClock`].
#[derive(Clone, Debug)]
pub struct ExternalClockDriver {
    events: Sender<ExternalEvent>,
}

impl ExternalClock {
    /// An external clock and its driver, with the given nominal step
    /// size (used when the driver sends [`ExternalEvent::Release`]).
    pub fn new(step_size: f64) -> (Self, ExternalClockDriver) {
        let (tx, rx) = unbounded();
        (
            Self {
                step_size,
                start_time: 0.0,
                time: 0.0,
                started: false,
                events: rx,
            },
            ExternalClockDriver { events: tx },
        )
    }

    /// Set the start time (builder style).
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self.time = start_time;
        self
    }

    /// The nominal step size in seconds.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

impl ExternalClockDriver {
    /// Release the next step with an explicit time delta.
    ///
    /// Fails with [`ClockError::Disconnected`] once the clock side has
    /// been dropped.
    pub fn advance_by(&self, dt: f64) -> Result<(), ClockError> {
        self.events
            .send(ExternalEvent::Advance(dt))
            .map_err(|_| ClockError::Disconnected)
    }

    /// Release the next step with the clock's nominal step size.
    pub fn release(&self) -> Result<(), ClockError> {
        self.events
            .send(ExternalEvent::Release)
            .map_err(|_| ClockError::Disconnected)
    }
}

impl Timer for ExternalClock {
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
        // Discard events released before the run started.
        while self.events.try_recv().is_ok() {}
    }

    fn advance(&mut self, interrupt: &Interrupt) -> Result<TimeStep, ClockError> {
        if !self.started {
            self.started = true;
            return Ok(TimeStep::new(self.start_time, 0.0));
        }
        loop {
            match self.events.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    let dt = match event {
                        ExternalEvent::Advance(dt) => dt,
                        ExternalEvent::Release => self.step_size,
                    };
                    if !dt.is_finite() || dt < 0.0 {
                        return Err(ClockError::InvalidStepSize { value: dt });
                    }
                    self.time += dt;
                    return Ok(TimeStep::new(self.time, dt));
                }
                Err(RecvTimeoutError::Timeout) => {
                    if interrupt.is_set() {
                        return Err(ClockError::Interrupted);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(ClockError::Disconnected),
            }
        }
    }

    fn time(&self) -> f64 {
        self.time
    }
}
