//! Simulation-time progress logging.

use cadence_core::{Component, ComponentError, EPS_SIM_TIME};

/// Component logging simulation time at a fixed sim-time interval.
///
/// Emits a `tracing` info event whenever simulation time crosses the
/// next report mark. Useful to keep an eye on a long accelerated or
/// externally clocked run without wiring a full reporter.
#[derive(Debug)]
pub struct ProgressLogger {
    interval: f64,
    next_report: f64,
}

impl ProgressLogger {
    /// Log every `interval` seconds of simulation time.
    ///
    /// A non-positive or NaN interval is clamped to [`EPS_SIM_TIME`];
    /// it would otherwise pin the report mark in place.
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(EPS_SIM_TIME),
            next_report: 0.0,
        }
    }
}

impl Component for ProgressLogger {
    fn initialize(&mut self, time: f64) -> Result<(), ComponentError> {
        self.next_report = time;
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), ComponentError> {
        if time >= self.next_report - EPS_SIM_TIME {
            tracing::info!(time, dt, "simulation progress");
            // Closed form, so a mark far behind the current time (or a
            // tiny interval) costs one step the same as one mark.
            let crossed = ((time + EPS_SIM_TIME - self.next_report) / self.interval).floor() + 1.0;
            self.next_report += crossed * self.interval;
        }
        Ok(())
    }

    fn terminate(&mut self, time: f64) -> Result<(), ComponentError> {
        tracing::info!(time, "simulation finished");
        Ok(())
    }
}
