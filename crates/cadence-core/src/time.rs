//! Simulation time values.
//!
//! Simulation time is `f64` seconds. Timers hand the engine one
//! [`TimeStep`] per advance; the very first advance of a run always
//! reports `dt = 0.0` (the initialization step).

/// Tolerance for simulation-time comparisons.
///
/// Two times closer than this are considered equal. Used by
/// time-triggered stop conditions so that a step landing exactly on a
/// stop time is not missed to floating-point rounding.
pub const EPS_SIM_TIME: f64 = 1e-9;

/// One advance of a time source: the new simulation time and the
/// interval since the previous step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeStep {
    /// Current simulation time in seconds.
    pub time: f64,
    /// Elapsed simulation time since the previous step, in seconds.
    ///
    /// Zero on the first step of a run; the configured step size (or
    /// the actual elapsed interval for paced/external timers) after.
    pub dt: f64,
}

impl TimeStep {
    /// Construct a time step value.
    pub fn new(time: f64, dt: f64) -> Self {
        Self { time, dt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_step_carries_time_and_dt() {
        let ts = TimeStep::new(1.5, 0.1);
        assert_eq!(ts.time, 1.5);
        assert_eq!(ts.dt, 0.1);
    }
}
