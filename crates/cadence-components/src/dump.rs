//! Periodic registry dumping.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use cadence_core::{Component, ComponentError};
use cadence_registry::Registry;

/// Component writing the registry's JSON view once every N steps.
///
/// Each dump is one JSON object on its own line (JSON lines), produced
/// by [`Registry::stream_to`], so the output is a time series of
/// complete published-state views. The registry is shared with the
/// publishing components through `Rc<RefCell<_>>`, the kernel's
/// single-threaded sharing idiom.
pub struct RegistryDumper<W: Write> {
    registry: Rc<RefCell<Registry>>,
    writer: W,
    every: u64,
    steps: u64,
}

impl<W: Write> RegistryDumper<W> {
    /// Dump `registry` to `writer` on every `every`-th step.
    pub fn new(registry: &Rc<RefCell<Registry>>, writer: W, every: u64) -> Self {
        Self {
            registry: Rc::clone(registry),
            writer,
            every: every.max(1),
            steps: 0,
        }
    }

    /// Consume the dumper, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> Component for RegistryDumper<W> {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.steps = 0;
        Ok(())
    }

    fn step(&mut self, _time: f64, _dt: f64) -> Result<(), ComponentError> {
        if self.steps % self.every == 0 {
            self.registry.borrow().stream_to(&mut self.writer)?;
            self.writer.write_all(b"\n")?;
        }
        self.steps += 1;
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.writer.flush()?;
        Ok(())
    }
}
