//! CSV step reporter.

use std::io::Write;

use cadence_core::{Component, ComponentError};
use cadence_registry::{Registry, RegistryError, StateCell};

/// Component writing one CSV row per step.
///
/// The header row `time,timeStepSize,<names>` is written at
/// initialize; each step appends a row with the step's time, its step
/// size, and the current value of every wired field. Non-finite values
/// are written as empty fields so spreadsheet tools do not choke on
/// `NaN`.
///
/// An ordinary component: it runs once per step cycle with the same
/// `(time, dt)` the engine computed, at its position in registration
/// order.
pub struct CsvReporter<W: Write> {
    writer: W,
    fields: Vec<(String, StateCell<f64>)>,
}

impl<W: Write> CsvReporter<W> {
    /// A reporter writing to `writer` with no fields wired yet.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            fields: Vec::new(),
        }
    }

    /// Wire a field under a column name. Column order is wiring order.
    pub fn add(&mut self, name: impl Into<String>, value: &StateCell<f64>) -> &mut Self {
        self.fields.push((name.into(), value.clone()));
        self
    }

    /// Wire a published `f64` registry entry under its registry name.
    pub fn add_from_registry(
        &mut self,
        registry: &Registry,
        name: &str,
    ) -> Result<&mut Self, RegistryError> {
        let cell = registry.get::<f64>(name)?;
        self.fields.push((name.to_string(), cell));
        Ok(self)
    }

    /// Consume the reporter, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_value(&mut self, value: f64) -> std::io::Result<()> {
        if value.is_finite() {
            write!(self.writer, "{value}")
        } else {
            Ok(())
        }
    }

    fn write_row(&mut self, time: f64, dt: f64) -> std::io::Result<()> {
        self.write_value(time)?;
        self.writer.write_all(b",")?;
        self.write_value(dt)?;
        let values: Vec<f64> = self.fields.iter().map(|(_, cell)| cell.get()).collect();
        for value in values {
            self.writer.write_all(b",")?;
            self.write_value(value)?;
        }
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> Component for CsvReporter<W> {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        write!(self.writer, "time,timeStepSize")?;
        let names: Vec<String> = self.fields.iter().map(|(name, _)| name.clone()).collect();
        for name in &names {
            write!(self.writer, ",{name}")?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), ComponentError> {
        self.write_row(time, dt)?;
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_in_wiring_order() {
        let a = StateCell::new(1.0_f64);
        let b = StateCell::new(2.0_f64);
        let mut reporter = CsvReporter::new(Vec::new());
        reporter.add("model.a", &a).add("model.b", &b);

        reporter.initialize(0.0).unwrap();
        reporter.step(0.0, 0.0).unwrap();
        a.set(1.5);
        reporter.step(0.1, 0.1).unwrap();
        reporter.terminate(0.1).unwrap();

        let text = String::from_utf8(reporter.into_writer()).unwrap();
        assert_eq!(
            text,
            "time,timeStepSize,model.a,model.b\n\
             0,0,1,2\n\
             0.1,0.1,1.5,2\n"
        );
    }

    #[test]
    fn non_finite_values_are_blank_fields() {
        let v = StateCell::new(f64::NAN);
        let mut reporter = CsvReporter::new(Vec::new());
        reporter.add("v", &v);
        reporter.initialize(0.0).unwrap();
        reporter.step(0.0, 0.0).unwrap();

        let text = String::from_utf8(reporter.into_writer()).unwrap();
        assert!(text.ends_with("0,0,\n"));
    }

    #[test]
    fn wires_fields_out_of_a_registry() {
        let mut registry = Registry::new();
        registry.publish("x", &StateCell::new(4.0_f64));

        let mut reporter = CsvReporter::new(Vec::new());
        reporter.add_from_registry(&registry, "x").unwrap();
        assert!(matches!(
            reporter.add_from_registry(&registry, "missing"),
            Err(RegistryError::NotFound { .. })
        ));

        reporter.initialize(0.0).unwrap();
        reporter.step(0.0, 0.0).unwrap();
        let text = String::from_utf8(reporter.into_writer()).unwrap();
        assert_eq!(text, "time,timeStepSize,x\n0,0,4\n");
    }
}
