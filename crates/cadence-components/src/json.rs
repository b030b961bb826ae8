//! JSON step reporter.

use std::io::Write;

use cadence_core::{Component, ComponentError};
use cadence_registry::{Registry, RegistryError, StateCell};
use serde_json::{json, Map, Value};

/// Component emitting the run as one JSON array of per-step objects.
///
/// Each step appends an object `{"time", "timeStepSize", <fields>}`
/// to an in-memory array; the array is serialized to the writer at
/// terminate. Non-finite values become `null` (JSON has no `NaN`).
pub struct JsonReporter<W: Write> {
    writer: W,
    fields: Vec<(String, StateCell<f64>)>,
    rows: Vec<Value>,
}

impl<W: Write> JsonReporter<W> {
    /// A reporter writing to `writer` with no fields wired yet.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            fields: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Wire a field under a key. Key order is wiring order.
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
}

impl<W: Write> Component for JsonReporter<W> {
    fn initialize(&mut self, _time: f64) -> Result<(), ComponentError> {
        self.rows.clear();
        Ok(())
    }

    fn step(&mut self, time: f64, dt: f64) -> Result<(), ComponentError> {
        // json! maps non-finite floats to null.
        let mut row = Map::new();
        row.insert("time".into(), json!(time));
        row.insert("timeStepSize".into(), json!(dt));
        for (name, cell) in &self.fields {
            row.insert(name.clone(), json!(cell.get()));
        }
        self.rows.push(Value::Object(row));
        Ok(())
    }

    fn terminate(&mut self, _time: f64) -> Result<(), ComponentError> {
        serde_json::to_writer(&mut self.writer, &Value::Array(std::mem::take(&mut self.rows)))
            .map_err(std::io::Error::from)?;
        self.writer.flush()?;
        Ok(())
    }
}
