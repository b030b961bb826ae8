//! Reference components and stop conditions for the Cadence kernel.
//!
//! Thin lifecycle implementations over the core traits: time- and
//! value-based stop conditions, CSV/JSON step reporters, a progress
//! logger, and a registry dumper. None of them carry kernel invariants;
//! each preserves the once-per-step `(time, dt)` contract and reads
//! state through [`StateCell`] handles or a [`Registry`].
//!
//! [`StateCell`]: cadence_registry::StateCell
//! [`Registry`]: cadence_registry::Registry

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod csv;
pub mod dump;
pub mod json;
pub mod progress;
pub mod time_is_up;
pub mod value_exceed;

pub use csv::CsvReporter;
pub use dump::RegistryDumper;
pub use json::JsonReporter;
pub use progress::ProgressLogger;
pub use time_is_up::TimeIsUp;
pub use value_exceed::ValueExceed;
