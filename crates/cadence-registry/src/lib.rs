//! Typed, type-erased state registry for the Cadence simulation kernel.
//!
//! Components publish their state variables as named [`StateCell`]
//! handles; external callers read, mutate, snapshot, and restore the
//! published state as a unit without each component hand-writing
//! serialization. The registry is orthogonal to the engine: the engine
//! never touches it, but [`Registry::capture`]/[`Registry::restore`]
//! are typically invoked around a run for deterministic replay or test
//! fixtures.
//!
//! Names are flat strings, conventionally dotted
//! (`"owner.state.field"`); no schema is enforced. Entry iteration,
//! capture, and JSON emission are all order-stable (insertion order).
//!
//! No internal locking: the registry assumes the engine's single
//! thread of control. A host sharing one across threads must add its
//! own synchronization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod plain;
pub mod registry;
pub mod snapshot;

pub use cell::StateCell;
pub use plain::Plain;
pub use registry::{EntryView, Registry, RegistryError};
pub use snapshot::Snapshot;
