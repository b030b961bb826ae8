//! The name-to-state map: publish, typed access, capture, restore.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::io;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::cell::StateCell;
use crate::plain::Plain;
use crate::snapshot::{PlainValue, Snapshot};

// ── Errors ──────────────────────────────────────────────────────

/// Error from a registry lookup.
///
/// Both variants are local to the failing call; the registry is never
/// left in a corrupt state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No entry is published under the requested name.
    NotFound {
        /// The requested name.
        name: String,
    },
    /// An entry exists but was published as a different type.
    TypeMismatch {
        /// The requested name.
        name: String,
        /// Type the entry was published as.
        published: &'static str,
        /// Type the caller asked for.
        requested: &'static str,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "no entry published as \"{name}\""),
            Self::TypeMismatch {
                name,
                published,
                requested,
            } => write!(
                f,
                "entry \"{name}\" is published as {published}, requested as {requested}"
            ),
        }
    }
}

impl Error for RegistryError {}

// ── Slots ───────────────────────────────────────────────────────

/// Capture/restore/render operations over one plain entry, with the
/// concrete type erased.
trait PlainSlot {
    fn capture(&self) -> Box<dyn PlainValue>;
    /// Write a captured value back. `false` when the value's type does
    /// not match this slot (the entry was republished under another
    /// type since the capture).
    fn restore(&self, value: &dyn PlainValue) -> bool;
    fn render(&self) -> Value;
}

struct TypedSlot<T: Plain> {
    cell: Rc<RefCell<T>>,
}

impl<T: Plain> PlainSlot for TypedSlot<T> {
    fn capture(&self) -> Box<dyn PlainValue> {
        Box::new(*self.cell.borrow())
    }

    fn restore(&self, value: &dyn PlainValue) -> bool {
        match value.as_any().downcast_ref::<T>() {
            Some(v) => {
                *self.cell.borrow_mut() = *v;
                true
            }
            None => false,
        }
    }

    fn render(&self) -> Value {
        self.cell.borrow().to_json()
    }
}

struct Entry {
    /// `Rc<RefCell<T>>` with `T` erased; typed access downcasts this.
    cell: Rc<dyn Any>,
    type_name: &'static str,
    /// Present for plain (snapshot-eligible) entries only.
    plain: Option<Box<dyn PlainSlot>>,
}

/// One row of [`Registry::entries`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryView<'a> {
    /// The published name.
    pub name: &'a str,
    /// The published value type.
    pub type_name: &'static str,
    /// Whether the entry participates in snapshots.
    pub snapshot_eligible: bool,
}

// ── Registry ────────────────────────────────────────────────────

/// Type-erased name-to-state map.
///
/// Components publish [`StateCell`] handles under flat string names;
/// any caller can then read or mutate the live value through a typed
/// handle, or capture and restore all plain entries as a unit. An
/// explicit object passed to whoever needs it — there is no process
/// global.
///
/// Republishing a name overwrites the previous entry (last writer
/// wins) while keeping its position in the iteration order.
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a plain (snapshot-eligible) state variable.
    pub fn publish<T: Plain>(&mut self, name: impl Into<String>, cell: &StateCell<T>) {
        self.entries.insert(
            name.into(),
            Entry {
                cell: cell.shared(),
                type_name: type_name::<T>(),
                plain: Some(Box::new(TypedSlot {
                    cell: cell.shared(),
                })),
            },
        );
    }

    /// Publish a state variable of arbitrary type.
    ///
    /// The entry can be read and mutated live but is silently excluded
    /// from snapshots and rendered as a type placeholder in the JSON
    /// view.
    pub fn publish_opaque<T: 'static>(&mut self, name: impl Into<String>, cell: &StateCell<T>) {
        self.entries.insert(
            name.into(),
            Entry {
                cell: cell.shared(),
                type_name: type_name::<T>(),
                plain: None,
            },
        );
    }

    /// A typed read/write handle to a published variable.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for unpublished names,
    /// [`RegistryError::TypeMismatch`] when `T` is not the published
    /// type. The check is structural (a downcast), so it is always on;
    /// there is no unchecked fast path.
    pub fn get<T: 'static>(&self, name: &str) -> Result<StateCell<T>, RegistryError> {
        let entry = self.lookup(name)?;
        match Rc::downcast::<RefCell<T>>(Rc::clone(&entry.cell)) {
            Ok(inner) => Ok(StateCell::from_shared(inner)),
            Err(_) => Err(RegistryError::TypeMismatch {
                name: name.to_string(),
                published: entry.type_name,
                requested: type_name::<T>(),
            }),
        }
    }

    /// The untyped shared handle for a published variable, for interop
    /// callers that cannot be given a typed one. The `Rc` wraps the
    /// publisher's `RefCell<T>`.
    pub fn get_raw(&self, name: &str) -> Result<Rc<dyn Any>, RegistryError> {
        Ok(Rc::clone(&self.lookup(name)?.cell))
    }

    /// Whether `name` is published.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of published entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stable view of the published entries, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = EntryView<'_>> {
        self.entries.iter().map(|(name, entry)| EntryView {
            name: name.as_str(),
            type_name: entry.type_name,
            snapshot_eligible: entry.plain.is_some(),
        })
    }

    /// Copy every plain entry's current value into an owned
    /// [`Snapshot`], keyed by name. Opaque entries are skipped.
    pub fn capture(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (name, entry) in &self.entries {
            if let Some(slot) = &entry.plain {
                snapshot.entries.insert(name.clone(), slot.capture());
            }
        }
        snapshot
    }

    /// Write snapshot values back into the currently published
    /// variables — a best-effort overlay.
    ///
    /// For every name present in both the snapshot and the registry,
    /// the live value is overwritten with the captured one. Names only
    /// in the snapshot (publisher gone) are ignored; entries only in
    /// the registry (never captured, opaque, or republished under a
    /// different type) are left untouched.
    pub fn restore(&self, snapshot: &Snapshot) {
        for (name, value) in &snapshot.entries {
            if let Some(entry) = self.entries.get(name) {
                if let Some(slot) = &entry.plain {
                    slot.restore(value.as_ref());
                }
            }
        }
    }

    /// The registry as one JSON object, name to live value, in
    /// insertion order. Opaque entries render as `"<TypeName>"`.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, entry) in &self.entries {
            let value = match &entry.plain {
                Some(slot) => slot.render(),
                None => Value::String(format!("<{}>", entry.type_name)),
            };
            map.insert(name.clone(), value);
        }
        Value::Object(map)
    }

    /// Serialize the JSON view into a writer.
    pub fn stream_to<W: io::Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer(writer, &self.to_json()).map_err(io::Error::from)
    }

    fn lookup(&self, name: &str) -> Result<&Entry, RegistryError> {
        self.entries.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
