//! Point-in-time copies of published state.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::plain::Plain;

/// Type-erased owned copy of one plain value.
///
/// Object-safe companion to [`Plain`]: snapshots hold these so they
/// can clone, downcast, and render values without knowing the
/// concrete types.
pub(crate) trait PlainValue: Any {
    fn clone_box(&self) -> Box<dyn PlainValue>;
    fn as_any(&self) -> &dyn Any;
    fn render(&self) -> Value;
}

impl<T: Plain> PlainValue for T {
    fn clone_box(&self) -> Box<dyn PlainValue> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> Value {
        self.to_json()
    }
}

/// An opaque point-in-time copy of every plain published entry,
/// keyed by name.
///
/// Produced by [`Registry::capture`](crate::Registry::capture); a pure
/// value, independent of anything the registry does afterwards.
/// Restoring is a best-effort overlay, not a registry replace — see
/// [`Registry::restore`](crate::Registry::restore).
#[derive(Default)]
pub struct Snapshot {
    pub(crate) entries: IndexMap<String, Box<dyn PlainValue>>,
}

impl Snapshot {
    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Captured entry names, in capture order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copy out the captured value for `name`, if it was captured as
    /// type `T`.
    pub fn value<T: Plain>(&self, name: &str) -> Option<T> {
        self.entries
            .get(name)
            .and_then(|v| v.as_any().downcast_ref::<T>())
            .copied()
    }

    /// The snapshot as one JSON object, name to value, in capture
    /// order.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.entries {
            map.insert(name.clone(), value.render());
        }
        Value::Object(map)
    }
}

impl Clone for Snapshot {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), value.clone_box()))
                .collect(),
        }
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Snapshot {
        let mut entries: IndexMap<String, Box<dyn PlainValue>> = IndexMap::new();
        entries.insert("a".into(), Box::new(1.5_f64));
        entries.insert("b".into(), Box::new(7_u32));
        Snapshot { entries }
    }

    #[test]
    fn typed_value_access() {
        let snap = sample();
        assert_eq!(snap.value::<f64>("a"), Some(1.5));
        assert_eq!(snap.value::<u32>("b"), Some(7));
        // Wrong type or missing name is None, not a panic.
        assert_eq!(snap.value::<u32>("a"), None);
        assert_eq!(snap.value::<f64>("missing"), None);
    }

    #[test]
    fn clone_is_independent() {
        let snap = sample();
        let copy = snap.clone();
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.value::<f64>("a"), Some(1.5));
    }

    #[test]
    fn json_view_preserves_order() {
        let snap = sample();
        assert_eq!(snap.to_json(), json!({"a": 1.5, "b": 7}));
        assert_eq!(snap.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
