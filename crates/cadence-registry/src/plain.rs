//! Snapshot eligibility for published state.

use serde_json::{json, Value};

/// A plain-data value: safely copyable, with no owned dynamic
/// resources, and renderable into the registry's JSON view.
///
/// Eligibility for snapshot capture is this trait bound, checked at
/// publish time — not a byte-size guess at capture time. Values of
/// other types can still be published and accessed live through
/// [`Registry::publish_opaque`](crate::Registry::publish_opaque); they
/// are simply excluded from snapshots.
pub trait Plain: Copy + 'static {
    /// Render the value for the registry's JSON view.
    ///
    /// Numeric implementations emit JSON numbers; non-finite floats
    /// become `null`.
    fn to_json(&self) -> Value;
}

macro_rules! impl_plain {
    ($($t:ty),* $(,)?) => {
        $(
            impl Plain for $t {
                fn to_json(&self) -> Value {
                    json!(self)
                }
            }
        )*
    };
}

impl_plain!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool);
