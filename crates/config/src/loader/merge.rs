//! Deep merge of a local override onto a primary configuration.
//!
//! Mappings are merged key by key at every depth. Any other value in the
//! overlay (scalar, sequence, null) replaces the base value entirely,
//! including when the type changes.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// - Keys only in `base` are kept untouched.
/// - Keys only in `overlay` are appended in overlay order.
/// - Keys in both: mappings recurse, everything else is replaced.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(Value::Mapping(base_map)), Value::Mapping(overlay_map)) => {
                deep_merge(base_map, overlay_map);
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Value-level variant of [`deep_merge`].
pub fn deep_merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            deep_merge(&mut base_map, overlay_map);
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}
