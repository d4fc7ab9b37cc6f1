//! JSON merge patch (RFC 7386) over [`Value`] trees.

use crate::value::{Value, ValueMap};

/// Applies `patch` onto `target`.
///
/// Mappings merge key by key, a `null` in the patch removes the key, and any
/// other patch value replaces the target wholesale. Lists are not merged.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Map(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !matches!(target, Value::Map(_)) {
        *target = Value::Map(ValueMap::new());
    }
    if let Value::Map(target_map) = target {
        merge_map(target_map, patch_map);
    }
}

/// Applies the entries of `patch` onto `target`.
pub fn merge_map(target: &mut ValueMap, patch: &ValueMap) {
    for (key, value) in patch {
        if value.is_null() {
            target.shift_remove(key);
        } else {
            let slot = target.entry(key.clone()).or_insert(Value::Null);
            merge_patch(slot, value);
        }
    }
}
