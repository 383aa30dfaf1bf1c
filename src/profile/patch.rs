//! JSON merge-patch (RFC 7396)

use crate::error::{SchemaError, SchemaResult};
use crate::models::property_reference;
use serde_json::{Map, Value};

/// Apply `patch` to `target` in place.
///
/// Objects merge key by key at every level, `null` deletes a key, anything
/// else replaces. Keys already in `target` keep their position; new keys
/// are appended in patch order.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.shift_remove(key);
            } else {
                merge_patch(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

/// Reject patches that would leave a property half relation, half scalar.
///
/// A relation property (`$ref` / `items.$ref`) may be deleted or re-pointed
/// but not replaced by a scalar; a scalar property may not be patched into
/// a relation.
pub fn check_conflicts(document: &str, core: &Value, patch: &Value) -> SchemaResult<()> {
    let (Some(core_properties), Some(patch_properties)) = (
        core.get("properties").and_then(Value::as_object),
        patch.get("properties").and_then(Value::as_object),
    ) else {
        return Ok(());
    };

    for (key, replacement) in patch_properties {
        let Some(existing) = core_properties.get(key) else {
            continue;
        };
        let conflict = |detail: &str| SchemaError::Conflict {
            document: document.to_string(),
            path: format!("properties.{}", key),
            detail: detail.to_string(),
        };

        if property_reference(existing).is_some() {
            if !replacement.is_null() && !replacement.is_object() {
                return Err(conflict("relation property replaced by a scalar"));
            }
        } else if replacement.is_object() && property_reference(replacement).is_some() {
            return Err(conflict("scalar property replaced by a relation"));
        }
    }
    Ok(())
}
