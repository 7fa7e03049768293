//! The deterministic two-way merge for true conflicts.

use lineage_types::Record;
use serde_json::Value;

/// Merges a conflicting record pair into the single record written to both
/// stores.
///
/// The remote record is the base. Field rule, applied recursively:
/// a null on the incoming (local) side yields the base value; conflicting
/// scalars keep the base value (remote wins); arrays are unioned with base
/// elements first; objects merge key by key, with incoming-only keys carried
/// over. The display id stays the base's unless the base has none, in which
/// case the local one fills in. `changed_at` becomes the maximum of the two
/// sides so each store's timestamps stay monotonic.
#[must_use]
pub fn merge_records(local: &Record, remote: &Record) -> Record {
    debug_assert_eq!(local.handle, remote.handle);
    debug_assert_eq!(local.object_type, remote.object_type);

    Record {
        object_type: remote.object_type,
        handle: remote.handle.clone(),
        display_id: remote
            .display_id
            .clone()
            .or_else(|| local.display_id.clone()),
        changed_at: local.changed_at.max(remote.changed_at),
        payload: merge_values(&remote.payload, &local.payload),
    }
}

fn merge_values(base: &Value, incoming: &Value) -> Value {
    match (base, incoming) {
        (Value::Null, incoming) => incoming.clone(),
        (base, Value::Null) => base.clone(),
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            let mut merged = base_map.clone();
            for (key, incoming_value) in incoming_map {
                let value = match base_map.get(key) {
                    Some(base_value) => merge_values(base_value, incoming_value),
                    None => incoming_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (Value::Array(base_items), Value::Array(incoming_items)) => {
            let mut merged = base_items.clone();
            for item in incoming_items {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            Value::Array(merged)
        }
        // Conflicting scalars (and type mismatches) keep the base.
        (base, _) => base.clone(),
    }
}
