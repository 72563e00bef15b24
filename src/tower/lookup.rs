use crate::error::TowerError;
use serde_json::Value;

/// Recursively search a parsed JSON value for a mapping that contains
/// `target_key` with `target_value`. Depth-first, short-circuits on the
/// first match. Scalar roots and empty containers never match.
pub fn find_key_value(data: &Value, target_key: &str, target_value: &Value) -> bool {
    match data {
        Value::Object(map) => map.iter().any(|(key, value)| {
            (key == target_key && value == target_value)
                || find_key_value(value, target_key, target_value)
        }),
        Value::Array(items) => items
            .iter()
            .any(|item| find_key_value(item, target_key, target_value)),
        _ => false,
    }
}

/// Confirm a resource shows up by name after an operation.
pub fn validate_id(data: &Value, name: &str) -> Result<(), TowerError> {
    if !find_key_value(data, "name", &Value::String(name.to_string())) {
        return Err(TowerError::ResourceNotFound(name.to_string()));
    }
    Ok(())
}

/// Reject an operation that would clash with an existing resource name.
pub fn check_if_exists(data: &Value, name: &str) -> Result<(), TowerError> {
    if find_key_value(data, "name", &Value::String(name.to_string())) {
        return Err(TowerError::ResourceAlreadyExists(name.to_string()));
    }
    Ok(())
}

/// Extract the `name` of every entry under a top-level listing key,
/// e.g. `pipelines` or `computeEnvs` in a `tw … list` response.
pub fn resource_names(listing: &Value, key: &str) -> Vec<String> {
    listing
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
