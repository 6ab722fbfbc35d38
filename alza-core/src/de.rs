//! Serde helpers for loosely typed API payloads.

use serde::{Deserialize, Deserializer};

/// Deserializes a field, treating an explicit `null` like a missing one.
///
/// Pair with `#[serde(default)]` so absent fields work too.
///
/// # Errors
///
/// Fails only when a non-null value has the wrong type.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Counts {
        #[serde(default, deserialize_with = "null_as_default")]
        count: u32,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    }

    #[test]
    fn test_null_reads_as_default() {
        let counts: Counts = serde_json::from_value(json!({"count": null, "name": null})).unwrap();
        assert_eq!(counts.count, 0);
        assert_eq!(counts.name, "");
    }

    #[test]
    fn test_missing_and_present_values() {
        let counts: Counts = serde_json::from_value(json!({"count": 3})).unwrap();
        assert_eq!(counts.count, 3);
        assert!(counts.name.is_empty());
    }

    #[test]
    fn test_wrong_type_still_fails() {
        let result = serde_json::from_value::<Counts>(json!({"count": "three"}));
        assert!(result.is_err());
    }
}
