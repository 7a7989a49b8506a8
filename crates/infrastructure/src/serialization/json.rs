//! JSON helpers for configuration, seed and session files.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Serializes a value to 2-space indented JSON bytes with a trailing newline.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(SerializationError::Serialize)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_from_json_bytes() {
        let map: BTreeMap<String, u32> = from_json_bytes(br#"{"widgets": 3}"#).unwrap();
        assert_eq!(map.get("widgets"), Some(&3));
    }

    #[test]
    fn test_invalid_json_reports_error() {
        let result: Result<BTreeMap<String, u32>, _> = from_json_bytes(b"{not json");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }

    #[test]
    fn test_stable_bytes_format() {
        let map = BTreeMap::from([("b", 2), ("a", 1)]);
        let json = String::from_utf8(to_json_stable_bytes(&map).unwrap()).unwrap();
        assert_eq!(json, "{\n  \"a\": 1,\n  \"b\": 2\n}\n");
    }
}
