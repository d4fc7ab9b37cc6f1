//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::SerializationError;

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Keys in the order the source map holds them
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartpatch_domain::{Value, ValueMap};
    use pretty_assertions::assert_eq;

    fn sample() -> ValueMap {
        ValueMap::from_iter([
            ("zebra".to_string(), Value::from(1)),
            ("apple".to_string(), Value::from("two")),
        ])
    }

    #[test]
    fn test_stable_serialization_format() {
        let json = to_json_stable(&sample()).unwrap();

        assert_eq!(json, "{\n  \"zebra\": 1,\n  \"apple\": \"two\"\n}\n");
    }

    #[test]
    fn test_document_order_is_kept() {
        let json = to_json_stable(&sample()).unwrap();

        assert!(json.find("zebra").unwrap() < json.find("apple").unwrap());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let original = Value::Map(sample());

        let json = to_json_stable(&original).unwrap();
        let restored: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(original, restored);
    }
}
