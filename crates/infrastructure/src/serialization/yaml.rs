//! YAML serialization helpers, including multi-document streams.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::SerializationError;

const DOCUMENT_SEPARATOR: &str = "---\n";

/// Serializes a value as a single YAML document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    serde_yaml::to_string(value).map_err(SerializationError::YamlSerialize)
}

/// Deserializes every document of a `---` separated YAML stream.
///
/// Empty documents, such as the one produced by a leading separator, are
/// skipped.
///
/// # Errors
///
/// Returns an error for the first document that is invalid or doesn't match
/// the expected type.
pub fn from_yaml_stream<T: DeserializeOwned>(yaml: &str) -> Result<Vec<T>, SerializationError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value =
            serde_yaml::Value::deserialize(document).map_err(SerializationError::YamlDeserialize)?;
        if value.is_null() {
            continue;
        }
        documents.push(serde_yaml::from_value(value).map_err(SerializationError::YamlDeserialize)?);
    }
    Ok(documents)
}

/// Serializes values as a YAML stream, separating documents with `---`.
///
/// # Errors
///
/// Returns an error if any document fails to serialize.
pub fn to_yaml_stream<T: Serialize>(documents: &[T]) -> Result<String, SerializationError> {
    let rendered = documents
        .iter()
        .map(to_yaml)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(DOCUMENT_SEPARATOR))
}
