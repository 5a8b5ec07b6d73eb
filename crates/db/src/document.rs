//! Schemaless documents and conversion to and from typed models.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use beatstore_core::types::DocId;

use crate::error::StoreError;

/// Field map of a document body.
pub type Fields = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// A stored document: an id plus its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<DocId>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// A body field. Explicit `null` reads as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if name == ID_FIELD {
            return None;
        }
        self.data.get(name).filter(|v| !v.is_null())
    }

    /// Body with the id merged in, as served to clients.
    pub fn to_json(&self) -> Value {
        let mut data = self.data.clone();
        data.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        Value::Object(data)
    }

    /// Decode into a model whose `id` field receives the document id.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.to_json()).map_err(|e| {
            StoreError::InvalidDocument(format!("document '{}' failed to decode: {e}", self.id))
        })
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Encode a model into document fields. Any `id` field is dropped since the
/// store owns ids.
pub fn encode<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove(ID_FIELD);
            Ok(map)
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

/// Strip keys a writer may never set directly.
pub fn strip_reserved(fields: &mut Fields, keys: &[&str]) {
    for key in keys {
        fields.remove(*key);
    }
}

/// Decode a list of documents, failing on the first bad one.
pub fn decode_all<T: DeserializeOwned>(docs: &[Document]) -> Result<Vec<T>, StoreError> {
    docs.iter().map(Document::decode).collect()
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[serde(default)]
        id: String,
        display_name: String,
    }

    #[test]
    fn decode_injects_id() {
        let mut data = Fields::new();
        data.insert("displayName".into(), json!("Jay"));
        let doc = Document::new("abc", data);
        let sample: Sample = doc.decode().unwrap();
        assert_eq!(sample, Sample { id: "abc".into(), display_name: "Jay".into() });
    }

    #[test]
    fn encode_drops_id() {
        let fields = encode(&Sample { id: "x".into(), display_name: "Rue".into() }).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["displayName"], json!("Rue"));
    }

    #[test]
    fn encode_rejects_non_objects() {
        assert!(encode(&vec![1, 2]).is_err());
    }

    #[test]
    fn serializes_with_id() {
        let doc = Document::new("d1", Fields::new());
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "id": "d1" }));
    }
}
