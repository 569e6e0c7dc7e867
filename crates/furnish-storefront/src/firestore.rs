//! Read-only access to conversation documents over the Firestore REST API.
//!
//! Firestore returns every field as a typed wrapper
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...). Documents are
//! decoded into plain JSON before anything else looks at them.

use crate::error::{Result, StorefrontError};
use furnish_data::FetchClient;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Longest document id Firestore accepts, in bytes.
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Documents of one collection.
pub struct DocumentStore {
    client: FetchClient,
    project_id: String,
    api_key: String,
    collection: String,
}

impl DocumentStore {
    /// `client` must carry the Firestore REST base URL.
    pub fn new(
        client: FetchClient,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            api_key: api_key.into(),
            collection: collection.into(),
        }
    }

    /// Fetch a document's fields as plain JSON, `None` when it does not exist.
    pub async fn get(&self, document_id: &str) -> Result<Option<Map<String, Value>>> {
        validate_document_id(document_id)?;
        if self.project_id.trim().is_empty() {
            return Err(StorefrontError::Config(
                "document store project id is not set".to_string(),
            ));
        }

        let path = format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            urlencoding::encode(&self.project_id),
            urlencoding::encode(&self.collection),
            urlencoding::encode(document_id)
        );

        let mut request = self.client.get(path);
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())])?;
        }

        let response = request.send().await?;
        if response.is_not_found() {
            return Ok(None);
        }

        let document: RawDocument = response.error_for_status()?.json()?;
        Ok(Some(decode_fields(&document.fields)?))
    }
}

/// Reject ids Firestore would treat as a path or a reserved name.
pub fn validate_document_id(document_id: &str) -> Result<()> {
    let reserved = document_id.starts_with("__") && document_id.ends_with("__");
    if document_id.is_empty()
        || document_id.contains('/')
        || document_id == "."
        || document_id == ".."
        || reserved
        || document_id.len() > MAX_DOCUMENT_ID_BYTES
    {
        return Err(StorefrontError::InvalidDocumentId(document_id.to_string()));
    }
    Ok(())
}

/// Decode a document's `fields` map.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

/// Decode one typed Firestore value.
pub fn decode_value(value: &Value) -> Result<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(malformed("value is not a typed object", value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "integerValue" => {
            // Sent as a decimal string to preserve 64-bit precision.
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| malformed("bad integerValue", inner))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and infinities arrive as strings and have no JSON form.
            Value::String(_) => Ok(Value::Null),
            _ => Err(malformed("bad doubleValue", inner)),
        },
        "geoPointValue" => Ok(inner.clone()),
        "mapValue" => {
            let empty = Map::new();
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            Ok(Value::Object(decode_fields(fields)?))
        }
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<Result<Vec<_>>>()?,
                Some(other) => return Err(malformed("arrayValue.values is not a list", other)),
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        other => Err(StorefrontError::Malformed(format!(
            "unknown value type {}",
            other
        ))),
    }
}

fn malformed(what: &str, value: &Value) -> StorefrontError {
    StorefrontError::Malformed(format!("{}: {}", what, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnish_data::testing::MockTransport;
    use futures::executor::block_on;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({"stringValue": "hi"})).unwrap(), json!("hi"));
        assert_eq!(decode_value(&json!({"integerValue": "42"})).unwrap(), json!(42));
        assert_eq!(decode_value(&json!({"doubleValue": 1.5})).unwrap(), json!(1.5));
        assert_eq!(decode_value(&json!({"booleanValue": true})).unwrap(), json!(true));
        assert_eq!(decode_value(&json!({"nullValue": null})).unwrap(), Value::Null);
        assert_eq!(
            decode_value(&json!({"timestampValue": "2024-05-01T10:00:00Z"})).unwrap(),
            json!("2024-05-01T10:00:00Z")
        );
    }

    #[test]
    fn test_decode_nested_conversation() {
        let raw = json!({
            "conversation": {"arrayValue": {"values": [
                {"mapValue": {"fields": {
                    "author": {"stringValue": "user"},
                    "message": {"stringValue": "a green sofa"}
                }}},
                {"mapValue": {"fields": {
                    "author": {"stringValue": "assistant"},
                    "message": {"stringValue": "Try this one"},
                    "results": {"arrayValue": {"values": [
                        {"mapValue": {"fields": {
                            "id": {"stringValue": "r1"},
                            "snapshot": {"mapValue": {"fields": {
                                "id": {"integerValue": "7"},
                                "title": {"stringValue": "Moss Sofa"},
                                "categories": {"arrayValue": {}}
                            }}}
                        }}}
                    ]}}
                }}}
            ]}}
        });

        let decoded = decode_fields(raw.as_object().unwrap()).unwrap();
        let conversation = &decoded["conversation"];
        assert_eq!(conversation[0]["author"], "user");
        assert_eq!(conversation[1]["results"][0]["snapshot"]["id"], 7);
        assert_eq!(conversation[1]["results"][0]["snapshot"]["categories"], json!([]));
    }

    #[test]
    fn test_decode_rejects_untyped() {
        assert!(decode_value(&json!("plain")).is_err());
        assert!(decode_value(&json!({"integerValue": "x"})).is_err());
        assert!(decode_value(&json!({"mysteryValue": 1})).is_err());
    }

    #[test]
    fn test_document_id_validation() {
        assert!(validate_document_id("abc123").is_ok());
        for bad in ["", "a/b", ".", "..", "__reserved__"] {
            assert!(validate_document_id(bad).is_err(), "{bad:?} accepted");
        }
        assert!(validate_document_id(&"x".repeat(1501)).is_err());
    }

    fn store(transport: &Arc<MockTransport>) -> DocumentStore {
        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("https://firestore.test/v1/");
        DocumentStore::new(client, "furnish", "web-key", "website_search")
    }

    #[test]
    fn test_get_builds_document_url() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({
            "name": "projects/furnish/databases/(default)/documents/website_search/doc1",
            "fields": {"status": {"stringValue": "done"}}
        }));

        let fields = block_on(store(&transport).get("doc1")).unwrap().unwrap();
        assert_eq!(fields["status"], "done");
        assert_eq!(
            transport.requests()[0].url,
            "https://firestore.test/v1/projects/furnish/databases/(default)/documents/website_search/doc1?key=web-key"
        );
    }

    #[test]
    fn test_missing_document_is_none() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(404);
        assert!(block_on(store(&transport).get("gone")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_id_makes_no_request() {
        let transport = Arc::new(MockTransport::new());
        let err = block_on(store(&transport).get("../admin")).unwrap_err();
        assert!(matches!(err, StorefrontError::InvalidDocumentId(_)));
        assert_eq!(transport.request_count(), 0);
    }
}
