//! Upstream payload decoding
//!
//! The search endpoint answers with a JSON object whose `content` field holds
//! the scheme list. Anything else is a schema failure for the whole load.

use crate::error::{LoadError, LoadResult};
use crate::types::FundRecord;
use serde::Deserialize;
use serde_json::Value;

/// Top-level field holding the scheme list
pub const CONTENT_FIELD: &str = "content";

/// Decode a raw response body into catalog records
pub fn decode_catalog_page(body: &[u8]) -> LoadResult<Vec<FundRecord>> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| LoadError::Schema(format!("response body is not valid JSON: {e}")))?;
    decode_catalog_value(&payload)
}

/// Decode an already-parsed payload
pub fn decode_catalog_value(payload: &Value) -> LoadResult<Vec<FundRecord>> {
    let content = payload
        .get(CONTENT_FIELD)
        .ok_or_else(|| LoadError::Schema(format!("missing `{CONTENT_FIELD}` field")))?;
    let items = content
        .as_array()
        .ok_or_else(|| LoadError::Schema(format!("`{CONTENT_FIELD}` is not an array")))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(LoadError::Schema(format!(
                    "`{CONTENT_FIELD}[{index}]` is not an object"
                )));
            }
            FundRecord::deserialize(item).map_err(|e| {
                LoadError::Schema(format!("`{CONTENT_FIELD}[{index}]` could not be decoded: {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_content_list() {
        let body = json!({
            "content": [
                { "id": "a", "scheme_name": "Alpha", "category": "Equity", "sub_category": "Large Cap" },
                { "id": "b", "category": null }
            ],
            "totalElements": 2
        });
        let records = decode_catalog_page(body.to_string().as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scheme_name.as_deref(), Some("Alpha"));
        assert_eq!(records[1].category, None);
    }

    #[test]
    fn test_missing_content_is_schema_error() {
        let err = decode_catalog_page(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Schema(ref msg) if msg.contains("missing")));
    }

    #[test]
    fn test_non_array_content_is_schema_error() {
        let err = decode_catalog_page(br#"{"content": {"id": "a"}}"#).unwrap_err();
        assert_eq!(err.category(), "schema");
    }

    #[test]
    fn test_non_object_element_rejects_whole_page() {
        let err = decode_catalog_page(br#"{"content": [{"id": "a"}, 7]}"#).unwrap_err();
        assert_eq!(err, LoadError::Schema("`content[1]` is not an object".to_string()));
    }

    #[test]
    fn test_invalid_json_is_schema_error() {
        let err = decode_catalog_page(b"<html>maintenance</html>").unwrap_err();
        assert_eq!(err.category(), "schema");
    }

    #[test]
    fn test_empty_content_is_valid() {
        assert!(decode_catalog_page(br#"{"content": []}"#).unwrap().is_empty());
    }
}
