//! Response envelope decoding.
//!
//! The API answers either with a bare payload (`{ "languages": [...] }`,
//! `{ "translations": {...} }`) or wrapped as `{ "success": bool, "data": ... }`.
//! `success: false` means "no data".

use i18n_core::TranslationMap;
use serde_json::Value;

use crate::error::FetchError;

fn parse(body: &[u8]) -> Result<Value, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Unwrap the `{ success, data }` envelope. `None` when `success` is false.
fn unwrap_envelope(value: Value) -> Option<Value> {
    match value {
        Value::Object(mut obj) if obj.contains_key("success") => {
            if obj.get("success").and_then(Value::as_bool) != Some(true) {
                return None;
            }
            Some(obj.remove("data").unwrap_or(Value::Null))
        }
        other => Some(other),
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
    )
}

/// Language list, or `None` when the payload carries none.
pub(crate) fn languages(body: &[u8]) -> Result<Option<Vec<String>>, FetchError> {
    let Some(data) = unwrap_envelope(parse(body)?) else {
        return Ok(None);
    };
    Ok(string_list(data.get("languages")))
}

/// Namespace list; empty when the payload carries none.
pub(crate) fn namespaces(body: &[u8]) -> Result<Vec<String>, FetchError> {
    let Some(data) = unwrap_envelope(parse(body)?) else {
        return Ok(Vec::new());
    };
    Ok(string_list(data.get("namespaces")).unwrap_or_default())
}

/// Translation table. A `translations` object wins over the bare payload.
pub(crate) fn translations(body: &[u8]) -> Result<TranslationMap, FetchError> {
    let data = match unwrap_envelope(parse(body)?) {
        Some(data) => data,
        None => return Ok(TranslationMap::new()),
    };

    match data {
        Value::Object(mut obj) => {
            if let Some(Value::Object(table)) = obj.remove("translations") {
                return Ok(table);
            }
            if matches!(obj.get("namespaces"), Some(Value::Array(_))) {
                obj.remove("namespaces");
            }
            Ok(obj)
        }
        Value::Null => Ok(TranslationMap::new()),
        other => Err(FetchError::Decode(format!(
            "expected a translation object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
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
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    #[test]
    fn test_languages_shapes() {
        assert_eq!(
            languages(&body(json!({ "languages": ["en", "tr"] }))).unwrap(),
            Some(vec!["en".to_string(), "tr".to_string()])
        );
        assert_eq!(
            languages(&body(json!({ "success": true, "data": { "languages": ["de"] } }))).unwrap(),
            Some(vec!["de".to_string()])
        );
        assert_eq!(languages(&body(json!({ "success": false }))).unwrap(), None);
        assert_eq!(languages(&body(json!({ "other": 1 }))).unwrap(), None);
        assert!(languages(b"not json").is_err());
    }

    #[test]
    fn test_namespaces_shapes() {
        assert_eq!(
            namespaces(&body(json!({ "namespaces": ["common", "validation"] }))).unwrap(),
            vec!["common".to_string(), "validation".to_string()]
        );
        assert_eq!(
            namespaces(&body(json!({ "success": true, "data": { "namespaces": ["x"] } }))).unwrap(),
            vec!["x".to_string()]
        );
        assert!(namespaces(&body(json!({ "translations": {} }))).unwrap().is_empty());
        assert!(namespaces(&body(json!({ "success": false }))).unwrap().is_empty());
    }

    #[test]
    fn test_translations_shapes() {
        let expected = json!({ "key1": "value1" }).as_object().cloned().unwrap();

        assert_eq!(
            translations(&body(json!({ "success": true, "data": { "key1": "value1" } }))).unwrap(),
            expected
        );
        assert_eq!(
            translations(&body(json!({ "translations": { "key1": "value1" }, "language": "en" })))
                .unwrap(),
            expected
        );
        assert_eq!(
            translations(&body(json!({ "key1": "value1", "namespaces": ["a"] }))).unwrap(),
            expected
        );
        assert!(translations(&body(json!({ "success": false }))).unwrap().is_empty());
        assert!(translations(&body(json!({ "success": true }))).unwrap().is_empty());
        assert!(matches!(
            translations(&body(json!(["not", "an", "object"]))),
            Err(FetchError::Decode(_))
        ));
    }
}
