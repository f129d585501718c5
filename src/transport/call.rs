use serde_json::{Map, Value};
use url::Url;

use crate::domain::{ApiKey, ApiResponse, PING_CALL};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

const REDACTED: &str = "***";

/// Compose `{base}/{call_type}/{call_name}.json`.
pub fn endpoint_url(base: &str, call_type: &str, call_name: &str) -> Result<Url, TransportError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("{call_type}/{call_name}.json"))?)
}

pub fn encode_payload(payload: &Map<String, Value>) -> Result<String, TransportError> {
    Ok(serde_json::to_string(payload)?)
}

/// Payload as it may appear in diagnostics: the key is masked.
pub fn redacted_payload(payload: &Map<String, Value>) -> String {
    let mut masked = payload.clone();
    if let Some(key) = masked.get_mut(ApiKey::FIELD) {
        *key = Value::String(REDACTED.to_owned());
    }
    Value::Object(masked).to_string()
}

/// `ping` responses are returned verbatim; everything else is decoded as JSON.
pub fn decode_response(call_name: &str, body: &str) -> Result<ApiResponse, TransportError> {
    if call_name == PING_CALL {
        return Ok(ApiResponse::Raw(body.to_owned()));
    }
    Ok(ApiResponse::Json(serde_json::from_str(body)?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_url_appends_type_and_call() {
        let url =
            endpoint_url("https://mandrillapp.com/api/1.0/", "users", "verify-sender").unwrap();
        assert_eq!(
            url.as_str(),
            "https://mandrillapp.com/api/1.0/users/verify-sender.json"
        );
    }

    #[test]
    fn endpoint_url_tolerates_missing_trailing_slash() {
        let url = endpoint_url("https://example.invalid/api/1.0", "tags", "list").unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/api/1.0/tags/list.json");
    }

    #[test]
    fn endpoint_url_rejects_relative_base() {
        let err = endpoint_url("not a url", "users", "ping").unwrap_err();
        assert!(matches!(err, TransportError::Endpoint(_)));
    }

    #[test]
    fn encode_payload_produces_json_object() {
        let mut payload = Map::new();
        payload.insert("key".to_owned(), json!("abc"));
        payload.insert("tag".to_owned(), json!("welcome"));

        let body = encode_payload(&payload).unwrap();
        let decoded: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded, json!({ "key": "abc", "tag": "welcome" }));
    }

    #[test]
    fn redacted_payload_masks_key_only() {
        let mut payload = Map::new();
        payload.insert("key".to_owned(), json!("secret"));
        payload.insert("q".to_owned(), json!("example"));

        let text = redacted_payload(&payload);
        assert!(!text.contains("secret"));
        assert!(text.contains("example"));
        assert_eq!(payload.get("key"), Some(&json!("secret")));
    }

    #[test]
    fn decode_ping_keeps_raw_text() {
        let resp = decode_response("ping", "\"PONG!\"").unwrap();
        assert_eq!(resp, ApiResponse::Raw("\"PONG!\"".to_owned()));
    }

    #[test]
    fn decode_other_calls_as_json() {
        let resp = decode_response("senders", r#"[{"address":"a@example.com"}]"#).unwrap();
        assert_eq!(
            resp,
            ApiResponse::Json(json!([{ "address": "a@example.com" }]))
        );
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = decode_response("info", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
