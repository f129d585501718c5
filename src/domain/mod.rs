//! Domain layer: call registry, strong types and key resolution (no I/O).

mod key;
mod registry;
mod request;
mod response;
mod validation;
mod value;

pub use key::{KeySource, ResolvedKey, resolve_key};
pub use registry::{CallSpec, Registry};
pub use request::{ApiCall, CALL_FIELD, CALL_TYPE_FIELD, PING_CALL};
pub use response::{ApiResponse, SenderSummary, UserInfo};
pub use validation::ValidationError;
pub use value::ApiKey;

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn api_key_rejects_empty_and_trims() {
        assert!(matches!(
            ApiKey::new("   "),
            Err(ValidationError::Empty {
                field: ApiKey::FIELD
            })
        ));
        assert_eq!(ApiKey::new(" mykey ").unwrap().as_str(), "mykey");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret").unwrap();
        assert!(!format!("{key:?}").contains("secret"));
    }

    #[test]
    fn api_key_from_value_requires_string() {
        assert_eq!(ApiKey::from_value(&json!("abc")).unwrap(), "abc");
        assert_eq!(
            ApiKey::from_value(&json!(42)).unwrap_err(),
            ValidationError::InvalidKeyType
        );
    }

    #[test]
    fn from_params_strips_type_and_call() {
        let call = ApiCall::from_params(object(json!({
            "type": "users",
            "call": "verify-sender",
            "email": "a@example.com"
        })))
        .unwrap();
        assert_eq!(call.call_type(), "users");
        assert_eq!(call.call_name(), "verify-sender");
        assert_eq!(call.params().len(), 1);
        assert!(call.params().contains_key("email"));
    }

    #[test]
    fn from_params_requires_type_and_call() {
        assert_eq!(
            ApiCall::from_params(object(json!({ "call": "ping" }))).unwrap_err(),
            ValidationError::MissingCallType
        );
        assert_eq!(
            ApiCall::from_params(object(json!({ "type": "users" }))).unwrap_err(),
            ValidationError::MissingCall
        );
        assert_eq!(
            ApiCall::from_params(object(json!({ "type": "users", "call": 1 }))).unwrap_err(),
            ValidationError::MissingCall
        );
        assert_eq!(
            ApiCall::from_value(json!(["users", "ping"])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn validate_accepts_key_and_rejects_extra_params() {
        let registry = Registry::global();

        let ok = ApiCall::new("users", "ping", object(json!({ "key": "k" })));
        assert_eq!(ok.validate(registry).unwrap().call_name(), "ping");

        let extra = ApiCall::new("users", "ping", object(json!({ "extra": true })));
        assert_eq!(
            extra.validate(registry).unwrap_err(),
            ValidationError::InvalidParameters {
                keys: vec!["extra".to_owned()]
            }
        );

        let bad_type = ApiCall::new("bad_type", "ping", Map::new());
        assert!(matches!(
            bad_type.validate(registry),
            Err(ValidationError::UnknownCallType { .. })
        ));
    }

    #[test]
    fn missing_required_params_are_not_rejected() {
        let call = ApiCall::new("templates", "add", Map::new());
        assert!(call.validate(Registry::global()).is_ok());
    }

    #[test]
    fn into_payload_injects_key() {
        let key = ApiKey::new("resolved").unwrap();
        let call = ApiCall::new(
            "tags",
            "info",
            object(json!({ "tag": "welcome", "key": "stale" })),
        );
        let payload = call.into_payload(&key);
        assert_eq!(payload.get("key"), Some(&json!("resolved")));
        assert_eq!(payload.get("tag"), Some(&json!("welcome")));
    }

    #[test]
    fn resolve_key_prefers_explicit_then_stored_then_default() {
        let explicit = ApiKey::new("explicit").unwrap();
        let stored = ApiKey::new("stored").unwrap();
        let default = ApiKey::new("default").unwrap();

        let resolved = resolve_key(Some(explicit), Some(&stored), Some(&default)).unwrap();
        assert_eq!(resolved.key, "explicit");
        assert_eq!(resolved.source, KeySource::Explicit);
        assert!(resolved.should_store());

        let resolved = resolve_key(None, Some(&stored), Some(&default)).unwrap();
        assert_eq!(resolved.key, "stored");
        assert!(!resolved.should_store());

        let resolved = resolve_key(None, None, Some(&default)).unwrap();
        assert_eq!(resolved.source, KeySource::Default);

        assert_eq!(
            resolve_key(None, None, None).unwrap_err(),
            ValidationError::MissingApiKey
        );
    }

    #[test]
    fn user_info_deserializes_from_json_response() {
        let response = ApiResponse::Json(json!({
            "username": "myusername",
            "created_at": "2013-01-01 15:30:27",
            "public_id": "aaabbbccc112233",
            "reputation": 42,
            "hourly_quota": 42,
            "backlog": 42,
            "stats": { "today": { "sent": 42 } }
        }));
        let info = response.deserialize::<UserInfo>().unwrap();
        assert_eq!(info.username, "myusername");
        assert_eq!(info.hourly_quota, 42);
        assert_eq!(info.stats["today"]["sent"], json!(42));
    }

    #[test]
    fn raw_ping_response_deserializes_to_string() {
        let response = ApiResponse::Raw("\"PONG!\"".to_owned());
        assert_eq!(response.as_raw(), Some("\"PONG!\""));
        assert!(response.as_json().is_none());
        assert_eq!(response.deserialize::<String>().unwrap(), "PONG!");
    }
}
