use serde_json::{Map, Value};

use crate::domain::registry::{CallSpec, Registry};
use crate::domain::validation::ValidationError;
use crate::domain::value::ApiKey;

/// Payload field naming the call type in [`ApiCall::from_params`] input.
pub const CALL_TYPE_FIELD: &str = "type";
/// Payload field naming the call in [`ApiCall::from_params`] input.
pub const CALL_FIELD: &str = "call";

/// Call name whose response is returned as raw text.
pub const PING_CALL: &str = "ping";

#[derive(Debug, Clone, PartialEq)]
/// One Mandrill API request before validation: target call plus parameters.
pub struct ApiCall {
    call_type: String,
    call_name: String,
    params: Map<String, Value>,
}

impl ApiCall {
    pub fn new(
        call_type: impl Into<String>,
        call_name: impl Into<String>,
        params: Map<String, Value>,
    ) -> Self {
        Self {
            call_type: call_type.into(),
            call_name: call_name.into(),
            params,
        }
    }

    /// Split a flat parameter object carrying `type` and `call` entries.
    ///
    /// Both entries are removed and never reach validation or the payload.
    pub fn from_params(mut params: Map<String, Value>) -> Result<Self, ValidationError> {
        let call_type = take_string(&mut params, CALL_TYPE_FIELD)
            .ok_or(ValidationError::MissingCallType)?;
        let call_name =
            take_string(&mut params, CALL_FIELD).ok_or(ValidationError::MissingCall)?;
        Ok(Self {
            call_type,
            call_name,
            params,
        })
    }

    /// Like [`ApiCall::from_params`], for any JSON value.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(params) => Self::from_params(params),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    pub fn call_type(&self) -> &str {
        &self.call_type
    }

    pub fn call_name(&self) -> &str {
        &self.call_name
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn is_ping(&self) -> bool {
        self.call_name == PING_CALL
    }

    /// Check the call against `registry` and return its contract.
    pub fn validate<'r>(&self, registry: &'r Registry) -> Result<&'r CallSpec, ValidationError> {
        let spec = registry.spec(&self.call_type, &self.call_name)?;
        spec.check_params(&self.params)?;
        Ok(spec)
    }

    /// Explicit per-call key, if the parameters carry one.
    pub fn explicit_key(&self) -> Result<Option<ApiKey>, ValidationError> {
        self.params
            .get(ApiKey::FIELD)
            .map(ApiKey::from_value)
            .transpose()
    }

    /// Final payload: the parameters with `key` set to `key`.
    pub fn into_payload(self, key: &ApiKey) -> Map<String, Value> {
        let mut payload = self.params;
        payload.insert(
            ApiKey::FIELD.to_owned(),
            Value::String(key.as_str().to_owned()),
        );
        payload
    }
}

fn take_string(params: &mut Map<String, Value>, field: &str) -> Option<String> {
    match params.remove(field)? {
        Value::String(value) => Some(value),
        _ => None,
    }
}
