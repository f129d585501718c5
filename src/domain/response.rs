use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
/// Decoded result of one API call.
pub enum ApiResponse {
    /// Response text returned untouched (only `ping`, which answers `"PONG!"`).
    Raw(String),
    /// Any other call: the response body decoded as JSON.
    Json(Value),
}

impl ApiResponse {
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Raw(_) => None,
            Self::Json(value) => Some(value),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Raw(_) => None,
            Self::Json(value) => Some(value),
        }
    }

    /// Deserialize a JSON response into a typed view such as [`UserInfo`].
    ///
    /// Raw responses are parsed first, so `ping` yields `"PONG!"` as a `String`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Raw(text) => serde_json::from_str(text),
            Self::Json(value) => T::deserialize(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// Account information returned by `users/info`.
pub struct UserInfo {
    pub username: String,
    pub created_at: String,
    #[serde(default)]
    pub public_id: Option<String>,
    pub reputation: i64,
    pub hourly_quota: i64,
    #[serde(default)]
    pub backlog: Option<i64>,
    /// Per-period sending statistics, kept as returned.
    pub stats: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// One entry of `users/senders`.
pub struct SenderSummary {
    pub address: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sent: Option<i64>,
    #[serde(default)]
    pub hard_bounces: Option<i64>,
    #[serde(default)]
    pub soft_bounces: Option<i64>,
    #[serde(default)]
    pub rejects: Option<i64>,
    #[serde(default)]
    pub complaints: Option<i64>,
    #[serde(default)]
    pub unsubs: Option<i64>,
    #[serde(default)]
    pub opens: Option<i64>,
    #[serde(default)]
    pub clicks: Option<i64>,
}
