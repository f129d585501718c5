use std::sync::OnceLock;

use crate::domain::ApiKey;

/// Environment variable holding the default API key.
pub const API_KEY_ENV: &str = "MANDRILL_API_KEY";

/// Base URL every call path is appended to.
pub const DEFAULT_ENDPOINT: &str = "https://mandrillapp.com/api/1.0/";

/// Default API key from [`API_KEY_ENV`].
///
/// Read once per process; later changes to the environment are not observed.
/// Blank values count as unset.
pub(crate) fn env_default_key() -> Option<&'static ApiKey> {
    static DEFAULT_KEY: OnceLock<Option<ApiKey>> = OnceLock::new();
    DEFAULT_KEY
        .get_or_init(|| parse_default_key(std::env::var(API_KEY_ENV).ok()))
        .as_ref()
}

fn parse_default_key(value: Option<String>) -> Option<ApiKey> {
    value.and_then(|value| ApiKey::new(value).ok())
}

#[derive(Debug, Clone, Default)]
/// Source of the key used when neither the call nor the client supplies one.
pub(crate) enum DefaultKey {
    #[default]
    Environment,
    Fixed(String),
    Disabled,
}

impl DefaultKey {
    pub(crate) fn resolve(self) -> Result<Option<ApiKey>, crate::domain::ValidationError> {
        match self {
            Self::Environment => Ok(env_default_key().cloned()),
            Self::Fixed(value) => ApiKey::new(value).map(Some),
            Self::Disabled => Ok(None),
        }
    }
}
