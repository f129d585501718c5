use crate::domain::validation::ValidationError;
use crate::domain::value::ApiKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a resolved key came from.
pub enum KeySource {
    /// `key` parameter of the current call.
    Explicit,
    /// Key previously stored on the client.
    Stored,
    /// Configured default (normally the `MANDRILL_API_KEY` environment variable).
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: ApiKey,
    pub source: KeySource,
}

impl ResolvedKey {
    /// Whether the client should remember this key for later calls.
    pub fn should_store(&self) -> bool {
        self.source != KeySource::Stored
    }
}

/// Pick the key for one call: explicit, then stored, then default.
pub fn resolve_key(
    explicit: Option<ApiKey>,
    stored: Option<&ApiKey>,
    default: Option<&ApiKey>,
) -> Result<ResolvedKey, ValidationError> {
    if let Some(key) = explicit {
        return Ok(ResolvedKey {
            key,
            source: KeySource::Explicit,
        });
    }
    if let Some(key) = stored {
        return Ok(ResolvedKey {
            key: key.clone(),
            source: KeySource::Stored,
        });
    }
    default
        .map(|key| ResolvedKey {
            key: key.clone(),
            source: KeySource::Default,
        })
        .ok_or(ValidationError::MissingApiKey)
}
