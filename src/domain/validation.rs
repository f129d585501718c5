use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    UnknownCallType { call_type: String },
    UnknownCall { call_type: String, call: String },
    InvalidParameters { keys: Vec<String> },
    MissingApiKey,
    InvalidKeyType,
    NotAnObject,
    MissingCallType,
    MissingCall,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::UnknownCallType { call_type } => write!(f, "invalid call type: {call_type}"),
            Self::UnknownCall { call_type, call } => {
                write!(f, "invalid call for call type {call_type}: {call}")
            }
            Self::InvalidParameters { keys } => {
                write!(f, "invalid keys in call: {}", keys.join(","))
            }
            Self::MissingApiKey => f.write_str("API key must be set"),
            Self::InvalidKeyType => f.write_str("API key must be a string"),
            Self::NotAnObject => f.write_str("call parameters must be a JSON object"),
            Self::MissingCallType => f.write_str("API call type must be set"),
            Self::MissingCall => f.write_str("API call must be set"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "key" };
        assert_eq!(err.to_string(), "key must not be empty");

        let err = ValidationError::UnknownCallType {
            call_type: "bad_type".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid call type: bad_type");

        let err = ValidationError::UnknownCall {
            call_type: "users".to_owned(),
            call: "pong".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid call for call type users: pong");

        let err = ValidationError::InvalidParameters {
            keys: vec!["extra".to_owned(), "other".to_owned()],
        };
        assert_eq!(err.to_string(), "invalid keys in call: extra,other");

        assert_eq!(
            ValidationError::MissingApiKey.to_string(),
            "API key must be set"
        );
    }
}
