use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure classes reported by the vision model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelErrorKind {
    InvalidCredential,
    UpstreamFailure,
    Timeout,
    Cancelled,
}

impl ModelErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelErrorKind::InvalidCredential => "invalid_credential",
            ModelErrorKind::UpstreamFailure => "upstream_failure",
            ModelErrorKind::Timeout => "timeout",
            ModelErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Vision model error ({kind}): {message}")]
    ModelError {
        kind: ModelErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StyleError {
    pub fn model(kind: ModelErrorKind, message: impl Into<String>) -> Self {
        StyleError::ModelError {
            kind,
            message: message.into(),
        }
    }

    pub fn model_error_kind(&self) -> Option<ModelErrorKind> {
        match self {
            StyleError::ModelError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StyleError::ConfigError { .. } | StyleError::InvalidConfigValueError { .. }
        )
    }

    /// Hint printed next to startup failures.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StyleError::ConfigError { .. } => {
                "Check the config file and environment (GEMINI_API_KEY, PORT)"
            }
            StyleError::InvalidConfigValueError { .. } => {
                "Fix the reported value in the config file or on the command line"
            }
            StyleError::ModelError {
                kind: ModelErrorKind::InvalidCredential,
                ..
            } => "Get a valid API key from https://ai.google.dev/",
            StyleError::ModelError { .. } => "Check network access to the Gemini API and retry",
            StyleError::IoError(_) => "Check that the upload and static directories are writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display_includes_kind() {
        let err = StyleError::model(ModelErrorKind::Timeout, "no answer after 5s");
        assert_eq!(
            err.to_string(),
            "Vision model error (timeout): no answer after 5s"
        );
        assert_eq!(err.model_error_kind(), Some(ModelErrorKind::Timeout));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_error_classification() {
        let err = StyleError::InvalidConfigValueError {
            field: "server.port".to_string(),
            value: "0".to_string(),
            reason: "must be between 1 and 65535".to_string(),
        };
        assert!(err.is_config_error());
        assert_eq!(err.model_error_kind(), None);

        let err = StyleError::ConfigError {
            message: "GEMINI_API_KEY is not set".to_string(),
        };
        assert!(err.is_config_error());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ModelErrorKind::InvalidCredential).unwrap();
        assert_eq!(json, "\"invalid_credential\"");
    }
}
