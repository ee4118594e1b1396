use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for Finscope.
///
/// The first three variants are the user-facing failures: a rejected upload,
/// a bundled asset that could not be read, and a failed inference call. Their
/// display text is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FinscopeError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Load(String),

    #[error("{0}")]
    Request(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("analysis superseded by a newer request")]
    AnalysisSuperseded,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stable, serializable tag for an error, used in API bodies and session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "load_error")]
    Load,
    #[serde(rename = "request_error")]
    Request,
    #[serde(rename = "config_error")]
    Config,
    #[serde(rename = "superseded")]
    Superseded,
    #[serde(rename = "not_found")]
    NotFound,
    #[serde(rename = "internal_error")]
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Load => "load_error",
            ErrorKind::Request => "request_error",
            ErrorKind::Config => "config_error",
            ErrorKind::Superseded => "superseded",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl FinscopeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FinscopeError::Validation(_) => ErrorKind::Validation,
            FinscopeError::Load(_) => ErrorKind::Load,
            FinscopeError::Request(_) => ErrorKind::Request,
            FinscopeError::Config(_) => ErrorKind::Config,
            FinscopeError::AnalysisSuperseded => ErrorKind::Superseded,
            FinscopeError::SessionNotFound(_) => ErrorKind::NotFound,
            FinscopeError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error should be shown to the user as an inline message.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Load | ErrorKind::Request
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_errors_display_message_verbatim() {
        let err = FinscopeError::Validation("Please upload a valid image file".into());
        assert_eq!(err.to_string(), "Please upload a valid image file");
        assert!(err.is_user_facing());
    }

    #[test]
    fn kind_serializes_to_snake_case_tag() {
        let json = serde_json::to_string(&FinscopeError::Request("boom".into()).kind()).unwrap();
        assert_eq!(json, "\"request_error\"");
        assert_eq!(ErrorKind::Load.as_str(), "load_error");
    }

    #[test]
    fn internal_errors_are_not_user_facing() {
        let err = FinscopeError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_user_facing());
    }
}
