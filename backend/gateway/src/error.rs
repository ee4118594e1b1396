//! Maps domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finscope_core::{ErrorKind, FinscopeError};
use finscope_logging::redact_sensitive_data;
use serde_json::json;
use tracing::{error, warn};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    error: FinscopeError,
    status: Option<StatusCode>,
}

impl ApiError {
    /// Override the status derived from the error kind.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn error(&self) -> &FinscopeError {
        &self.error
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(match self.error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Superseded => StatusCode::CONFLICT,
            ErrorKind::Request => StatusCode::BAD_GATEWAY,
            ErrorKind::Load | ErrorKind::Config | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })
    }
}

impl From<FinscopeError> for ApiError {
    fn from(error: FinscopeError) -> Self {
        Self {
            error,
            status: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.error.kind();
        let detail = redact_sensitive_data(&self.error.to_string());

        let message = match kind {
            ErrorKind::Internal | ErrorKind::Config => {
                error!(kind = kind.as_str(), error = %detail, "Request failed");
                INTERNAL_MESSAGE.to_string()
            }
            _ => {
                warn!(kind = kind.as_str(), status = status.as_u16(), error = %detail, "Request rejected");
                detail
            }
        };

        let body = json!({
            "error": {
                "kind": kind,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_kind() {
        let cases = [
            (FinscopeError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (FinscopeError::Load("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (FinscopeError::Request("x".into()), StatusCode::BAD_GATEWAY),
            (FinscopeError::SessionNotFound("x".into()), StatusCode::NOT_FOUND),
            (FinscopeError::AnalysisSuperseded, StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn explicit_status_wins() {
        let err = ApiError::from(FinscopeError::Validation("too big".into()))
            .with_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
