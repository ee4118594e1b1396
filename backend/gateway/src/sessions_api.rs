//! Session endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use finscope_agent::{SessionSnapshot, SharedSession};
use finscope_core::FinscopeError;
use finscope_media::{decode_data_url, MediaPayload, UploadPolicy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// A snapshot tagged with its session id.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

impl SessionView {
    async fn of(id: Uuid, session: &SharedSession) -> Self {
        let snapshot = SessionSnapshot::from(&*session.read().await);
        Self { id, snapshot }
    }
}

/// JSON alternative to a raw upload body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlUpload {
    pub data_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// `POST /api/sessions`
///
/// A failure to load the example is recorded on the session, not returned.
pub async fn create_session(State(state): State<GatewayState>) -> (StatusCode, Json<SessionView>) {
    let (id, session) = state.sessions.create().await;
    if let Err(e) = state.analyzer.seed_with_example(&session).await {
        warn!(session = %id, error = %e, "Session created without example");
    }
    info!(session = %id, "Session created");
    (StatusCode::CREATED, Json(SessionView::of(id, &session).await))
}

/// `GET /api/sessions/:id`
pub async fn get_session(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&id).await?;
    Ok(Json(SessionView::of(id, &session).await))
}

/// `POST /api/sessions/:id/upload`
///
/// Accepts either the raw image bytes with their `Content-Type`, or
/// `application/json` carrying a `data:` URL. Every rejection is recorded on
/// the session as well as returned.
pub async fn upload_image(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&id).await?;
    let policy = state.analyzer.policy();

    let payload = match payload_from_request(&headers, body, policy) {
        Ok(payload) => payload,
        Err(e) => {
            session.write().await.set_error(e.error());
            return Err(e);
        }
    };

    let oversize = policy.is_oversize(&payload.mime_type, payload.data.len());
    state.analyzer.upload(&session, payload).await.map_err(|e| {
        let err = ApiError::from(e);
        if oversize {
            err.with_status(StatusCode::PAYLOAD_TOO_LARGE)
        } else {
            err
        }
    })?;

    Ok(Json(SessionView::of(id, &session).await))
}

/// `POST /api/sessions/:id/analyze`
pub async fn analyze_session(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&id).await?;
    state.analyzer.analyze(&session).await?;
    Ok(Json(SessionView::of(id, &session).await))
}

/// `DELETE /api/sessions/:id/error`
pub async fn dismiss_error(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&id).await?;
    state.analyzer.dismiss_error(&session).await;
    Ok(Json(SessionView::of(id, &session).await))
}

/// `DELETE /api/sessions/:id`
pub async fn delete_session(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        info!(session = %id, "Session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(FinscopeError::SessionNotFound(id.to_string()).into())
    }
}

fn payload_from_request(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
    policy: UploadPolicy,
) -> Result<MediaPayload, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let is_json = content_type.starts_with("application/json");

    let body = match body {
        Ok(body) => body,
        // Over the transport cap: report it like any other oversize upload,
        // keeping the type check first for raw bodies.
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            if !is_json {
                policy.validate(&content_type, 0)?;
            }
            let err = FinscopeError::Validation(policy.too_large_message());
            return Err(ApiError::from(err).with_status(StatusCode::PAYLOAD_TOO_LARGE));
        }
        Err(rejection) => {
            let err = FinscopeError::Validation(format!("Invalid upload body: {}", rejection.body_text()));
            return Err(err.into());
        }
    };

    if is_json {
        let upload: DataUrlUpload = serde_json::from_slice(&body)
            .map_err(|e| FinscopeError::Validation(format!("Invalid upload body: {e}")))?;
        let (mime, data) = decode_data_url(&upload.data_url)?;
        let source = upload.file_name.unwrap_or_else(|| "data-url".to_string());
        return Ok(MediaPayload::new(source, mime, data));
    }

    Ok(MediaPayload::new("upload", content_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_body_keeps_declared_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "image/png".parse().unwrap());
        let payload = payload_from_request(&headers, Ok(Bytes::from_static(b"png")), UploadPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data.as_ref(), b"png");
    }

    #[test]
    fn missing_content_type_is_empty() {
        let payload = payload_from_request(&HeaderMap::new(), Ok(Bytes::new()), UploadPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "");
    }

    #[test]
    fn json_body_decodes_data_url() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        let body = Bytes::from(r#"{"dataUrl":"data:image/jpeg;base64,AAEC","fileName":"reef.jpg"}"#);
        let payload = payload_from_request(&headers, Ok(body), UploadPolicy::default()).unwrap();
        assert_eq!(payload.source, "reef.jpg");
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data.as_ref(), &[0u8, 1, 2]);
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        let err = payload_from_request(&headers, Ok(Bytes::from_static(b"{")), UploadPolicy::default()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
