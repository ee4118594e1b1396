//! Image acquisition: upload validation, base64 encoding, and the bundled default asset.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use finscope_core::{EncodedImage, FinscopeError};
use tracing::{debug, info, warn};

use crate::mime_detect::{detect_mime_type, is_accepted_upload, is_image, normalize_mime};
use crate::MediaPayload;

/// Upload size ceiling: 20 MiB.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const INVALID_TYPE_MESSAGE: &str = "Please upload a valid image file";
pub const LOAD_DEFAULT_FAILED_MESSAGE: &str = "Failed to load default image";

const BYTES_PER_MB: usize = 1024 * 1024;

/// Rules applied to every user upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Message shown when a file is over the limit, e.g. `Image size should be less than 20MB`.
    pub fn too_large_message(&self) -> String {
        format!(
            "Image size should be less than {}MB",
            self.max_bytes.div_ceil(BYTES_PER_MB)
        )
    }

    /// An accepted image type that is over the size limit.
    pub fn is_oversize(&self, declared_mime: &str, size_bytes: usize) -> bool {
        is_accepted_upload(declared_mime) && size_bytes > self.max_bytes
    }

    /// Check type first, then size. Returns the normalized media type.
    pub fn validate(&self, declared_mime: &str, size_bytes: usize) -> Result<String, FinscopeError> {
        if !is_accepted_upload(declared_mime) {
            debug!(mime = %declared_mime, "Rejected upload type");
            return Err(FinscopeError::Validation(INVALID_TYPE_MESSAGE.to_string()));
        }
        if size_bytes > self.max_bytes {
            debug!(size_bytes, max = self.max_bytes, "Rejected oversize upload");
            return Err(FinscopeError::Validation(self.too_large_message()));
        }
        Ok(normalize_mime(declared_mime))
    }

    /// Validate and encode an upload.
    pub fn accept(&self, payload: &MediaPayload) -> Result<EncodedImage, FinscopeError> {
        let mime = self.validate(&payload.mime_type, payload.data.len())?;
        info!(
            source = %payload.source,
            mime = %mime,
            size_bytes = payload.data.len(),
            "Accepted image upload"
        );
        Ok(encode_image(&mime, &payload.data))
    }
}

/// Base64-encode raw image bytes.
pub fn encode_image(mime_type: &str, bytes: &[u8]) -> EncodedImage {
    EncodedImage::new(mime_type, STANDARD.encode(bytes), bytes.len())
}

/// Split a `data:<mime>;base64,<payload>` URL into its media type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), FinscopeError> {
    let malformed = || FinscopeError::Validation(INVALID_TYPE_MESSAGE.to_string());

    let rest = url.strip_prefix("data:").ok_or_else(malformed)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(malformed)?;
    let mime = meta.strip_suffix(";base64").ok_or_else(malformed)?;
    let bytes = STANDARD.decode(payload.trim()).map_err(|_| malformed())?;

    Ok((normalize_mime(mime), bytes))
}

/// Read the bundled example image from disk.
///
/// Any failure (missing file, unreadable, empty, not an image) becomes a
/// [`FinscopeError::Load`] with the user-facing message.
pub async fn load_default_image(path: &Path) -> Result<EncodedImage, FinscopeError> {
    let load_failed = || FinscopeError::Load(LOAD_DEFAULT_FAILED_MESSAGE.to_string());

    let mime = detect_mime_type(path);
    if !is_image(mime) {
        warn!(path = %path.display(), mime, "Default image has a non-image extension");
        return Err(load_failed());
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to read default image");
        load_failed()
    })?;

    if bytes.is_empty() {
        warn!(path = %path.display(), "Default image is empty");
        return Err(load_failed());
    }

    debug!(path = %path.display(), size_bytes = bytes.len(), "Loaded default image");
    Ok(encode_image(mime, &bytes))
}
