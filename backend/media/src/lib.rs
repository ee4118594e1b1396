use bytes::Bytes;

pub mod image;
pub mod mime_detect;

pub use image::{
    decode_data_url, encode_image, load_default_image, UploadPolicy, INVALID_TYPE_MESSAGE,
    LOAD_DEFAULT_FAILED_MESSAGE, MAX_UPLOAD_BYTES,
};
pub use mime_detect::{
    detect_mime_type, is_accepted_upload, is_image, normalize_mime, ACCEPTED_IMAGE_TYPES,
};

/// A file handed to us by the user, before validation.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// File name or other human-readable origin, for logging.
    pub source: String,
    /// Media type as declared by the client.
    pub mime_type: String,
    pub data: Bytes,
}

impl MediaPayload {
    pub fn new(source: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            source: source.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}
