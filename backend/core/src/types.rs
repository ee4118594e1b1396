use serde::{Deserialize, Serialize};

/// An image held in memory as base64, ready for transmission or display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    /// Declared media type, e.g. `image/png`.
    pub mime_type: String,
    /// Standard base64 of the raw bytes, no line breaks.
    pub base64: String,
    /// Size of the raw (decoded) image in bytes.
    pub size_bytes: usize,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>, size_bytes: usize) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
            size_bytes,
        }
    }

    /// `data:` URL suitable for an `<img src>` attribute.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}
