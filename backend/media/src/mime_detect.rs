//! MIME type detection and the accepted-upload allowlist.

use std::path::Path;

/// Media types the upload control accepts.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "webp"         => "image/webp",
        "gif"          => "image/gif",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "heic"         => "image/heic",
        "tiff" | "tif" => "image/tiff",
        "svg"          => "image/svg+xml",

        "pdf"          => "application/pdf",
        "txt"          => "text/plain",
        "json"         => "application/json",

        _              => "application/octet-stream",
    }
}

/// Lowercase a declared media type and drop any `;` parameters.
pub fn normalize_mime(declared: &str) -> String {
    declared
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Whether a MIME type is for an image of any kind.
pub fn is_image(mime: &str) -> bool {
    normalize_mime(mime).starts_with("image/")
}

/// Whether the upload control accepts this declared type.
pub fn is_accepted_upload(mime: &str) -> bool {
    let mime = normalize_mime(mime);
    ACCEPTED_IMAGE_TYPES.contains(&mime.as_str())
}
