//! Config defaults: applies default values to a parsed config.

use std::path::PathBuf;

use crate::schema::{FinscopeConfig, LoggingConfig, MediaConfig, ServerConfig, VisionConfig};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default request timeout for the inference call (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default max tokens for the model response.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default upload ceiling: 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_DEFAULT_IMAGE: &str = "assets/default-fish.jpg";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FinscopeConfig) -> FinscopeConfig {
    let config = apply_server_defaults(config);
    let config = apply_vision_defaults(config);
    let config = apply_media_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: FinscopeConfig) -> FinscopeConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind_address.is_none() {
        server.bind_address = Some(DEFAULT_BIND_ADDRESS.to_string());
    }
    if server.port.is_none() {
        server.port = Some(DEFAULT_PORT);
    }
    config
}

/// Model defaults depend on the chosen provider.
fn apply_vision_defaults(mut config: FinscopeConfig) -> FinscopeConfig {
    let vision = config.vision.get_or_insert_with(VisionConfig::default);
    let provider = *vision.provider.get_or_insert_with(Default::default);
    if vision.model.is_none() {
        vision.model = Some(provider.default_model().to_string());
    }
    if vision.timeout_secs.is_none() {
        vision.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    if vision.max_tokens.is_none() {
        vision.max_tokens = Some(DEFAULT_MAX_TOKENS);
    }
    config
}

fn apply_media_defaults(mut config: FinscopeConfig) -> FinscopeConfig {
    let media = config.media.get_or_insert_with(MediaConfig::default);
    if media.max_upload_bytes.is_none() {
        media.max_upload_bytes = Some(DEFAULT_MAX_UPLOAD_BYTES);
    }
    if media.default_image.is_none() {
        media.default_image = Some(PathBuf::from(DEFAULT_DEFAULT_IMAGE));
    }
    config
}

fn apply_logging_defaults(mut config: FinscopeConfig) -> FinscopeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}
