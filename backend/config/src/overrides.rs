//! Environment variable overrides applied on top of the config file.
//!
//! `FINSCOPE_*` variables always win. Provider API key variables
//! (`GEMINI_API_KEY`, `OPENAI_API_KEY`) only fill an unset `vision.apiKey`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::{
    FinscopeConfig, LoggingConfig, MediaConfig, ProviderKind, ServerConfig, VisionConfig,
};

pub const ENV_BIND: &str = "FINSCOPE_BIND";
pub const ENV_PORT: &str = "FINSCOPE_PORT";
pub const ENV_PROVIDER: &str = "FINSCOPE_VISION_PROVIDER";
pub const ENV_MODEL: &str = "FINSCOPE_VISION_MODEL";
pub const ENV_BASE_URL: &str = "FINSCOPE_VISION_BASE_URL";
pub const ENV_DEFAULT_IMAGE: &str = "FINSCOPE_DEFAULT_IMAGE";
pub const ENV_LOG_LEVEL: &str = "FINSCOPE_LOG_LEVEL";

pub fn apply_env_overrides(
    mut config: FinscopeConfig,
    env: &HashMap<String, String>,
) -> Result<FinscopeConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get(ENV_BIND) {
        server(&mut config).bind_address = Some(bind.to_string());
    }
    if let Some(port) = get(ENV_PORT) {
        let port: u16 = port
            .parse()
            .with_context(|| format!("Invalid {ENV_PORT} value: {port}"))?;
        server(&mut config).port = Some(port);
    }

    if let Some(provider) = get(ENV_PROVIDER) {
        let provider: ProviderKind = provider
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid {ENV_PROVIDER} value"))?;
        vision(&mut config).provider = Some(provider);
    }
    if let Some(model) = get(ENV_MODEL) {
        vision(&mut config).model = Some(model.to_string());
    }
    if let Some(url) = get(ENV_BASE_URL) {
        vision(&mut config).base_url = Some(url.to_string());
    }

    let provider = vision(&mut config).provider.unwrap_or_default();
    if vision(&mut config).api_key.is_none() {
        if let Some(key) = get(provider.api_key_var()) {
            vision(&mut config).api_key = Some(key.to_string());
        }
    }

    if let Some(path) = get(ENV_DEFAULT_IMAGE) {
        config
            .media
            .get_or_insert_with(MediaConfig::default)
            .default_image = Some(PathBuf::from(path));
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config
            .logging
            .get_or_insert_with(LoggingConfig::default)
            .level = Some(level.to_string());
    }

    Ok(config)
}

fn server(config: &mut FinscopeConfig) -> &mut ServerConfig {
    config.server.get_or_insert_with(ServerConfig::default)
}

fn vision(config: &mut FinscopeConfig) -> &mut VisionConfig {
    config.vision.get_or_insert_with(VisionConfig::default)
}
