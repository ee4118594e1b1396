//! Turns resolved settings into runtime components.

use std::time::Duration;

use anyhow::{Context, Result};
use finscope_agent::FishAnalyzer;
use finscope_config::{ProviderKind, Settings, VisionSettings};
use finscope_logging::LogOptions;
use finscope_media::UploadPolicy;
use finscope_understanding::{build_vision_client, VisionOptions, VisionProvider};

pub fn vision_provider(vision: &VisionSettings) -> Result<VisionProvider> {
    let api_key = vision.api_key.clone().with_context(|| {
        format!(
            "no API key for the {} provider; set {} or vision.apiKey",
            provider_label(vision.provider),
            vision.provider.api_key_var()
        )
    })?;

    let provider = match vision.provider {
        ProviderKind::Gemini => VisionProvider::gemini(api_key),
        ProviderKind::OpenAi => VisionProvider::openai(api_key),
    };
    Ok(provider.with_model(vision.model.clone()))
}

pub fn vision_options(vision: &VisionSettings) -> VisionOptions {
    VisionOptions {
        base_url: vision.base_url.clone(),
        timeout: Duration::from_secs(vision.timeout_secs),
        max_tokens: vision.max_tokens,
    }
}

pub fn build_analyzer(settings: &Settings) -> Result<FishAnalyzer> {
    let provider = vision_provider(&settings.vision)?;
    let client = build_vision_client(provider, vision_options(&settings.vision))?;
    Ok(FishAnalyzer::new(
        client,
        UploadPolicy::new(settings.max_upload_bytes),
        settings.default_image.clone(),
    ))
}

/// One-shot commands keep stderr quiet unless asked otherwise.
pub fn log_options(settings: &Settings, serving: bool) -> LogOptions {
    LogOptions {
        level: if serving {
            settings.log_level.clone()
        } else {
            "warn".to_string()
        },
        json: settings.log_json,
        dir: if serving { settings.log_dir.clone() } else { None },
    }
}

fn provider_label(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "gemini",
        ProviderKind::OpenAi => "openai",
    }
}
