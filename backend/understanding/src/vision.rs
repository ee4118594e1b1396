/// Vision understanding: describe a fish photo with a multimodal LLM.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use finscope_core::{EncodedImage, FinscopeError, VisionClient};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Shown when the upstream answered but gave us nothing usable.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Supported vision providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisionProvider {
    OpenAI { api_key: String, model: String },
    Gemini { api_key: String, model: String },
}

impl VisionProvider {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAI { api_key: api_key.into(), model: DEFAULT_OPENAI_MODEL.to_string() }
    }
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini { api_key: api_key.into(), model: DEFAULT_GEMINI_MODEL.to_string() }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        match self {
            Self::OpenAI { api_key, .. } => Self::OpenAI { api_key, model: model.into() },
            Self::Gemini { api_key, .. } => Self::Gemini { api_key, model: model.into() },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAI { .. } => "openai",
            Self::Gemini { .. } => "gemini",
        }
    }
}

/// Transport knobs shared by all providers.
#[derive(Debug, Clone)]
pub struct VisionOptions {
    /// Override the provider's API root (tests, proxies).
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for VisionOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(60),
            max_tokens: 2048,
        }
    }
}

/// Build the client for a provider. An empty API key is a configuration error.
pub fn build_vision_client(
    provider: VisionProvider,
    options: VisionOptions,
) -> Result<Arc<dyn VisionClient>, FinscopeError> {
    let http = reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|e| FinscopeError::Config(format!("failed to build HTTP client: {e}")))?;

    match provider {
        VisionProvider::Gemini { api_key, model } => {
            require_key("gemini", &api_key)?;
            Ok(Arc::new(GeminiVision {
                http,
                api_key,
                model,
                base_url: options.base_url.unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
                max_tokens: options.max_tokens,
            }))
        }
        VisionProvider::OpenAI { api_key, model } => {
            require_key("openai", &api_key)?;
            Ok(Arc::new(OpenAiVision {
                http,
                api_key,
                model,
                base_url: options.base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                max_tokens: options.max_tokens,
            }))
        }
    }
}

fn require_key(provider: &str, api_key: &str) -> Result<(), FinscopeError> {
    if api_key.trim().is_empty() {
        return Err(FinscopeError::Config(format!("missing API key for {provider} vision provider")));
    }
    Ok(())
}

/// Google Gemini `generateContent` with inline image data.
pub struct GeminiVision {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

#[async_trait]
impl VisionClient for GeminiVision {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn describe(&self, image: &EncodedImage, prompt: &str) -> Result<String, FinscopeError> {
        info!(model = %self.model, size_bytes = image.size_bytes, "[Vision] Describing image via Gemini");
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [
                { "text": prompt },
                { "inlineData": { "mimeType": image.mime_type, "data": image.base64 } }
            ]}],
            "generationConfig": { "maxOutputTokens": self.max_tokens }
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Gemini", e))?;
        let json = read_json("Gemini", resp).await?;

        let text = json["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        non_empty("Gemini", text)
    }
}

/// OpenAI chat completions with an `image_url` data URL.
pub struct OpenAiVision {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

#[async_trait]
impl VisionClient for OpenAiVision {
    fn name(&self) -> &str {
        "openai"
    }

    async fn describe(&self, image: &EncodedImage, prompt: &str) -> Result<String, FinscopeError> {
        info!(model = %self.model, size_bytes = image.size_bytes, "[Vision] Describing image via OpenAI");
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image.data_url() } }
                ]
            }],
            "max_tokens": self.max_tokens
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("OpenAI", e))?;
        let json = read_json("OpenAI", resp).await?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        non_empty("OpenAI", text)
    }
}

fn transport_error(provider: &str, e: reqwest::Error) -> FinscopeError {
    let e = e.without_url();
    warn!(provider, error = %e, "Vision request failed to send");
    FinscopeError::Request(format!("Failed to reach {provider}: {e}"))
}

/// Turn a non-success status into a `Request` error carrying the upstream message.
async fn read_json(provider: &str, resp: reqwest::Response) -> Result<Value, FinscopeError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let upstream = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string));
        warn!(provider, status = %status, "Vision request rejected upstream");
        let message = match upstream {
            Some(msg) => format!("{provider} error ({}): {msg}", status.as_u16()),
            None => format!("{provider} error ({status})"),
        };
        return Err(FinscopeError::Request(message));
    }

    resp.json::<Value>().await.map_err(|e| {
        warn!(provider, error = %e.without_url(), "Vision response was not JSON");
        FinscopeError::Request(GENERIC_FAILURE_MESSAGE.to_string())
    })
}

fn non_empty(provider: &str, text: String) -> Result<String, FinscopeError> {
    if text.trim().is_empty() {
        warn!(provider, "Vision response contained no text");
        return Err(FinscopeError::Request(GENERIC_FAILURE_MESSAGE.to_string()));
    }
    debug!(provider, chars = text.len(), "Vision response received");
    Ok(text)
}
