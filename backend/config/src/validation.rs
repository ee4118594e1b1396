//! Config validation with field paths and user-friendly messages.

use crate::schema::FinscopeConfig;
use thiserror::Error;
use tracing::{error, warn};

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding through `tracing`.
    pub fn log(&self) {
        for warning in &self.warnings {
            warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FinscopeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_vision(config, &mut report);
    validate_media(config, &mut report);
    report
}

fn validate_server(config: &FinscopeConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if server.port == Some(0) {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if let Some(bind) = &server.bind_address {
        if bind.trim().is_empty() {
            report.error("server.bindAddress", "Bind address cannot be empty");
        }
    }
}

fn validate_vision(config: &FinscopeConfig, report: &mut ValidationReport) {
    let settings = config.settings();
    if settings.vision.api_key.is_none() {
        report.warn(
            "vision.apiKey",
            format!(
                "No API key configured (set {}); analysis requests will fail",
                settings.vision.provider.api_key_var()
            ),
        );
    }
    if settings.vision.timeout_secs == 0 {
        report.error("vision.timeoutSecs", "Timeout must be at least 1 second");
    }
    if settings.vision.max_tokens == 0 {
        report.error("vision.maxTokens", "maxTokens must be greater than zero");
    }
    if settings.vision.model.trim().is_empty() {
        report.error("vision.model", "Model name cannot be empty");
    }
    if let Some(url) = &settings.vision.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("vision.baseUrl", "Base URL must start with http:// or https://");
        }
    }
}

fn validate_media(config: &FinscopeConfig, report: &mut ValidationReport) {
    let settings = config.settings();
    if settings.max_upload_bytes == 0 {
        report.error("media.maxUploadBytes", "Upload limit must be greater than zero");
    }
    if !settings.default_image.exists() {
        report.warn(
            "media.defaultImage",
            format!(
                "Default image {} not found; the example will not load",
                settings.default_image.display()
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MediaConfig, ServerConfig, VisionConfig};
    use std::sync::{Arc, Mutex};

    #[test]
    fn defaults_only_warn() {
        let report = validate(&FinscopeConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "vision.apiKey"));
    }

    #[test]
    fn zero_port_and_limit_are_errors() {
        let cfg = FinscopeConfig {
            server: Some(ServerConfig {
                port: Some(0),
                ..Default::default()
            }),
            media: Some(MediaConfig {
                max_upload_bytes: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"server.port"));
        assert!(paths.contains(&"media.maxUploadBytes"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn log_emits_every_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let report = validate(&FinscopeConfig::default());
        tracing::subscriber::with_default(subscriber, || report.log());

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("Config warning"), "{out}");
        assert!(out.contains("vision.apiKey"), "{out}");
    }

    #[test]
    fn bad_base_url_is_an_error() {
        let cfg = FinscopeConfig {
            vision: Some(VisionConfig {
                api_key: Some("k".into()),
                base_url: Some("localhost:1234".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "vision.baseUrl"));
        assert!(!report.warnings.iter().any(|w| w.path == "vision.apiKey"));
    }
}
