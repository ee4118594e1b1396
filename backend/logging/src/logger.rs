//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional JSON formatting,
//! daily file rotation (NDJSON), and environment-based level control.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file prefix inside `LogOptions::dir`.
pub const LOG_FILE_PREFIX: &str = "finscope.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl LogOptions {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the global structured logger.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logger(options: &LogOptions) -> bool {
    // Rolling file appender: writes NDJSON to `<dir>/finscope.log.YYYY-MM-DD`
    let file_layer = options.dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let (json_console, plain_console) = if options.json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        let plain = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true);
        (None, Some(plain))
    };

    tracing_subscriber::registry()
        .with(options.filter())
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back() {
        let options = LogOptions {
            level: "not a [valid] directive".into(),
            ..Default::default()
        };
        // Must not panic even with an unparsable directive.
        let _ = options.filter();
    }

    #[test]
    fn second_init_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let options = LogOptions {
            level: "debug".into(),
            json: true,
            dir: Some(dir.path().to_path_buf()),
        };
        let _ = init_logger(&options);
        assert!(!init_logger(&options));
    }
}
