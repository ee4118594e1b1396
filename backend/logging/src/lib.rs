//! Structured logging for Finscope.
//!
//! Console output (human or JSON), optional daily-rotated NDJSON files,
//! and secret scrubbing for strings that may reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
