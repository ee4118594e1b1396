//! Rendering display blocks for stdout.

use anyhow::Result;
use clap::ValueEnum;
use finscope_markdown::{DisplayBlock, Renderer};

use crate::terminal_output::supports_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Ansi,
    Html,
    Json,
}

impl OutputFormat {
    /// ANSI on a color terminal, plain text otherwise.
    pub fn detect() -> Self {
        if supports_color() {
            OutputFormat::Ansi
        } else {
            OutputFormat::Plain
        }
    }
}

pub fn render(blocks: &[DisplayBlock], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Plain => Renderer::to_plain_text(blocks),
        OutputFormat::Ansi => Renderer::to_ansi(blocks),
        OutputFormat::Html => Renderer::to_html(blocks),
        OutputFormat::Json => serde_json::to_string_pretty(blocks)?,
    })
}
