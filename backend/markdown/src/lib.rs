//! Analysis text formatter and renderers.
//!
//! Turns the free-form text returned by the vision model into typed display
//! blocks (section headers, labeled fields, bullets, paragraphs) and renders
//! those blocks for the terminal, HTML, or plain text.

pub mod blocks;
pub mod renderer;

pub use blocks::{classify_line, format_analysis, parse_blocks, strip_decoration, DisplayBlock};
pub use renderer::Renderer;
