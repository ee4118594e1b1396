//! Renderers for display blocks.
//!
//! Plain text for logs and pipes, ANSI for the terminal, HTML for the web page.

use crate::blocks::DisplayBlock;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";

pub struct Renderer;

impl Renderer {
    /// Renders blocks as plain text, one line per block, with a blank line before each header.
    pub fn to_plain_text(blocks: &[DisplayBlock]) -> String {
        let mut output = String::new();
        for (i, block) in blocks.iter().enumerate() {
            match block {
                DisplayBlock::SectionHeader { title } => {
                    if i > 0 {
                        output.push('\n');
                    }
                    output.push_str(title);
                    output.push('\n');
                }
                DisplayBlock::LabeledField { label, value } => {
                    output.push_str(&format!("  {label}: {value}\n"));
                }
                DisplayBlock::BulletItem { text } => {
                    output.push_str(&format!("  • {text}\n"));
                }
                DisplayBlock::Paragraph { text } => {
                    output.push_str(text);
                    output.push('\n');
                }
            }
        }
        output
    }

    /// Renders blocks with ANSI styling for a color terminal.
    pub fn to_ansi(blocks: &[DisplayBlock]) -> String {
        let mut output = String::new();
        for (i, block) in blocks.iter().enumerate() {
            match block {
                DisplayBlock::SectionHeader { title } => {
                    if i > 0 {
                        output.push('\n');
                    }
                    output.push_str(&format!("{BOLD}{CYAN}{title}{RESET}\n"));
                }
                DisplayBlock::LabeledField { label, value } => {
                    output.push_str(&format!("  {BOLD}{label}:{RESET} {value}\n"));
                }
                DisplayBlock::BulletItem { text } => {
                    output.push_str(&format!("  {DIM}•{RESET} {text}\n"));
                }
                DisplayBlock::Paragraph { text } => {
                    output.push_str(text);
                    output.push('\n');
                }
            }
        }
        output
    }

    /// Renders blocks as an HTML fragment. All text is escaped.
    pub fn to_html(blocks: &[DisplayBlock]) -> String {
        let mut output = String::new();
        for block in blocks {
            match block {
                DisplayBlock::SectionHeader { title } => {
                    output.push_str(&format!(
                        "<div class=\"section\"><h3>{}</h3></div>\n",
                        escape(title)
                    ));
                }
                DisplayBlock::LabeledField { label, value } => {
                    output.push_str(&format!(
                        "<div class=\"field\"><span class=\"label\">{}:</span> <span class=\"value\">{}</span></div>\n",
                        escape(label),
                        escape(value)
                    ));
                }
                DisplayBlock::BulletItem { text } => {
                    output.push_str(&format!(
                        "<div class=\"bullet\"><span class=\"marker\">•</span> <span>{}</span></div>\n",
                        escape(text)
                    ));
                }
                DisplayBlock::Paragraph { text } => {
                    output.push_str(&format!("<p>{}</p>\n", escape(text)));
                }
            }
        }
        output
    }
}

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::format_analysis;

    const SAMPLE: &str = "1. Fish Identification:\n- Name: Clownfish\n- bright orange\nEnjoy.";

    #[test]
    fn plain_text_layout() {
        let out = Renderer::to_plain_text(&format_analysis(SAMPLE));
        assert_eq!(
            out,
            "Fish Identification:\n  Name: Clownfish\n  • bright orange\nEnjoy.\n"
        );
    }

    #[test]
    fn headers_after_the_first_get_a_blank_line() {
        let out = Renderer::to_plain_text(&format_analysis("1. A\n- x\n2. B"));
        assert_eq!(out, "A\n  • x\n\nB\n");
    }

    #[test]
    fn ansi_wraps_headers_in_bold() {
        let out = Renderer::to_ansi(&format_analysis(SAMPLE));
        assert!(out.starts_with(&format!("{BOLD}{CYAN}Fish Identification:{RESET}")));
        assert!(out.contains(&format!("{BOLD}Name:{RESET} Clownfish")));
    }

    #[test]
    fn html_escapes_text() {
        let blocks = vec![DisplayBlock::Paragraph {
            text: "<script>alert(1)</script> & more".into(),
        }];
        let out = Renderer::to_html(&blocks);
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains("&amp; more"));
    }

    #[test]
    fn html_marks_up_each_block_kind() {
        let out = Renderer::to_html(&format_analysis(SAMPLE));
        assert!(out.contains("<h3>Fish Identification:</h3>"));
        assert!(out.contains("<span class=\"label\">Name:</span>"));
        assert!(out.contains("<span>bright orange</span>"));
        assert!(out.contains("<p>Enjoy.</p>"));
    }
}
