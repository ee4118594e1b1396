//! Line-by-line classification of analysis text into display blocks.
//!
//! Classification is purely line-local. Each line is stripped of markup
//! decoration (`*`, `_`, `#`, `` ` ``) and surrounding whitespace, then tested in
//! priority order: numbered section header, dash-prefixed `label: value`,
//! dash-prefixed bullet, paragraph. Lines that are blank after stripping yield
//! nothing. No input can make the formatter fail.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `1.`, `12.` at the start of a line, plus any whitespace after the dot.
static SECTION_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());

const BULLET_MARKER: char = '-';
const LABEL_SEPARATOR: char = ':';
const BYTE_ORDER_MARK: char = '\u{feff}';

/// One structured unit of rendered output, derived from one line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayBlock {
    SectionHeader { title: String },
    LabeledField { label: String, value: String },
    BulletItem { text: String },
    Paragraph { text: String },
}

/// Remove markup decoration characters anywhere in the line, then trim.
pub fn strip_decoration(line: &str) -> String {
    let stripped = line
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect::<String>();
    trim_text(&stripped).to_string()
}

/// Whitespace trim that also drops byte-order marks.
fn trim_text(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// Classify a single raw line. Returns `None` for lines that are blank after stripping.
pub fn classify_line(line: &str) -> Option<DisplayBlock> {
    let clean = strip_decoration(line);
    if clean.is_empty() {
        return None;
    }

    if SECTION_NUMBER.is_match(&clean) {
        let title = SECTION_NUMBER.replace(&clean, "").into_owned();
        return Some(DisplayBlock::SectionHeader { title });
    }

    if let Some(rest) = clean.strip_prefix(BULLET_MARKER) {
        // Split on the first colon only; later colons belong to the value.
        if let Some((label, value)) = rest.split_once(LABEL_SEPARATOR) {
            return Some(DisplayBlock::LabeledField {
                label: trim_text(label).to_string(),
                value: trim_text(value).to_string(),
            });
        }
        return Some(DisplayBlock::BulletItem {
            text: trim_text(rest).to_string(),
        });
    }

    Some(DisplayBlock::Paragraph { text: clean })
}

/// Lazily classify every line of `text`, in order.
pub fn parse_blocks(text: &str) -> impl Iterator<Item = DisplayBlock> + '_ {
    text.split('\n').filter_map(classify_line)
}

/// Classify every line of `text` into an ordered list of display blocks.
pub fn format_analysis(text: &str) -> Vec<DisplayBlock> {
    parse_blocks(text).collect()
}
