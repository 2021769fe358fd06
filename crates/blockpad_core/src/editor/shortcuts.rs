//! Markdown-style shortcuts typed at the start of a plain text block.
//!
//! # Invariants
//! - Shortcuts only fire on `BlockKind::Text` blocks, and only on the input
//!   that completes the marker with the caret right after it.
//! - Space-terminated prefixes (`# `, `- `, `[] ` ...) are removed from the
//!   text; fence shortcuts (```` ``` ````, `---`) must be the whole text.

use crate::model::block::BlockKind;
use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_SHORTCUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(##|#|[-*]|1\.|\[ ?\]|>) ").expect("valid prefix shortcut regex"));
static FENCE_SHORTCUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(```|---)$").expect("valid fence shortcut regex"));

/// Detected shortcut: the target kind and the text left after the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub kind: BlockKind,
    /// Number of chars consumed by the marker.
    pub marker_len: usize,
    pub remainder: String,
}

/// Detects a shortcut at the start of `content`.
pub fn detect_shortcut(content: &str) -> Option<Shortcut> {
    if let Some(caps) = FENCE_SHORTCUT_RE.captures(content) {
        let kind = match &caps[1] {
            "```" => BlockKind::Code,
            _ => BlockKind::Divider,
        };
        return Some(Shortcut {
            kind,
            marker_len: content.chars().count(),
            remainder: String::new(),
        });
    }

    let caps = PREFIX_SHORTCUT_RE.captures(content)?;
    let kind = match &caps[1] {
        "#" => BlockKind::Heading1,
        "##" => BlockKind::Heading2,
        "-" | "*" => BlockKind::Bullet,
        "1." => BlockKind::Numbered,
        ">" => BlockKind::Quote,
        _ => BlockKind::Checkbox,
    };
    let matched = &caps[0];
    Some(Shortcut {
        kind,
        marker_len: matched.chars().count(),
        remainder: content[matched.len()..].to_string(),
    })
}
