//! Command palette: block-type conversion entries opened by typing `/`.

use crate::model::block::BlockKind;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: BlockKind,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub static PALETTE: [PaletteEntry; 11] = [
    PaletteEntry {
        kind: BlockKind::Text,
        label: "Text",
        keywords: &["plain", "paragraph"],
    },
    PaletteEntry {
        kind: BlockKind::Heading1,
        label: "Heading 1",
        keywords: &["h1", "title"],
    },
    PaletteEntry {
        kind: BlockKind::Heading2,
        label: "Heading 2",
        keywords: &["h2", "subtitle"],
    },
    PaletteEntry {
        kind: BlockKind::Bullet,
        label: "Bulleted list",
        keywords: &["ul", "unordered"],
    },
    PaletteEntry {
        kind: BlockKind::Numbered,
        label: "Numbered list",
        keywords: &["ol", "ordered"],
    },
    PaletteEntry {
        kind: BlockKind::Checkbox,
        label: "To-do list",
        keywords: &["todo", "checkbox", "task"],
    },
    PaletteEntry {
        kind: BlockKind::Table,
        label: "Table",
        keywords: &["grid"],
    },
    PaletteEntry {
        kind: BlockKind::Quote,
        label: "Quote",
        keywords: &["blockquote"],
    },
    PaletteEntry {
        kind: BlockKind::Code,
        label: "Code",
        keywords: &["snippet", "pre"],
    },
    PaletteEntry {
        kind: BlockKind::Callout,
        label: "Callout",
        keywords: &["note", "info"],
    },
    PaletteEntry {
        kind: BlockKind::Divider,
        label: "Divider",
        keywords: &["hr", "rule", "separator"],
    },
];

/// Returns the palette query when `content` is a bare `/query` token.
pub fn slash_query(content: &str) -> Option<&str> {
    let query = content.strip_prefix('/')?;
    if query.chars().any(char::is_whitespace) {
        return None;
    }
    Some(query)
}

/// Entries whose label or keywords match `query`, case-insensitively.
pub fn filter_entries(query: &str) -> Vec<&'static PaletteEntry> {
    let needle = query.trim().to_lowercase();
    PALETTE
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.label.to_lowercase().contains(&needle)
                || entry.kind.as_str().starts_with(&needle)
                || entry.keywords.iter().any(|keyword| keyword.starts_with(&needle))
        })
        .collect()
}

/// Removes a leading `/query` token typed to open the palette.
pub fn strip_slash_query(content: &str) -> &str {
    match content.strip_prefix('/') {
        Some(rest) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            rest[end..].trim_start()
        }
        None => content,
    }
}
