//! Default content seeded into an empty workspace.

use crate::model::block::{Block, BlockBody, BlockKind};
use crate::model::page::Page;

/// Title of the page seeded into an empty workspace.
pub const WELCOME_PAGE_TITLE: &str = "Getting Started";
pub const WELCOME_PAGE_ICON: &str = "👋";

/// Builds the welcome page.
///
/// The block kind sequence is fixed; only ids and timestamps differ between
/// calls.
pub fn welcome_page(now_ms: i64) -> Page {
    let blocks = vec![
        Block::with_text(BlockKind::Heading1, "Welcome to Blockpad"),
        Block::with_text(
            BlockKind::Text,
            "Every line on this page is a block. Click anywhere to start typing.",
        ),
        Block::with_text(BlockKind::Heading2, "The basics"),
        Block::with_text(BlockKind::Bullet, "Press Enter to start a new block"),
        Block::with_text(BlockKind::Bullet, "Type / to turn a block into something else"),
        Block::with_text(BlockKind::Bullet, "Drag the handle to reorder blocks"),
        Block::with_text(BlockKind::Bullet, "Backspace on an empty block removes it"),
        Block::new(BlockBody::Divider),
        Block::with_text(BlockKind::Checkbox, "Create your first page"),
        Block::with_text(BlockKind::Checkbox, "Open this workspace on another device"),
        Block::with_text(
            BlockKind::Quote,
            "Pages save themselves while you type.",
        ),
        Block::with_text(
            BlockKind::Callout,
            "Offline? Edits are kept on this device until the connection returns.",
        ),
    ];
    Page::with_blocks(WELCOME_PAGE_TITLE, WELCOME_PAGE_ICON, blocks, now_ms)
}
