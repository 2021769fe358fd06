//! Page domain model and block mutation operations.
//!
//! # Responsibility
//! - Own the ordered block sequence of one page.
//! - Apply every structural and content mutation on that sequence.
//!
//! # Invariants
//! - `blocks` is never empty: deletion refuses to remove the last block.
//! - `updated_at` never moves backwards.
//! - Mutations that fail leave the block sequence unchanged.
//!
//! Operations here are pure with respect to persistence; the session decides
//! when a successful mutation is saved.

use crate::model::block::{Block, BlockBody, BlockKind, GridError, TableGrid};
use crate::model::id::{new_id, BlockId, PageId};
use crate::model::text::{char_len, insert_at_char, split_at_char};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title assigned to pages with no (or a blank) title.
pub const DEFAULT_PAGE_TITLE: &str = "Untitled";

/// Fixed palette of page icon glyphs.
pub const PAGE_ICONS: [&str; 12] = [
    "📄", "📝", "📓", "📚", "💡", "🎯", "🚀", "🌱", "🧭", "🗂️", "⭐", "👋",
];

pub type PageResult<T> = Result<T, PageError>;

/// Rejected page mutation. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    BlockNotFound(BlockId),
    /// Deleting would leave the page without blocks.
    LastBlock(BlockId),
    NotCheckbox(BlockId),
    NotTable(BlockId),
    /// The block kind carries no text (table or divider).
    NoTextContent(BlockId),
    Grid { block_id: BlockId, source: GridError },
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::LastBlock(_) => write!(f, "a page needs at least one block"),
            Self::NotCheckbox(id) => write!(f, "block is not a checkbox: {id}"),
            Self::NotTable(id) => write!(f, "block is not a table: {id}"),
            Self::NoTextContent(id) => write!(f, "block has no text content: {id}"),
            Self::Grid { source, .. } => write!(f, "{source}"),
        }
    }
}

impl Error for PageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result of splitting a block at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// A new block was inserted after the source block.
    Split { new_block: BlockId },
    /// An empty list-like block was converted to plain text instead.
    ExitedList,
}

/// Ordered sequence of blocks plus page metadata.
///
/// Serializes to the page document shape `{ id, title, icon, blocks,
/// createdAt, updatedAt }` used by both stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_title() -> String {
    DEFAULT_PAGE_TITLE.to_string()
}

fn default_icon() -> String {
    PAGE_ICONS[0].to_string()
}

impl Page {
    /// Creates an "Untitled" page holding one empty text block.
    pub fn new(icon: impl Into<String>, now_ms: i64) -> Self {
        Self::with_blocks(
            DEFAULT_PAGE_TITLE,
            icon,
            vec![Block::new(BlockBody::empty(BlockKind::Text))],
            now_ms,
        )
    }

    /// Creates a page from explicit blocks; an empty list is normalized.
    pub fn with_blocks(
        title: impl Into<String>,
        icon: impl Into<String>,
        blocks: Vec<Block>,
        now_ms: i64,
    ) -> Self {
        let mut page = Self {
            id: new_id(),
            title: title.into(),
            icon: icon.into(),
            blocks,
            created_at: now_ms,
            updated_at: now_ms,
        };
        page.normalize();
        page
    }

    /// Repairs metadata and block invariants on data that came from a store.
    ///
    /// Returns `true` when something had to change.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.title.trim().is_empty() {
            self.title = default_title();
            changed = true;
        }
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockBody::empty(BlockKind::Text)));
            changed = true;
        }
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
            changed = true;
        }
        changed
    }

    /// Advances `updated_at` without ever moving it backwards.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = self.updated_at.max(now_ms);
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    fn require_position(&self, id: BlockId) -> PageResult<usize> {
        self.position(id).ok_or(PageError::BlockNotFound(id))
    }

    fn block_mut(&mut self, id: BlockId) -> PageResult<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|block| block.id == id)
            .ok_or(PageError::BlockNotFound(id))
    }

    /// Inserts a new block after `after`, or appends when `after` is `None`.
    pub fn insert_block_after(
        &mut self,
        after: Option<BlockId>,
        body: BlockBody,
    ) -> PageResult<&Block> {
        let index = match after {
            Some(id) => self.require_position(id)? + 1,
            None => self.blocks.len(),
        };
        self.blocks.insert(index, Block::new(body));
        Ok(&self.blocks[index])
    }

    /// Splits a block at a char offset.
    ///
    /// The source keeps the text before the cursor; a new block after it gets
    /// the rest. List-like blocks continue their kind unless they are empty,
    /// in which case the block leaves the list (becomes plain text) and no
    /// block is created.
    pub fn split_block(&mut self, id: BlockId, cursor: usize) -> PageResult<SplitOutcome> {
        let index = self.require_position(id)?;
        let source = &mut self.blocks[index];
        let kind = source.kind();

        let original = source.text().unwrap_or_default().to_string();
        if kind.is_list_like() && original.is_empty() {
            source.body = BlockBody::empty(BlockKind::Text);
            return Ok(SplitOutcome::ExitedList);
        }

        let (before, after) = split_at_char(&original, cursor);
        let new_kind = if kind.is_list_like() {
            kind
        } else {
            BlockKind::Text
        };
        let new_block = Block::with_text(new_kind, after);
        if let Some(text) = source.body.text_mut() {
            *text = before.to_string();
        }

        let new_id = new_block.id;
        self.blocks.insert(index + 1, new_block);
        Ok(SplitOutcome::Split { new_block: new_id })
    }

    /// Removes a block and returns the block that should receive focus.
    ///
    /// The focus target is the block preceding the removed one, or the new
    /// first block when the removed block was first.
    pub fn delete_block(&mut self, id: BlockId) -> PageResult<BlockId> {
        let index = self.require_position(id)?;
        if self.blocks.len() <= 1 {
            return Err(PageError::LastBlock(id));
        }
        self.blocks.remove(index);
        let target = index.saturating_sub(1);
        Ok(self.blocks[target].id)
    }

    /// Clones a block under a fresh id, right after the source.
    pub fn duplicate_block(&mut self, id: BlockId) -> PageResult<BlockId> {
        let index = self.require_position(id)?;
        let copy = self.blocks[index].duplicate();
        let copy_id = copy.id;
        self.blocks.insert(index + 1, copy);
        Ok(copy_id)
    }

    /// Changes a block's kind in place; returns `false` when already `kind`.
    pub fn change_type(&mut self, id: BlockId, kind: BlockKind) -> PageResult<bool> {
        let block = self.block_mut(id)?;
        if block.kind() == kind {
            return Ok(false);
        }
        let body = std::mem::replace(&mut block.body, BlockBody::Divider);
        block.body = body.converted(kind);
        Ok(true)
    }

    /// Moves `from` to the position currently held by `to`.
    ///
    /// Equivalent to removing `from` and re-inserting it at `to`'s index in
    /// the shortened sequence. Returns the moved block's new index.
    pub fn reorder(&mut self, from: BlockId, to: BlockId) -> PageResult<usize> {
        let from_index = self.require_position(from)?;
        self.require_position(to)?;
        if from == to {
            return Ok(from_index);
        }
        let moved = self.blocks.remove(from_index);
        let target = self.require_position(to)?;
        self.blocks.insert(target, moved);
        Ok(target)
    }

    /// Flips a checkbox and returns the new state.
    pub fn toggle_checked(&mut self, id: BlockId) -> PageResult<bool> {
        let block = self.block_mut(id)?;
        match &mut block.body {
            BlockBody::Checkbox { checked, .. } => {
                *checked = !*checked;
                Ok(*checked)
            }
            _ => Err(PageError::NotCheckbox(id)),
        }
    }

    /// Replaces a block's text.
    pub fn set_content(&mut self, id: BlockId, content: impl Into<String>) -> PageResult<()> {
        let block = self.block_mut(id)?;
        let text = block.body.text_mut().ok_or(PageError::NoTextContent(id))?;
        *text = content.into();
        Ok(())
    }

    /// Inserts text at a char offset and returns the caret offset after it.
    pub fn insert_text(&mut self, id: BlockId, cursor: usize, insert: &str) -> PageResult<usize> {
        let block = self.block_mut(id)?;
        let text = block.body.text_mut().ok_or(PageError::NoTextContent(id))?;
        let cursor = cursor.min(char_len(text));
        *text = insert_at_char(text, cursor, insert);
        Ok(cursor + char_len(insert))
    }

    /// Materializes the default grid of a table block on first render.
    ///
    /// Returns `true` when a grid was created.
    pub fn materialize_table(&mut self, id: BlockId) -> PageResult<bool> {
        let block = self.block_mut(id)?;
        match &mut block.body {
            BlockBody::Table(grid @ None) => {
                *grid = Some(TableGrid::default());
                Ok(true)
            }
            BlockBody::Table(Some(_)) => Ok(false),
            _ => Err(PageError::NotTable(id)),
        }
    }

    pub fn add_row(&mut self, id: BlockId) -> PageResult<()> {
        self.with_grid(id, |grid| {
            grid.add_row();
            Ok(())
        })
    }

    pub fn add_column(&mut self, id: BlockId) -> PageResult<()> {
        self.with_grid(id, |grid| {
            grid.add_column();
            Ok(())
        })
    }

    pub fn remove_row(&mut self, id: BlockId) -> PageResult<()> {
        self.with_grid(id, TableGrid::remove_row)
    }

    pub fn remove_column(&mut self, id: BlockId) -> PageResult<()> {
        self.with_grid(id, TableGrid::remove_column)
    }

    pub fn set_cell(
        &mut self,
        id: BlockId,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> PageResult<()> {
        let value = value.into();
        self.with_grid(id, |grid| grid.set_cell(row, column, value))
    }

    // A failed grid operation must not leave a freshly materialized grid
    // behind, so mutations run on a copy that is committed only on success.
    fn with_grid<F>(&mut self, id: BlockId, op: F) -> PageResult<()>
    where
        F: FnOnce(&mut TableGrid) -> Result<(), GridError>,
    {
        let block = self.block_mut(id)?;
        let BlockBody::Table(grid) = &mut block.body else {
            return Err(PageError::NotTable(id));
        };
        let mut working = grid.clone().unwrap_or_default();
        op(&mut working).map_err(|source| PageError::Grid {
            block_id: id,
            source,
        })?;
        *grid = Some(working);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageError, SplitOutcome, DEFAULT_PAGE_TITLE};
    use crate::model::block::{Block, BlockBody, BlockKind, GridError};

    fn page_of(blocks: Vec<Block>) -> Page {
        Page::with_blocks("Test", "📄", blocks, 1_000)
    }

    fn text(block: &Block) -> &str {
        block.text().unwrap_or_default()
    }

    #[test]
    fn new_page_has_one_empty_text_block() {
        let page = Page::new("📄", 5);
        assert_eq!(page.title, DEFAULT_PAGE_TITLE);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].kind(), BlockKind::Text);
        assert_eq!(page.created_at, 5);
        assert_eq!(page.updated_at, 5);
    }

    #[test]
    fn insert_after_none_appends() {
        let first = Block::with_text(BlockKind::Text, "a");
        let first_id = first.id;
        let mut page = page_of(vec![first]);

        let appended = page
            .insert_block_after(None, BlockBody::empty(BlockKind::Quote))
            .unwrap()
            .id;
        let middle = page
            .insert_block_after(Some(first_id), BlockBody::with_text(BlockKind::Code, "x"))
            .unwrap()
            .id;

        let ids: Vec<_> = page.blocks.iter().map(|block| block.id).collect();
        assert_eq!(ids, vec![first_id, middle, appended]);
    }

    #[test]
    fn split_plain_text_creates_text_block() {
        let heading = Block::with_text(BlockKind::Heading1, "Hello world");
        let id = heading.id;
        let mut page = page_of(vec![heading]);

        let outcome = page.split_block(id, 5).unwrap();
        let SplitOutcome::Split { new_block } = outcome else {
            panic!("expected split");
        };
        assert_eq!(text(&page.blocks[0]), "Hello");
        assert_eq!(page.blocks[0].kind(), BlockKind::Heading1);
        assert_eq!(page.blocks[1].id, new_block);
        assert_eq!(page.blocks[1].kind(), BlockKind::Text);
        assert_eq!(text(&page.blocks[1]), " world");
    }

    #[test]
    fn split_checkbox_continues_list_unchecked() {
        let mut block = Block::with_text(BlockKind::Checkbox, "buy milk");
        block.body = BlockBody::Checkbox {
            text: "buy milk".to_string(),
            checked: true,
        };
        let id = block.id;
        let mut page = page_of(vec![block]);

        page.split_block(id, 3).unwrap();
        assert_eq!(
            page.blocks[1].body,
            BlockBody::Checkbox {
                text: " milk".to_string(),
                checked: false
            }
        );
    }

    #[test]
    fn split_at_end_of_divider_inserts_empty_text() {
        let divider = Block::new(BlockBody::Divider);
        let id = divider.id;
        let mut page = page_of(vec![divider]);

        page.split_block(id, 0).unwrap();
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].body, BlockBody::Divider);
        assert_eq!(page.blocks[1].body, BlockBody::Text(String::new()));
    }

    #[test]
    fn empty_numbered_item_exits_list() {
        let block = Block::with_text(BlockKind::Numbered, "");
        let id = block.id;
        let mut page = page_of(vec![block]);

        assert_eq!(page.split_block(id, 0).unwrap(), SplitOutcome::ExitedList);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].kind(), BlockKind::Text);
        assert_eq!(page.blocks[0].id, id);
    }

    #[test]
    fn delete_first_block_focuses_new_first() {
        let a = Block::with_text(BlockKind::Text, "a");
        let b = Block::with_text(BlockKind::Text, "b");
        let (a_id, b_id) = (a.id, b.id);
        let mut page = page_of(vec![a, b]);

        assert_eq!(page.delete_block(a_id).unwrap(), b_id);
        assert_eq!(page.blocks.len(), 1);
    }

    #[test]
    fn delete_last_block_is_refused() {
        let only = Block::with_text(BlockKind::Text, "keep");
        let id = only.id;
        let mut page = page_of(vec![only]);
        let before = page.blocks.clone();

        assert_eq!(page.delete_block(id), Err(PageError::LastBlock(id)));
        assert_eq!(page.blocks, before);
    }

    #[test]
    fn duplicate_clones_payload_under_fresh_id() {
        let source = Block::new(BlockBody::Checkbox {
            text: "copy me".to_string(),
            checked: true,
        });
        let id = source.id;
        let mut page = page_of(vec![source]);

        let copy_id = page.duplicate_block(id).unwrap();
        assert_ne!(copy_id, id);
        assert_eq!(page.blocks[1].id, copy_id);
        assert_eq!(page.blocks[1].body, page.blocks[0].body);
    }

    #[test]
    fn change_type_to_divider_clears_content() {
        let block = Block::with_text(BlockKind::Text, "---");
        let id = block.id;
        let mut page = page_of(vec![block]);

        assert!(page.change_type(id, BlockKind::Divider).unwrap());
        assert_eq!(page.blocks[0].body, BlockBody::Divider);
        assert!(!page.change_type(id, BlockKind::Divider).unwrap());
    }

    #[test]
    fn reorder_moves_block_before_target() {
        let blocks: Vec<Block> = (0..5)
            .map(|index| Block::with_text(BlockKind::Text, index.to_string()))
            .collect();
        let ids: Vec<_> = blocks.iter().map(|block| block.id).collect();
        let mut page = page_of(blocks);

        // Forward move: target index 3 becomes 2 once the source is removed.
        assert_eq!(page.reorder(ids[1], ids[3]).unwrap(), 2);
        let order: Vec<_> = page.blocks.iter().map(text).collect();
        assert_eq!(order, vec!["0", "2", "1", "3", "4"]);

        // Backward move lands exactly at the target's index.
        assert_eq!(page.reorder(ids[4], ids[0]).unwrap(), 0);
        let order: Vec<_> = page.blocks.iter().map(text).collect();
        assert_eq!(order, vec!["4", "0", "2", "1", "3"]);
    }

    #[test]
    fn toggle_checked_requires_checkbox() {
        let check = Block::with_text(BlockKind::Checkbox, "task");
        let plain = Block::with_text(BlockKind::Text, "note");
        let (check_id, plain_id) = (check.id, plain.id);
        let mut page = page_of(vec![check, plain]);

        assert!(page.toggle_checked(check_id).unwrap());
        assert!(!page.toggle_checked(check_id).unwrap());
        assert_eq!(
            page.toggle_checked(plain_id),
            Err(PageError::NotCheckbox(plain_id))
        );
    }

    #[test]
    fn table_ops_materialize_default_grid() {
        let table = Block::new(BlockBody::Table(None));
        let id = table.id;
        let mut page = page_of(vec![table]);

        page.add_column(id).unwrap();
        let BlockBody::Table(Some(grid)) = &page.blocks[0].body else {
            panic!("grid should be materialized");
        };
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 4);
    }

    #[test]
    fn failed_table_shrink_leaves_grid_unchanged() {
        let table = Block::new(BlockBody::Table(None));
        let id = table.id;
        let mut page = page_of(vec![table]);
        page.materialize_table(id).unwrap();
        page.remove_row(id).unwrap();
        page.remove_row(id).unwrap();
        let before = page.blocks.clone();

        let err = page.remove_row(id).unwrap_err();
        assert_eq!(
            err,
            PageError::Grid {
                block_id: id,
                source: GridError::LastRow
            }
        );
        assert_eq!(page.blocks, before);
    }

    #[test]
    fn insert_text_returns_caret_after_insert() {
        let block = Block::with_text(BlockKind::Code, "fn main");
        let id = block.id;
        let mut page = page_of(vec![block]);

        assert_eq!(page.insert_text(id, 2, "\n").unwrap(), 3);
        assert_eq!(text(&page.blocks[0]), "fn\n main");
    }

    #[test]
    fn touch_is_monotonic() {
        let mut page = Page::new("📄", 100);
        page.touch(50);
        assert_eq!(page.updated_at, 100);
        page.touch(150);
        assert_eq!(page.updated_at, 150);
    }

    #[test]
    fn normalize_repairs_empty_page() {
        let mut page = Page::new("📄", 10);
        page.blocks.clear();
        page.title = "  ".to_string();
        assert!(page.normalize());
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.title, DEFAULT_PAGE_TITLE);
    }
}
