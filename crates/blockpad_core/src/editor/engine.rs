//! Input-to-mutation translation for the block editor.
//!
//! # Responsibility
//! - Map raw input events (keys with cursor offsets, text, paste, drag,
//!   palette picks) onto `Page` mutations.
//! - Report what changed and where focus should go next.
//!
//! # Invariants
//! - Backspace never merges a non-empty block into its predecessor; only an
//!   empty block at offset 0 is removed.
//! - An event the engine does not handle leaves the page untouched and is
//!   reported as unhandled so the input layer can apply its default.

use crate::editor::focus::FocusIntent;
use crate::editor::palette::strip_slash_query;
use crate::editor::shortcuts::detect_shortcut;
use crate::model::block::{BlockBody, BlockKind};
use crate::model::id::BlockId;
use crate::model::page::{Page, PageError, PageResult, SplitOutcome};
use crate::model::text::{char_len, split_at_char};

/// Raw input event addressed to one block.
///
/// Cursor offsets count characters within the block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorInput {
    Enter { block_id: BlockId, cursor: usize },
    /// Soft line break inside the block.
    ShiftEnter { block_id: BlockId, cursor: usize },
    Backspace { block_id: BlockId, cursor: usize },
    ArrowUp { block_id: BlockId, cursor: usize },
    ArrowDown { block_id: BlockId, cursor: usize },
    /// The block's full text after an input event.
    Text {
        block_id: BlockId,
        content: String,
        cursor: usize,
    },
    Paste {
        block_id: BlockId,
        cursor: usize,
        text: String,
    },
    /// Drag-and-drop of `dragged` onto `target`.
    Drop { dragged: BlockId, target: BlockId },
    ToggleChecked { block_id: BlockId },
    /// Command palette pick.
    Command { block_id: BlockId, kind: BlockKind },
    /// Block handle menu action.
    Menu { block_id: BlockId, action: BlockAction },
}

impl EditorInput {
    /// Block the event is addressed to.
    pub fn block_id(&self) -> BlockId {
        match self {
            Self::Enter { block_id, .. }
            | Self::ShiftEnter { block_id, .. }
            | Self::Backspace { block_id, .. }
            | Self::ArrowUp { block_id, .. }
            | Self::ArrowDown { block_id, .. }
            | Self::Text { block_id, .. }
            | Self::Paste { block_id, .. }
            | Self::ToggleChecked { block_id }
            | Self::Command { block_id, .. }
            | Self::Menu { block_id, .. } => *block_id,
            Self::Drop { dragged, .. } => *dragged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Duplicate,
    Delete,
    ConvertTo(BlockKind),
}

/// How much persisted meaning an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    None,
    /// Text edit: saved after the debounce window.
    Content,
    /// Discrete structural edit: saved immediately.
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub handled: bool,
    pub change: ChangeKind,
    pub focus: Option<FocusIntent>,
}

impl EditOutcome {
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            change: ChangeKind::None,
            focus: None,
        }
    }

    fn navigation(focus: FocusIntent) -> Self {
        Self {
            handled: true,
            change: ChangeKind::None,
            focus: Some(focus),
        }
    }

    fn content(focus: Option<FocusIntent>) -> Self {
        Self {
            handled: true,
            change: ChangeKind::Content,
            focus,
        }
    }

    fn structural(focus: Option<FocusIntent>) -> Self {
        Self {
            handled: true,
            change: ChangeKind::Structural,
            focus,
        }
    }
}

/// Applies one input event to `page`.
///
/// # Errors
/// - Returns `PageError` when the event targets a missing block or asks for
///   an invalid structural mutation; the page is unchanged in that case.
pub fn apply_input(page: &mut Page, input: EditorInput) -> PageResult<EditOutcome> {
    match input {
        EditorInput::Enter { block_id, cursor } => enter(page, block_id, cursor),
        EditorInput::ShiftEnter { block_id, cursor } => {
            if !has_text(page, block_id)? {
                return enter(page, block_id, cursor);
            }
            let caret = page.insert_text(block_id, cursor, "\n")?;
            Ok(EditOutcome::content(Some(FocusIntent::at(block_id, caret))))
        }
        EditorInput::Backspace { block_id, cursor } => backspace(page, block_id, cursor),
        EditorInput::ArrowUp { block_id, cursor } => {
            let index = require_position(page, block_id)?;
            if cursor > 0 || index == 0 {
                return Ok(EditOutcome::unhandled());
            }
            Ok(EditOutcome::navigation(FocusIntent::end_of(
                &page.blocks[index - 1],
            )))
        }
        EditorInput::ArrowDown { block_id, cursor } => {
            let index = require_position(page, block_id)?;
            let len = page.blocks[index].text().map_or(0, char_len);
            match page.blocks.get(index + 1) {
                Some(next) if cursor >= len => {
                    Ok(EditOutcome::navigation(FocusIntent::start(next.id)))
                }
                _ => Ok(EditOutcome::unhandled()),
            }
        }
        EditorInput::Text {
            block_id,
            content,
            cursor,
        } => text_input(page, block_id, content, cursor),
        EditorInput::Paste {
            block_id,
            cursor,
            text,
        } => paste(page, block_id, cursor, &text),
        EditorInput::Drop { dragged, target } => {
            if dragged == target {
                return Ok(EditOutcome::unhandled());
            }
            page.reorder(dragged, target)?;
            Ok(EditOutcome::structural(None))
        }
        EditorInput::ToggleChecked { block_id } => {
            page.toggle_checked(block_id)?;
            Ok(EditOutcome::structural(None))
        }
        EditorInput::Command { block_id, kind } => {
            if let Some(text) = page.block(block_id).and_then(|block| block.text()) {
                let stripped = strip_slash_query(text).to_string();
                page.set_content(block_id, stripped)?;
            }
            convert(page, block_id, kind)
        }
        EditorInput::Menu { block_id, action } => match action {
            BlockAction::Duplicate => {
                let copy = page.duplicate_block(block_id)?;
                Ok(EditOutcome::structural(focus_end(page, copy)))
            }
            BlockAction::Delete => {
                let (_, focus) = delete_and_refocus(page, block_id)?;
                Ok(EditOutcome::structural(focus))
            }
            BlockAction::ConvertTo(kind) => convert(page, block_id, kind),
        },
    }
}

fn require_position(page: &Page, block_id: BlockId) -> PageResult<usize> {
    page.position(block_id)
        .ok_or(PageError::BlockNotFound(block_id))
}

fn has_text(page: &Page, block_id: BlockId) -> PageResult<bool> {
    page.block(block_id)
        .map(|block| block.kind().has_text())
        .ok_or(PageError::BlockNotFound(block_id))
}

fn focus_end(page: &Page, block_id: BlockId) -> Option<FocusIntent> {
    page.block(block_id).map(FocusIntent::end_of)
}

fn enter(page: &mut Page, block_id: BlockId, cursor: usize) -> PageResult<EditOutcome> {
    let focus = match page.split_block(block_id, cursor)? {
        SplitOutcome::Split { new_block } => FocusIntent::start(new_block),
        SplitOutcome::ExitedList => FocusIntent::start(block_id),
    };
    Ok(EditOutcome::structural(Some(focus)))
}

fn backspace(page: &mut Page, block_id: BlockId, cursor: usize) -> PageResult<EditOutcome> {
    let index = require_position(page, block_id)?;
    let removable = match &page.blocks[index].body {
        BlockBody::Divider => true,
        // Table cells handle their own deletion.
        BlockBody::Table(_) => false,
        body => cursor == 0 && body.text().is_some_and(str::is_empty),
    };
    if !removable {
        return Ok(EditOutcome::unhandled());
    }

    let (_, focus) = delete_and_refocus(page, block_id)?;
    Ok(EditOutcome::structural(focus))
}

/// Deletes a block and picks the caret position that follows it.
///
/// Focus lands at the end of the previous block, or at the start of the new
/// first block when the first block was removed.
pub fn delete_and_refocus(
    page: &mut Page,
    block_id: BlockId,
) -> PageResult<(BlockId, Option<FocusIntent>)> {
    let index = require_position(page, block_id)?;
    let target = page.delete_block(block_id)?;
    let focus = if index == 0 {
        Some(FocusIntent::start(target))
    } else {
        focus_end(page, target)
    };
    Ok((target, focus))
}

fn text_input(
    page: &mut Page,
    block_id: BlockId,
    content: String,
    cursor: usize,
) -> PageResult<EditOutcome> {
    let block = page
        .block(block_id)
        .ok_or(PageError::BlockNotFound(block_id))?;
    // Only a marker completed by this very keystroke converts the block;
    // text that already starts with one stays literal.
    let marker_typed = block.kind() == BlockKind::Text
        && !block.text().is_some_and(|text| detect_shortcut(text).is_some());

    if marker_typed {
        if let Some(shortcut) =
            detect_shortcut(&content).filter(|shortcut| shortcut.marker_len == cursor)
        {
            page.set_content(block_id, shortcut.remainder)?;
            let outcome = convert(page, block_id, shortcut.kind)?;
            if shortcut.kind == BlockKind::Divider {
                return Ok(outcome);
            }
            return Ok(EditOutcome::structural(Some(FocusIntent::start(block_id))));
        }
    }

    page.set_content(block_id, content)?;
    Ok(EditOutcome::content(None))
}

fn convert(page: &mut Page, block_id: BlockId, kind: BlockKind) -> PageResult<EditOutcome> {
    page.change_type(block_id, kind)?;
    if kind != BlockKind::Divider {
        return Ok(EditOutcome::structural(focus_end(page, block_id)));
    }

    // A divider cannot hold the caret: move on to the next block, creating
    // an empty one when the divider is last.
    let index = require_position(page, block_id)?;
    let next = match page.blocks.get(index + 1) {
        Some(next) => next.id,
        None => {
            page.insert_block_after(Some(block_id), BlockBody::empty(BlockKind::Text))?
                .id
        }
    };
    Ok(EditOutcome::structural(Some(FocusIntent::start(next))))
}

fn paste(page: &mut Page, block_id: BlockId, cursor: usize, text: &str) -> PageResult<EditOutcome> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let block = page
        .block(block_id)
        .ok_or(PageError::BlockNotFound(block_id))?;
    let kind = block.kind();

    if kind == BlockKind::Code || (kind.has_text() && !normalized.contains('\n')) {
        let caret = page.insert_text(block_id, cursor, &normalized)?;
        return Ok(EditOutcome::content(Some(FocusIntent::at(block_id, caret))));
    }

    let mut lines = normalized.split('\n');
    let first = lines.next().unwrap_or_default();
    let continuation = if kind.is_list_like() {
        kind
    } else {
        BlockKind::Text
    };

    // Text after the caret moves to the end of the last pasted line.
    let (mut anchor, tail) = match block.text() {
        Some(current) => {
            let (before, after) = split_at_char(current, cursor);
            let head = format!("{before}{first}");
            let tail = after.to_string();
            page.set_content(block_id, head)?;
            (block_id, tail)
        }
        None => {
            let inserted = page
                .insert_block_after(Some(block_id), BlockBody::with_text(continuation, first))?
                .id;
            (inserted, String::new())
        }
    };

    for line in lines {
        anchor = page
            .insert_block_after(Some(anchor), BlockBody::with_text(continuation, line))?
            .id;
    }

    let caret = page
        .block(anchor)
        .and_then(|block| block.text())
        .map_or(0, char_len);
    let combined = page
        .block(anchor)
        .and_then(|block| block.text())
        .map(|text| format!("{text}{tail}"))
        .unwrap_or_default();
    page.set_content(anchor, combined)?;
    Ok(EditOutcome::structural(Some(FocusIntent::at(anchor, caret))))
}
