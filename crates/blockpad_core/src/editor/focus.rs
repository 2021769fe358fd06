//! Focus intents returned by editing operations.

use crate::model::block::Block;
use crate::model::id::BlockId;
use crate::model::text::char_len;

/// Which block, at which char offset, should receive input focus next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusIntent {
    pub block_id: BlockId,
    pub offset: usize,
}

impl FocusIntent {
    pub fn at(block_id: BlockId, offset: usize) -> Self {
        Self { block_id, offset }
    }

    pub fn start(block_id: BlockId) -> Self {
        Self::at(block_id, 0)
    }

    /// Caret after the last character of `block` (0 for text-less kinds).
    pub fn end_of(block: &Block) -> Self {
        Self::at(block.id, block.text().map_or(0, char_len))
    }
}
