//! Active-editing detection for render suppression.
//!
//! A session counts as "actively editing" while a block holds focus and for
//! a grace window after the last blur. Snapshots arriving in that period
//! update state but must not re-render the editor under the user's caret.

use crate::model::id::BlockId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSuppression {
    grace_ms: i64,
    focused: Option<BlockId>,
    /// Expiry of the post-blur grace window, exclusive.
    grace_until_ms: Option<i64>,
}

impl EditSuppression {
    pub fn new(grace_ms: i64) -> Self {
        Self {
            grace_ms: grace_ms.max(0),
            focused: None,
            grace_until_ms: None,
        }
    }

    pub fn focus(&mut self, block_id: BlockId) {
        self.focused = Some(block_id);
        self.grace_until_ms = None;
    }

    /// Drops focus and opens the grace window.
    pub fn blur(&mut self, now_ms: i64) {
        if self.focused.take().is_some() {
            self.grace_until_ms = Some(now_ms + self.grace_ms);
        }
    }

    /// Forgets focus without a grace window (the block went away).
    pub fn clear(&mut self) {
        self.focused = None;
        self.grace_until_ms = None;
    }

    pub fn focused_block(&self) -> Option<BlockId> {
        self.focused
    }

    pub fn grace_until_ms(&self) -> Option<i64> {
        self.grace_until_ms
    }

    pub fn is_editing(&self, now_ms: i64) -> bool {
        self.focused.is_some() || self.grace_until_ms.is_some_and(|until| now_ms < until)
    }
}

#[cfg(test)]
mod tests {
    use super::EditSuppression;
    use crate::model::id::new_id;

    #[test]
    fn focused_block_counts_as_editing() {
        let mut suppression = EditSuppression::new(500);
        assert!(!suppression.is_editing(0));
        suppression.focus(new_id());
        assert!(suppression.is_editing(1_000_000));
    }

    #[test]
    fn grace_window_expires_after_blur() {
        let mut suppression = EditSuppression::new(500);
        suppression.focus(new_id());
        suppression.blur(1_000);
        assert!(suppression.is_editing(1_499));
        assert!(!suppression.is_editing(1_500));
    }

    #[test]
    fn blur_without_focus_opens_no_window() {
        let mut suppression = EditSuppression::new(500);
        suppression.blur(1_000);
        assert!(!suppression.is_editing(1_000));
    }

    #[test]
    fn refocus_closes_grace_window() {
        let mut suppression = EditSuppression::new(500);
        let block = new_id();
        suppression.focus(block);
        suppression.blur(0);
        suppression.focus(block);
        assert_eq!(suppression.grace_until_ms(), None);
        suppression.clear();
        assert!(!suppression.is_editing(1));
    }
}
