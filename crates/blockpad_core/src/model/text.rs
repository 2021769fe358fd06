//! Char-offset helpers for plain block text.
//!
//! Cursor offsets reported by the input layer count characters, not bytes.
//! Every helper clamps out-of-range offsets to the end of the text.

/// Returns text length in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Converts a char offset into a byte index, clamped to `text.len()`.
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}

/// Splits text at a char offset.
pub fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(byte_index(text, offset))
}

/// Inserts `insert` at a char offset and returns the new text.
pub fn insert_at_char(text: &str, offset: usize, insert: &str) -> String {
    let (before, after) = split_at_char(text, offset);
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(before);
    out.push_str(insert);
    out.push_str(after);
    out
}

#[cfg(test)]
mod tests {
    use super::{char_len, insert_at_char, split_at_char};

    #[test]
    fn split_counts_chars_not_bytes() {
        let (before, after) = split_at_char("héllo", 2);
        assert_eq!(before, "hé");
        assert_eq!(after, "llo");
    }

    #[test]
    fn out_of_range_offset_clamps_to_end() {
        assert_eq!(split_at_char("abc", 10), ("abc", ""));
        assert_eq!(insert_at_char("abc", 99, "!"), "abc!");
        assert_eq!(char_len("日本"), 2);
    }
}
