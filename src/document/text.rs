/*!
 * Character-offset helpers.
 *
 * Cell positions are counted in Unicode scalar values so that a split offset
 * means the same thing for Latin and Thai text alike.
 */

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` after `pos` characters. Positions past the end clamp to the end.
pub fn split_at_char(text: &str, pos: usize) -> (&str, &str) {
    let byte_index = text
        .char_indices()
        .nth(pos)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    text.split_at(byte_index)
}
