//! Text helpers shared by both analysis paths.
//!
//! Lengths are counted in Unicode scalar values (`char`s), never bytes, so a
//! cut can't land inside a multi-byte character such as `ó` or `ñ`.

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// "Plazo:\n\t12   meses " → "Plazo: 12 meses"
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return the first `max_chars` characters of `text`, or `None` when the text
/// already fits.
pub fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(byte_idx, _)| &text[..byte_idx])
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
