//! Character-offset slicing helpers.
//!
//! Annotation spans are character offsets, not byte offsets, so that
//! multibyte text can never split a code point. These helpers convert
//! between the two without panicking on out-of-range input.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by character offsets `[start, end)`.
///
/// Returns `None` when the range is inverted or extends past the end of
/// the text, so callers can treat stale offsets as a validation failure
/// rather than a panic.
pub fn slice_chars(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_of = |char_idx: usize| -> Option<usize> {
        if char_idx == 0 {
            return Some(0);
        }
        let mut count = 0;
        for (byte, _) in text.char_indices() {
            if count == char_idx {
                return Some(byte);
            }
            count += 1;
        }
        count += 1;
        if count == char_idx + 1 {
            Some(text.len())
        } else {
            None
        }
    };
    let byte_start = byte_of(start)?;
    let byte_end = byte_of(end)?;
    Some(&text[byte_start..byte_end])
}
