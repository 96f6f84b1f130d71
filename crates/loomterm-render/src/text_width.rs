#![forbid(unsafe_code)]

//! Display-width and grapheme-cluster classification for [`crate::cell::Cell`].

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Fast path: a string made only of printable ASCII has width equal to its
/// byte length, one grapheme per byte.
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

/// Whether `c` occupies no column of its own: combining marks, variation
/// selectors, zero-width joiners/spaces, and bidi control characters.
#[must_use]
pub fn is_zero_width_codepoint(c: char) -> bool {
    if c.is_control() {
        return true;
    }
    matches!(
        c as u32,
        0x0300..=0x036F
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x20D0..=0x20FF
            | 0xFE00..=0xFE0F
            | 0x200B..=0x200D
            | 0x202A..=0x202E
            | 0x2066..=0x2069
            | 0xE0100..=0xE01EF
    )
}

/// Whether `c` falls in a range commonly rendered as a double-width emoji
/// glyph by modern terminals.
#[must_use]
pub fn is_probable_emoji(c: char) -> bool {
    let cp = c as u32;
    matches!(cp, 0x1F000..=0x1FAFF | 0x2300..=0x23FF | 0x2600..=0x27BF | 0x2B00..=0x2BFF)
        && cp != 0x2764
}

/// The display width of one extended grapheme cluster.
///
/// ASCII fast path first; otherwise sums per-codepoint widths via
/// [`unicode_width`], clamping emoji presentation to 2 columns.
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if let Some(w) = ascii_width(grapheme) {
        return w;
    }
    if grapheme.chars().all(is_zero_width_codepoint) {
        return 0;
    }
    if grapheme.chars().any(is_probable_emoji) {
        return 2;
    }
    grapheme.chars().map(char_width).sum()
}

/// The display width of a single codepoint, outside of grapheme-cluster
/// context (used while appending combining marks one at a time).
#[must_use]
pub fn char_width(ch: char) -> usize {
    if is_zero_width_codepoint(ch) {
        return 0;
    }
    if is_probable_emoji(ch) {
        return 2;
    }
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Split `text` into extended grapheme clusters.
#[must_use]
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// The total display width of `text`, summing each grapheme's width.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if let Some(w) = ascii_width(text) {
        return w;
    }
    graphemes(text).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_matches_byte_length() {
        assert_eq!(ascii_width("hello"), Some(5));
        assert_eq!(ascii_width("héllo"), None);
    }

    #[test]
    fn combining_mark_is_zero_width() {
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(grapheme_width("e\u{0301}"), 1);
    }

    #[test]
    fn cjk_characters_are_double_width() {
        assert_eq!(char_width('中'), 2);
        assert_eq!(display_width("中文"), 4);
    }

    #[test]
    fn emoji_is_double_width() {
        assert_eq!(grapheme_width("🎉"), 2);
    }

    #[test]
    fn display_width_sums_graphemes() {
        assert_eq!(display_width("hi 中"), 4);
    }
}
