#![forbid(unsafe_code)]

//! A single addressable screen position.

use loomterm_style::Style;

/// One terminal cell: the grapheme cluster occupying it, that cluster's
/// display width, and the style it is drawn with.
///
/// A wide (2-column) glyph occupies two adjacent cells: the first carries
/// the grapheme and `width == 2`, the second is a continuation cell with
/// an empty grapheme and `width == 0`. Column addressing always targets
/// the first cell of a cluster; the differ treats the continuation cell
/// as implicitly updated whenever the leading cell changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    grapheme: String,
    width: u8,
    pub style: Style,
}

impl Cell {
    /// A single space, default style, width 1.
    #[must_use]
    pub fn blank() -> Self {
        Self { grapheme: " ".to_string(), width: 1, style: Style::DEFAULT }
    }

    /// A wide-char continuation slot: no visible content, width 0.
    #[must_use]
    pub fn continuation(style: Style) -> Self {
        Self { grapheme: String::new(), width: 0, style }
    }

    #[must_use]
    pub fn new(grapheme: impl Into<String>, width: u8, style: Style) -> Self {
        Self { grapheme: grapheme.into(), width, style }
    }

    #[must_use]
    pub fn grapheme(&self) -> &str {
        &self.grapheme
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Append a zero-width combining mark to this cell's grapheme bytes
    /// without advancing the cursor.
    pub fn append_combining(&mut self, mark: char) {
        self.grapheme.push(mark);
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cell_is_a_single_space() {
        let c = Cell::blank();
        assert_eq!(c.grapheme(), " ");
        assert_eq!(c.width(), 1);
        assert_eq!(c.style, Style::DEFAULT);
    }

    #[test]
    fn continuation_cell_has_zero_width() {
        let c = Cell::continuation(Style::DEFAULT);
        assert!(c.is_continuation());
        assert_eq!(c.grapheme(), "");
    }

    #[test]
    fn append_combining_extends_grapheme_without_width_change() {
        let mut c = Cell::new("e", 1, Style::DEFAULT);
        c.append_combining('\u{0301}');
        assert_eq!(c.grapheme(), "e\u{0301}");
        assert_eq!(c.width(), 1);
    }
}
