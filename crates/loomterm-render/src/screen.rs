#![forbid(unsafe_code)]

//! The fixed-size cell grid widgets draw into.
//!
//! Cells are stored row-major: `index = y * width + x`. [`Screen`] tracks a
//! cursor and a "current style" that subsequent writes use, mirroring how a
//! real terminal behaves under raw-mode output.

use loomterm_style::Style;

use crate::cell::Cell;
use crate::text_width::{display_width, graphemes, is_zero_width_codepoint};
use loomterm_core::geometry::Rect;

/// A width x height grid of [`Cell`]s with a cursor and current style.
#[derive(Debug, Clone)]
pub struct Screen {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor_x: u16,
    cursor_y: u16,
    /// Set when the cursor sits one column past the last column, pending a
    /// wrap that this framework never performs (writes clip instead).
    pending_wrap: bool,
    style: Style,
}

impl Screen {
    /// Allocate a `width * height` grid of blanks. Zero dimensions are
    /// clamped to 1x1 per the resize-invalid error rule.
    #[must_use]
    pub fn create(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::blank(); width as usize * height as usize],
            cursor_x: 0,
            cursor_y: 0,
            pending_wrap: false,
            style: Style::DEFAULT,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub const fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Reallocate to `(w, h)`, copying the overlapping region and clamping
    /// the cursor into bounds. Newly exposed cells are blanks.
    pub fn resize(&mut self, w: u16, h: u16) {
        let w = w.max(1);
        let h = h.max(1);
        let mut cells = vec![Cell::blank(); w as usize * h as usize];
        let copy_w = self.width.min(w);
        let copy_h = self.height.min(h);
        for y in 0..copy_h {
            let src_start = y as usize * self.width as usize;
            let dst_start = y as usize * w as usize;
            for x in 0..copy_w {
                cells[dst_start + x as usize] = self.cells[src_start + x as usize].clone();
            }
        }
        self.cells = cells;
        self.width = w;
        self.height = h;
        self.cursor_x = self.cursor_x.min(w.saturating_sub(1));
        self.cursor_y = self.cursor_y.min(h.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Fill every cell with a blank using the current style.
    pub fn clear(&mut self) {
        let blank = Cell::new(" ", 1, self.style);
        self.cells.fill(blank);
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.pending_wrap = false;
    }

    /// Move the cursor, clamped to bounds. `x == width` is allowed and
    /// marks a pending wrap (this framework clips instead of wrapping, so
    /// the next write simply clips).
    pub fn move_cursor(&mut self, x: u16, y: u16) {
        self.cursor_y = y.min(self.height.saturating_sub(1));
        if x >= self.width {
            self.cursor_x = self.width.saturating_sub(1);
            self.pending_wrap = true;
        } else {
            self.cursor_x = x;
            self.pending_wrap = false;
        }
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Bounds-checked read.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(&self.cells[self.index(x, y)])
    }

    /// Write one grapheme cluster at the cursor using the current style,
    /// advancing by its display width. Clips (does not wrap) a glyph that
    /// would cross the right edge; a wide glyph that fits skips its
    /// continuation cell. A zero-width combining mark attaches to the
    /// previous cluster instead of occupying a new cell.
    pub fn put_char(&mut self, grapheme: &str) {
        if self.pending_wrap {
            return;
        }
        let width = display_width(grapheme);
        if width == 0 {
            if let Some(mark) = grapheme.chars().next() {
                self.attach_combining(mark);
            }
            return;
        }
        if self.cursor_x as usize + width > self.width as usize {
            // Clip: the glyph does not fit, leave the cell blank and stop
            // advancing past the edge.
            self.pending_wrap = true;
            return;
        }
        let idx = self.index(self.cursor_x, self.cursor_y);
        self.cells[idx] = Cell::new(grapheme, width as u8, self.style);
        if width == 2 {
            let cont_idx = self.index(self.cursor_x + 1, self.cursor_y);
            self.cells[cont_idx] = Cell::continuation(self.style);
        }
        self.cursor_x += width as u16;
        if self.cursor_x >= self.width {
            self.pending_wrap = true;
        }
    }

    fn attach_combining(&mut self, mark: char) {
        if self.cursor_x == 0 {
            // No previous cluster on an otherwise-empty row: discard.
            return;
        }
        let idx = self.index(self.cursor_x - 1, self.cursor_y);
        self.cells[idx].append_combining(mark);
    }

    /// Decode `bytes` as UTF-8 and write each grapheme cluster via
    /// [`Screen::put_char`]. Control bytes below `0x20` are skipped.
    pub fn put_string(&mut self, bytes: &str) {
        for g in graphemes(bytes) {
            if g.chars().all(|c| (c as u32) < 0x20 && !is_zero_width_codepoint(c)) {
                continue;
            }
            self.put_char(g);
        }
    }

    /// Bulk-fill a rectangle (clipped to the screen) with `cell`.
    pub fn fill_rect(&mut self, rect: Rect, cell: &Cell) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let idx = self.index(x, y);
                self.cells[idx] = cell.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_cells_and_cursor() {
        let mut s = Screen::create(4, 2);
        s.move_cursor(2, 1);
        s.put_char("x");
        s.clear();
        assert_eq!(s.cursor(), (0, 0));
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(s.get(x, y).unwrap().grapheme(), " ");
            }
        }
    }

    #[test]
    fn put_char_advances_by_width() {
        let mut s = Screen::create(10, 1);
        s.put_char("中");
        assert_eq!(s.cursor(), (2, 0));
        assert_eq!(s.get(0, 0).unwrap().width(), 2);
        assert!(s.get(1, 0).unwrap().is_continuation());
    }

    #[test]
    fn wide_char_at_right_edge_clips_instead_of_wrapping() {
        let mut s = Screen::create(3, 1);
        s.move_cursor(2, 0);
        s.put_char("中");
        assert_eq!(s.get(2, 0).unwrap().grapheme(), " ");
    }

    #[test]
    fn combining_mark_with_no_prior_cluster_is_discarded() {
        let mut s = Screen::create(4, 1);
        s.put_char("\u{0301}");
        assert_eq!(s.get(0, 0).unwrap().grapheme(), " ");
    }

    #[test]
    fn resize_preserves_overlap_and_clamps_cursor() {
        let mut s = Screen::create(4, 4);
        s.move_cursor(1, 1);
        s.put_char("A");
        s.move_cursor(3, 3);
        s.resize(2, 2);
        assert_eq!(s.width(), 2);
        assert_eq!(s.height(), 2);
        assert_eq!(s.get(1, 1).unwrap().grapheme(), "A");
        assert_eq!(s.cursor(), (1, 1));
    }

    #[test]
    fn put_string_skips_control_bytes() {
        let mut s = Screen::create(10, 1);
        s.put_string("a\u{7}b");
        assert_eq!(s.get(0, 0).unwrap().grapheme(), "a");
        assert_eq!(s.get(1, 0).unwrap().grapheme(), "b");
    }
}
