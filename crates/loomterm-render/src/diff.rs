#![forbid(unsafe_code)]

//! Row-major minimal-diff algorithm: compares two [`Screen`]s cell by cell
//! and emits only the bytes needed to turn one into the other.

use loomterm_style::{ColorProfile, Style};

use crate::ansi;
use crate::screen::Screen;

/// Diff `back` against `front` and append the resulting VT bytes to `out`.
///
/// `last_style`/`last_cursor` track what has actually been emitted so far
/// (across calls, not just within one diff) so the caller can avoid
/// redundant moves/SGR at the start of the next frame. Returns the updated
/// tracker values.
pub fn diff_screens(
    back: &Screen,
    front: &Screen,
    out: &mut Vec<u8>,
    mut last_style: Style,
    mut last_cursor: Option<(u16, u16)>,
    profile: ColorProfile,
) -> (Style, Option<(u16, u16)>) {
    let width = back.width();
    let height = back.height();
    debug_assert_eq!(width, front.width());
    debug_assert_eq!(height, front.height());

    for y in 0..height {
        let mut x = 0u16;
        while x < width {
            let b = back.get(x, y).expect("in bounds");
            let f = front.get(x, y).expect("in bounds");
            if b == f {
                x += 1;
                continue;
            }
            if b.is_continuation() {
                // Implicitly updated by the wide cell to its left; never
                // emitted on its own.
                x += 1;
                continue;
            }
            if last_cursor != Some((x, y)) {
                ansi::cup(out, y, x).expect("write to Vec never fails");
                last_cursor = Some((x, y));
            }
            if b.style != last_style {
                ansi::emit_style_transition(out, last_style, b.style, profile)
                    .expect("write to Vec never fails");
                last_style = b.style;
            }
            out.extend_from_slice(b.grapheme().as_bytes());
            let advanced = x.saturating_add(u16::from(b.width()).max(1));
            last_cursor = Some((advanced, y));
            x += 1;
        }
    }

    (last_style, last_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomterm_style::Color;

    #[test]
    fn identical_screens_emit_nothing() {
        let a = Screen::create(4, 2);
        let b = Screen::create(4, 2);
        let mut out = Vec::new();
        let (_, cursor) = diff_screens(&a, &b, &mut out, Style::DEFAULT, None, ColorProfile::TrueColor);
        assert!(out.is_empty());
        assert_eq!(cursor, None);
    }

    #[test]
    fn single_changed_cell_emits_move_and_glyph() {
        let mut back = Screen::create(4, 2);
        back.put_char("X");
        let front = Screen::create(4, 2);
        let mut out = Vec::new();
        diff_screens(&back, &front, &mut out, Style::DEFAULT, None, ColorProfile::TrueColor);
        assert_eq!(out, b"\x1b[1;1HX");
    }

    #[test]
    fn style_change_emits_sgr_before_glyph() {
        let mut back = Screen::create(4, 2);
        back.set_style(Style::DEFAULT.fg(Color::RED));
        back.put_char("X");
        let front = Screen::create(4, 2);
        let mut out = Vec::new();
        diff_screens(&back, &front, &mut out, Style::DEFAULT, None, ColorProfile::TrueColor);
        assert_eq!(out, b"\x1b[1;1H\x1b[31mX");
    }

    #[test]
    fn wide_cell_continuation_not_reemitted() {
        let mut back = Screen::create(4, 1);
        back.put_char("中");
        let front = Screen::create(4, 1);
        let mut out = Vec::new();
        diff_screens(&back, &front, &mut out, Style::DEFAULT, None, ColorProfile::TrueColor);
        // Only one move + one glyph: the continuation column is skipped.
        assert_eq!(out, "\x1b[1;1H中".as_bytes());
    }

    #[test]
    fn cursor_tracker_avoids_redundant_move_for_adjacent_writes() {
        let mut back = Screen::create(4, 1);
        back.put_char("A");
        back.put_char("B");
        let front = Screen::create(4, 1);
        let mut out = Vec::new();
        diff_screens(&back, &front, &mut out, Style::DEFAULT, None, ColorProfile::TrueColor);
        assert_eq!(out, b"\x1b[1;1HAB");
    }
}
