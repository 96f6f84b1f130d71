#![forbid(unsafe_code)]

//! Pure byte-generation helpers for the VT/ANSI sequences the differ emits.
//!
//! No state is tracked here; callers (the [`crate::renderer::Renderer`])
//! decide when a sequence is needed and these functions just write it.

use std::io::{self, Write};

use loomterm_style::{Attrs, Color, ColorProfile, Style};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// CUP (Cursor Position): `CSI row ; col H`, 1-indexed. `row`/`col` are
/// given 0-indexed.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", row + 1, col + 1)
}

pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
pub const ALT_SCREEN_LEAVE: &[u8] = b"\x1b[?1049l";
pub const MOUSE_ENABLE: &[u8] = b"\x1b[?1000;1002;1003;1006h";
pub const MOUSE_DISABLE: &[u8] = b"\x1b[?1000;1002;1003;1006l";
pub const BRACKETED_PASTE_ENABLE: &[u8] = b"\x1b[?2004h";
pub const BRACKETED_PASTE_DISABLE: &[u8] = b"\x1b[?2004l";
pub const FOCUS_ENABLE: &[u8] = b"\x1b[?1004h";
pub const FOCUS_DISABLE: &[u8] = b"\x1b[?1004l";
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

struct SgrCodes {
    on: u8,
    off: u8,
}

const SGR_BOLD: SgrCodes = SgrCodes { on: 1, off: 22 };
const SGR_DIM: SgrCodes = SgrCodes { on: 2, off: 22 };
const SGR_ITALIC: SgrCodes = SgrCodes { on: 3, off: 23 };
const SGR_UNDERLINE: SgrCodes = SgrCodes { on: 4, off: 24 };
const SGR_BLINK: SgrCodes = SgrCodes { on: 5, off: 25 };
const SGR_REVERSE: SgrCodes = SgrCodes { on: 7, off: 27 };
const SGR_HIDDEN: SgrCodes = SgrCodes { on: 8, off: 28 };
const SGR_STRIKETHROUGH: SgrCodes = SgrCodes { on: 9, off: 29 };

const ATTR_CODES: [(Attrs, SgrCodes); 8] = [
    (Attrs::BOLD, SGR_BOLD),
    (Attrs::DIM, SGR_DIM),
    (Attrs::ITALIC, SGR_ITALIC),
    (Attrs::UNDERLINE, SGR_UNDERLINE),
    (Attrs::BLINK, SGR_BLINK),
    (Attrs::REVERSE, SGR_REVERSE),
    (Attrs::HIDDEN, SGR_HIDDEN),
    (Attrs::STRIKETHROUGH, SGR_STRIKETHROUGH),
];

fn sgr_fg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "38;2;{r};{g};{b}")
}

fn sgr_bg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "48;2;{r};{g};{b}")
}

fn sgr_fg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "38;5;{index}")
}

fn sgr_bg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "48;5;{index}")
}

fn sgr_fg_16<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    let code = if index < 8 { 30 + index } else { 90 + index - 8 };
    write!(w, "{code}")
}

fn sgr_bg_16<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    let code = if index < 8 { 40 + index } else { 100 + index - 8 };
    write!(w, "{code}")
}

fn write_fg_code<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Default => write!(w, "39"),
        Color::Ansi16(n) => sgr_fg_16(w, n),
        Color::Indexed(n) => sgr_fg_256(w, n),
        Color::Rgb(r, g, b) => sgr_fg_rgb(w, r, g, b),
    }
}

fn write_bg_code<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Default => write!(w, "49"),
        Color::Ansi16(n) => sgr_bg_16(w, n),
        Color::Indexed(n) => sgr_bg_256(w, n),
        Color::Rgb(r, g, b) => sgr_bg_rgb(w, r, g, b),
    }
}

/// Emit the minimal SGR sequence transitioning from `from` to `to` under
/// `profile`. Uses a full reset (`CSI 0 m`) when an attribute needs to be
/// turned off, since individual "off" codes rarely beat a reset plus the
/// still-needed "on" codes for a style change of any size.
pub fn emit_style_transition<W: Write>(
    w: &mut W,
    from: Style,
    to: Style,
    profile: ColorProfile,
) -> io::Result<()> {
    let to_fg = to.fg.downgrade(profile);
    let to_bg = to.bg.downgrade(profile);
    let from_fg = from.fg.downgrade(profile);
    let from_bg = from.bg.downgrade(profile);

    let turning_off = from.attrs.difference(to.attrs).is_empty().then_some(false).unwrap_or(true);
    let needs_reset = turning_off;

    let mut codes: Vec<Vec<u8>> = Vec::new();
    if needs_reset {
        codes.push(b"0".to_vec());
        for (flag, sgr) in ATTR_CODES {
            if to.attrs.contains(flag) {
                codes.push(sgr.on.to_string().into_bytes());
            }
        }
        if to_fg != Color::Default {
            let mut buf = Vec::new();
            write_fg_code(&mut buf, to_fg)?;
            codes.push(buf);
        }
        if to_bg != Color::Default {
            let mut buf = Vec::new();
            write_bg_code(&mut buf, to_bg)?;
            codes.push(buf);
        }
    } else {
        for (flag, sgr) in ATTR_CODES {
            if to.attrs.contains(flag) && !from.attrs.contains(flag) {
                codes.push(sgr.on.to_string().into_bytes());
            }
        }
        if to_fg != from_fg {
            let mut buf = Vec::new();
            write_fg_code(&mut buf, to_fg)?;
            codes.push(buf);
        }
        if to_bg != from_bg {
            let mut buf = Vec::new();
            write_bg_code(&mut buf, to_bg)?;
            codes.push(buf);
        }
    }

    if codes.is_empty() {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            w.write_all(b";")?;
        }
        w.write_all(code)?;
    }
    w.write_all(b"m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cup_converts_to_1_indexed() {
        let mut buf = Vec::new();
        cup(&mut buf, 2, 5).unwrap();
        assert_eq!(buf, b"\x1b[3;6H");
    }

    #[test]
    fn style_transition_from_default_emits_bold_and_truecolor_fg() {
        let mut buf = Vec::new();
        let to = Style::DEFAULT.fg(Color::rgb(255, 0, 0)).bold();
        emit_style_transition(&mut buf, Style::DEFAULT, to, ColorProfile::TrueColor).unwrap();
        assert_eq!(buf, b"\x1b[1;38;2;255;0;0m");
    }

    #[test]
    fn no_change_emits_nothing() {
        let mut buf = Vec::new();
        let s = Style::DEFAULT.fg(Color::GREEN);
        emit_style_transition(&mut buf, s, s, ColorProfile::TrueColor).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn turning_off_an_attribute_uses_full_reset() {
        let mut buf = Vec::new();
        let from = Style::DEFAULT.bold();
        let to = Style::DEFAULT;
        emit_style_transition(&mut buf, from, to, ColorProfile::TrueColor).unwrap();
        assert_eq!(buf, b"\x1b[0m");
    }
}
