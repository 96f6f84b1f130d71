#![forbid(unsafe_code)]

//! Stateful byte-to-[`Event`] decoder for VT/ANSI terminal input.
//!
//! The parser never blocks and never looks ahead: it consumes bytes one at
//! a time, accumulating partial escape sequences in a small bounded
//! buffer. A lone `ESC` cannot be resolved into `key(escape)` until either
//! another byte arrives (continuing a CSI/SS3/Alt sequence) or the
//! escape-timeout elapses with no further input — see [`InputParser::poll_timeout`].
//!
//! # DoS protection
//!
//! CSI parameter bytes and paste bodies are both capped; oversized
//! sequences are discarded rather than grown without bound.

use std::time::{Duration, Instant};

use crate::event::{Event, Key, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// Maximum bytes accumulated for a single CSI parameter sequence before it
/// is discarded.
const MAX_SEQ_LEN: usize = 32;

/// Maximum bytes accumulated for one bracketed-paste body.
const MAX_PASTE_LEN: usize = 1024 * 1024;

/// Default time a lone `ESC` waits for a continuation byte before it is
/// resolved to `key(escape)`.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

const BRACKETED_PASTE_END: &[u8] = b"\x1b[201~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Ground,
    Escape,
    Csi,
    CsiParam,
    CsiIgnore,
    Ss3,
    X10Mouse,
    Paste,
    Utf8 { expected: u8 },
}

/// Decodes a byte stream into [`Event`] values.
#[derive(Debug)]
pub struct InputParser {
    state: ParserState,
    /// Scratch buffer: CSI parameter bytes, or the 3 raw bytes of an X10
    /// mouse report, depending on `state`.
    buffer: Vec<u8>,
    paste_buffer: Vec<u8>,
    paste_match: Vec<u8>,
    utf8_buffer: [u8; 4],
    utf8_len: u8,
    /// A second event produced by the same byte (UTF-8 resync emits an
    /// `unknown` for the aborted sequence and then reprocesses the byte).
    pending_event: Option<Event>,
    last_input: Option<Instant>,
    timeout: Duration,
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_ESCAPE_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: ParserState::Ground,
            buffer: Vec::with_capacity(MAX_SEQ_LEN),
            paste_buffer: Vec::new(),
            paste_match: Vec::new(),
            utf8_buffer: [0; 4],
            utf8_len: 0,
            pending_event: None,
            last_input: None,
            timeout,
        }
    }

    /// Whether a partial sequence is buffered and waiting for more bytes.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state != ParserState::Ground
    }

    /// Feed newly-read bytes through the state machine, returning every
    /// event they completed.
    pub fn parse(&mut self, input: &[u8], now: Instant) -> Vec<Event> {
        if input.is_empty() {
            return Vec::new();
        }
        self.last_input = Some(now);
        let mut events = Vec::new();
        for &byte in input {
            if let Some(event) = self.process_byte(byte) {
                events.push(event);
            }
            if let Some(pending) = self.pending_event.take() {
                events.push(pending);
            }
        }
        events
    }

    /// Called once per loop iteration to resolve a lone `ESC` whose
    /// continuation never arrived. Returns `key(escape)` exactly once per
    /// timed-out sequence.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<Event> {
        if self.state != ParserState::Escape {
            return None;
        }
        let last = self.last_input?;
        if now.duration_since(last) < self.timeout {
            return None;
        }
        self.state = ParserState::Ground;
        self.buffer.clear();
        Some(Event::key(Key::Escape))
    }

    fn process_byte(&mut self, byte: u8) -> Option<Event> {
        match self.state {
            ParserState::Ground => self.process_ground(byte),
            ParserState::Escape => self.process_escape(byte),
            ParserState::Csi => self.process_csi(byte),
            ParserState::CsiParam => self.process_csi_param(byte),
            ParserState::CsiIgnore => self.process_csi_ignore(byte),
            ParserState::Ss3 => self.process_ss3(byte),
            ParserState::X10Mouse => self.process_x10_mouse(byte),
            ParserState::Paste => self.process_paste_byte(byte),
            ParserState::Utf8 { expected } => self.process_utf8_continuation(byte, expected),
        }
    }

    fn process_ground(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x1B => {
                self.state = ParserState::Escape;
                self.buffer.clear();
                None
            }
            0x08 | 0x7F => Some(Event::key(Key::Backspace)),
            0x09 => Some(Event::key(Key::Tab)),
            0x0A | 0x0D => Some(Event::key(Key::Enter)),
            0x00 => Some(Event::key_with_modifiers(Key::Space, Modifiers::CTRL)),
            0x01..=0x1A => {
                let ch = (byte + b'a' - 1) as char;
                Some(Event::key_with_modifiers(Key::Char(ch), Modifiers::CTRL))
            }
            0x00..=0x1F => Some(Event::key(Key::Unknown(byte))),
            0x20..=0x7E => Some(Event::key(Key::Char(byte as char))),
            _ => self.process_utf8_lead(byte),
        }
    }

    fn process_utf8_lead(&mut self, byte: u8) -> Option<Event> {
        let expected = match byte {
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF7 => 3,
            _ => return Some(Event::key(Key::Unknown(byte))),
        };
        self.utf8_buffer = [byte, 0, 0, 0];
        self.utf8_len = 1;
        self.state = ParserState::Utf8 { expected };
        None
    }

    fn process_utf8_continuation(&mut self, byte: u8, expected: u8) -> Option<Event> {
        if byte & 0xC0 != 0x80 {
            let bad = self.utf8_buffer[0];
            self.state = ParserState::Ground;
            self.utf8_len = 0;
            self.pending_event = self.process_byte(byte);
            return Some(Event::key(Key::Unknown(bad)));
        }
        self.utf8_buffer[self.utf8_len as usize] = byte;
        self.utf8_len += 1;
        if self.utf8_len != expected + 1 {
            return None;
        }
        self.state = ParserState::Ground;
        let slice = &self.utf8_buffer[..self.utf8_len as usize];
        let event = match std::str::from_utf8(slice).ok().and_then(|s| s.chars().next()) {
            Some(ch) => Event::key(Key::Char(ch)),
            None => Event::key(Key::Unknown(self.utf8_buffer[0])),
        };
        self.utf8_len = 0;
        Some(event)
    }

    fn process_escape(&mut self, byte: u8) -> Option<Event> {
        match byte {
            b'[' => {
                self.state = ParserState::Csi;
                self.buffer.clear();
                None
            }
            b'O' => {
                self.state = ParserState::Ss3;
                None
            }
            0x1B => {
                self.buffer.clear();
                Some(Event::key(Key::Escape))
            }
            0x20..=0x7E => {
                self.state = ParserState::Ground;
                Some(Event::key_with_modifiers(Key::Char(byte as char), Modifiers::ALT))
            }
            _ => {
                self.state = ParserState::Ground;
                Some(Event::key(Key::Unknown(byte)))
            }
        }
    }

    fn process_csi(&mut self, byte: u8) -> Option<Event> {
        match byte {
            b'M' => {
                self.state = ParserState::X10Mouse;
                self.buffer.clear();
                None
            }
            b'I' => {
                self.state = ParserState::Ground;
                Some(Event::FocusGained)
            }
            b'O' => {
                self.state = ParserState::Ground;
                Some(Event::FocusLost)
            }
            b'A' => self.finish_state(Some(Event::key(Key::Up))),
            b'B' => self.finish_state(Some(Event::key(Key::Down))),
            b'C' => self.finish_state(Some(Event::key(Key::Right))),
            b'D' => self.finish_state(Some(Event::key(Key::Left))),
            b'H' => self.finish_state(Some(Event::key(Key::Home))),
            b'F' => self.finish_state(Some(Event::key(Key::End))),
            _ => {
                self.state = ParserState::CsiParam;
                self.buffer.push(byte);
                None
            }
        }
    }

    fn finish_state(&mut self, event: Option<Event>) -> Option<Event> {
        self.state = ParserState::Ground;
        event
    }

    fn process_csi_param(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x30..=0x3F | b';' | b'<' => {
                if self.buffer.len() >= MAX_SEQ_LEN {
                    self.state = ParserState::CsiIgnore;
                } else {
                    self.buffer.push(byte);
                }
                None
            }
            0x40..=0x7E => {
                self.state = ParserState::Ground;
                let params = std::mem::take(&mut self.buffer);
                self.finish_csi(&params, byte)
            }
            _ => {
                self.state = ParserState::Ground;
                self.buffer.clear();
                None
            }
        }
    }

    fn process_csi_ignore(&mut self, byte: u8) -> Option<Event> {
        if (0x40..=0x7E).contains(&byte) {
            self.state = ParserState::Ground;
        }
        None
    }

    fn finish_csi(&mut self, params: &[u8], final_byte: u8) -> Option<Event> {
        if let Some(rest) = params.strip_prefix(b"<") {
            return Self::finish_sgr_mouse(rest, final_byte);
        }
        match final_byte {
            b'A' => Some(Event::key(Key::Up)),
            b'B' => Some(Event::key(Key::Down)),
            b'C' => Some(Event::key(Key::Right)),
            b'D' => Some(Event::key(Key::Left)),
            b'H' => Some(Event::key(Key::Home)),
            b'F' => Some(Event::key(Key::End)),
            b'~' => {
                if params == b"200" {
                    self.state = ParserState::Paste;
                    self.paste_buffer.clear();
                    self.paste_match.clear();
                    None
                } else {
                    Self::finish_csi_tilde(params)
                }
            }
            _ => None,
        }
    }

    fn finish_csi_tilde(params: &[u8]) -> Option<Event> {
        let digits: Vec<u8> = params.iter().take_while(|b| b.is_ascii_digit()).copied().collect();
        let code: u32 = std::str::from_utf8(&digits).ok()?.parse().ok()?;
        let key = match code {
            1 | 7 => Key::Home,
            2 => Key::Insert,
            3 => Key::Delete,
            4 | 8 => Key::End,
            5 => Key::PageUp,
            6 => Key::PageDown,
            11 => Key::Function(1),
            12 => Key::Function(2),
            13 => Key::Function(3),
            14 => Key::Function(4),
            15 => Key::Function(5),
            17 => Key::Function(6),
            18 => Key::Function(7),
            19 => Key::Function(8),
            20 => Key::Function(9),
            21 => Key::Function(10),
            23 => Key::Function(11),
            24 => Key::Function(12),
            _ => return None,
        };
        Some(Event::key(key))
    }

    fn process_ss3(&mut self, byte: u8) -> Option<Event> {
        self.state = ParserState::Ground;
        match byte {
            b'A' => Some(Event::key(Key::Up)),
            b'B' => Some(Event::key(Key::Down)),
            b'C' => Some(Event::key(Key::Right)),
            b'D' => Some(Event::key(Key::Left)),
            b'H' => Some(Event::key(Key::Home)),
            b'F' => Some(Event::key(Key::End)),
            b'P' => Some(Event::key(Key::Function(1))),
            b'Q' => Some(Event::key(Key::Function(2))),
            b'R' => Some(Event::key(Key::Function(3))),
            b'S' => Some(Event::key(Key::Function(4))),
            _ => None,
        }
    }

    fn process_x10_mouse(&mut self, byte: u8) -> Option<Event> {
        self.buffer.push(byte);
        if self.buffer.len() < 3 {
            return None;
        }
        self.state = ParserState::Ground;
        let bytes = std::mem::take(&mut self.buffer);
        Some(Self::x10_mouse_event(bytes[0], bytes[1], bytes[2]))
    }

    fn process_paste_byte(&mut self, byte: u8) -> Option<Event> {
        self.paste_match.push(byte);
        if BRACKETED_PASTE_END.starts_with(self.paste_match.as_slice()) {
            if self.paste_match.len() == BRACKETED_PASTE_END.len() {
                self.state = ParserState::Ground;
                let content = String::from_utf8_lossy(&self.paste_buffer).into_owned();
                self.paste_buffer.clear();
                self.paste_match.clear();
                return Some(Event::Paste(content));
            }
            return None;
        }
        let mismatched = std::mem::take(&mut self.paste_match);
        let (carry, retry) = mismatched.split_at(mismatched.len() - 1);
        if self.paste_buffer.len() + carry.len() < MAX_PASTE_LEN {
            self.paste_buffer.extend_from_slice(carry);
        }
        let retried = retry[0];
        if retried == BRACKETED_PASTE_END[0] {
            self.paste_match.push(retried);
        } else if self.paste_buffer.len() < MAX_PASTE_LEN {
            self.paste_buffer.push(retried);
        }
        None
    }

    fn mouse_modifiers(cb: u8) -> Modifiers {
        let mut m = Modifiers::empty();
        if cb & 0x04 != 0 {
            m |= Modifiers::SHIFT;
        }
        if cb & 0x08 != 0 {
            m |= Modifiers::ALT;
        }
        if cb & 0x10 != 0 {
            m |= Modifiers::CTRL;
        }
        m
    }

    fn mouse_event_for(cb: u8, x: u16, y: u16, is_release: bool) -> Event {
        let modifiers = Self::mouse_modifiers(cb);
        if cb & 0x40 != 0 {
            let kind = if cb & 0x01 == 0 {
                MouseEventKind::ScrollUp
            } else {
                MouseEventKind::ScrollDown
            };
            return Event::Mouse(MouseEvent { kind, x, y, button: MouseButton::None, modifiers });
        }
        let button = match cb & 0x03 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        };
        let kind = if cb & 0x20 != 0 {
            MouseEventKind::Drag
        } else if is_release {
            MouseEventKind::Release
        } else {
            MouseEventKind::Press
        };
        Event::Mouse(MouseEvent { kind, x, y, button, modifiers })
    }

    fn finish_sgr_mouse(params: &[u8], final_byte: u8) -> Option<Event> {
        let text = std::str::from_utf8(params).ok()?;
        let mut parts = text.split(';');
        let cb: u8 = parts.next()?.parse().ok()?;
        let cx: u16 = parts.next()?.parse().ok()?;
        let cy: u16 = parts.next()?.parse().ok()?;
        let x = cx.saturating_sub(1);
        let y = cy.saturating_sub(1);
        let is_release = final_byte == b'm';
        Some(Self::mouse_event_for(cb, x, y, is_release))
    }

    fn x10_mouse_event(cb: u8, cx: u8, cy: u8) -> Event {
        let cb = cb.wrapping_sub(32);
        let x = u16::from(cx.wrapping_sub(33));
        let y = u16::from(cy.wrapping_sub(33));
        let modifiers = Self::mouse_modifiers(cb);
        if cb & 0x40 != 0 {
            let kind = if cb & 0x01 == 0 {
                MouseEventKind::ScrollUp
            } else {
                MouseEventKind::ScrollDown
            };
            return Event::Mouse(MouseEvent { kind, x, y, button: MouseButton::None, modifiers });
        }
        let button = match cb & 0x03 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        };
        let kind = if cb & 0x03 == 3 { MouseEventKind::Release } else { MouseEventKind::Press };
        Event::Mouse(MouseEvent { kind, x, y, button, modifiers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_now(parser: &mut InputParser, input: &[u8]) -> Vec<Event> {
        parser.parse(input, Instant::now())
    }

    #[test]
    fn arrow_key_up() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, b"\x1b[A");
        assert_eq!(events, vec![Event::key(Key::Up)]);
    }

    #[test]
    fn ctrl_c_yields_ctrl_char_c() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, &[0x03]);
        assert_eq!(events, vec![Event::key_with_modifiers(Key::Char('c'), Modifiers::CTRL)]);
    }

    #[test]
    fn lone_escape_is_pending_until_timeout() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, &[0x1B]);
        assert!(events.is_empty());
        assert!(p.is_pending());

        let not_yet = p.poll_timeout(Instant::now());
        assert_eq!(not_yet, None);

        let later = Instant::now() + DEFAULT_ESCAPE_TIMEOUT + Duration::from_millis(1);
        let timed_out = p.poll_timeout(later);
        assert_eq!(timed_out, Some(Event::key(Key::Escape)));
        assert!(!p.is_pending());
    }

    #[test]
    fn sgr_mouse_scroll_up_at_origin() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, b"\x1b[<64;1;1M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollUp,
                x: 0,
                y: 0,
                button: MouseButton::None,
                modifiers: Modifiers::empty(),
            })]
        );
    }

    #[test]
    fn x10_mouse_press_decodes_button_and_coords() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, &[0x1B, b'[', b'M', 32, 33, 33]);
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Press,
                x: 0,
                y: 0,
                button: MouseButton::Left,
                modifiers: Modifiers::empty(),
            })]
        );
    }

    #[test]
    fn focus_events_are_bare_csi_letters() {
        let mut p = InputParser::new();
        assert_eq!(parse_now(&mut p, b"\x1b[I"), vec![Event::FocusGained]);
        assert_eq!(parse_now(&mut p, b"\x1b[O"), vec![Event::FocusLost]);
    }

    #[test]
    fn bracketed_paste_collects_body_verbatim() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, b"\x1b[200~hello, world~\x1b[201~");
        assert_eq!(events, vec![Event::Paste("hello, world~".to_string())]);
    }

    #[test]
    fn csi_tilde_function_keys_skip_gaps() {
        let mut p = InputParser::new();
        assert_eq!(parse_now(&mut p, b"\x1b[15~"), vec![Event::key(Key::Function(5))]);
        assert_eq!(parse_now(&mut p, b"\x1b[17~"), vec![Event::key(Key::Function(6))]);
    }

    #[test]
    fn utf8_multibyte_decodes_to_one_char() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, "é".as_bytes());
        assert_eq!(events, vec![Event::key(Key::Char('é'))]);
    }

    #[test]
    fn unrecognized_csi_sequence_is_discarded() {
        let mut p = InputParser::new();
        let events = parse_now(&mut p, b"\x1b[999z");
        assert!(events.is_empty());
        assert!(!p.is_pending());
    }
}
