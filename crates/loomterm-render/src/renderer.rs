#![forbid(unsafe_code)]

//! Owns the back/front [`Screen`] pair and drives the differ each frame.

use std::io::{self, Write};

use loomterm_style::{ColorProfile, Style};

use crate::diff::diff_screens;
use crate::screen::Screen;

/// Double-buffered renderer: widgets draw into [`Renderer::back`], and
/// [`Renderer::flush`] computes the minimal diff against what was last
/// drawn and writes only that to `sink`.
pub struct Renderer {
    back: Screen,
    front: Screen,
    profile: ColorProfile,
    last_style: Style,
    last_cursor: Option<(u16, u16)>,
    dirty: bool,
}

impl Renderer {
    #[must_use]
    pub fn new(width: u16, height: u16, profile: ColorProfile) -> Self {
        Self {
            back: Screen::create(width, height),
            front: Screen::create(width, height),
            profile,
            last_style: Style::DEFAULT,
            last_cursor: None,
            dirty: false,
        }
    }

    /// Clear the back buffer to blanks with default style for a new frame.
    pub fn begin_frame(&mut self) {
        self.back.clear();
        self.dirty = false;
    }

    #[must_use]
    pub fn back(&mut self) -> &mut Screen {
        self.dirty = true;
        &mut self.back
    }

    #[must_use]
    pub const fn color_profile(&self) -> ColorProfile {
        self.profile
    }

    /// Resize both buffers, dropping any pending diff state: a resize is
    /// always followed by a full redraw since the terminal itself cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.back.resize(width, height);
        self.front.resize(width, height);
        self.last_cursor = None;
    }

    /// Compute the diff between the back and front buffers, write it to
    /// `sink`, and swap buffers. Emits zero bytes when nothing changed.
    /// Returns the number of bytes written so callers can observe it.
    pub fn flush<W: Write>(&mut self, sink: &mut W) -> io::Result<usize> {
        let mut out = Vec::new();
        let (style, cursor) = diff_screens(
            &self.back,
            &self.front,
            &mut out,
            self.last_style,
            self.last_cursor,
            self.profile,
        );
        self.last_style = style;
        self.last_cursor = cursor;
        if !out.is_empty() {
            sink.write_all(&out)?;
            sink.flush()?;
        }
        std::mem::swap(&mut self.back, &mut self.front);
        #[cfg(feature = "tracing")]
        tracing::trace!(bytes = out.len(), "frame flushed");
        Ok(out.len())
    }
}
