#![forbid(unsafe_code)]

//! The drawing surface handed to a widget's `render` method: a sub-screen
//! bounded to its allocated rectangle plus a resolved style stack.

use loomterm_core::geometry::Rect;
use loomterm_render::cell::Cell;
use loomterm_render::screen::Screen;
use loomterm_render::text_width::{display_width, graphemes};
use loomterm_style::Style;

/// A clipped view into the renderer's back buffer plus a style stack a
/// widget can push/pop while descending into children.
pub struct RenderContext<'a> {
    screen: &'a mut Screen,
    rect: Rect,
    styles: Vec<Style>,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn new(screen: &'a mut Screen, rect: Rect) -> Self {
        Self { screen, rect, styles: vec![Style::DEFAULT] }
    }

    /// The rectangle this context is clipped to, in screen coordinates.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    pub fn push_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    pub fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    #[must_use]
    pub fn current_style(&self) -> Style {
        *self.styles.last().unwrap_or(&Style::DEFAULT)
    }

    /// Write `text` starting at `(x, y)` relative to this context's
    /// rectangle, using the current style. Clips at both the rectangle's
    /// and the screen's edges; never wraps.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str) {
        if y >= self.rect.height {
            return;
        }
        let abs_y = self.rect.y.saturating_add(y);
        if abs_y >= self.screen.height() {
            return;
        }
        self.screen.set_style(self.current_style());
        let mut cx = x;
        for g in graphemes(text) {
            if cx >= self.rect.width {
                break;
            }
            let abs_x = self.rect.x.saturating_add(cx);
            if abs_x >= self.screen.width() {
                break;
            }
            self.screen.move_cursor(abs_x, abs_y);
            self.screen.put_char(g);
            cx += display_width(g) as u16;
        }
    }

    /// Fill this context's whole rectangle (clipped to the screen) with
    /// `cell`.
    pub fn fill(&mut self, cell: &Cell) {
        self.screen.fill_rect(self.rect, cell);
    }

    /// Borrow the sub-rectangle of a child, translating its coordinates
    /// into screen space.
    #[must_use]
    pub fn child(&mut self, relative: Rect) -> RenderContext<'_> {
        let abs = Rect::new(
            self.rect.x.saturating_add(relative.x),
            self.rect.y.saturating_add(relative.y),
            relative.width,
            relative.height,
        );
        let clipped = abs.intersection(&self.rect);
        let mut ctx = RenderContext::new(self.screen, clipped);
        ctx.styles = self.styles.clone();
        ctx
    }
}
