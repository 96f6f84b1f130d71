//! Cell style: foreground, background, and attribute flags.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// SGR text attribute flags.
    ///
    /// Maps directly to the ECMA-48 / VT100 SGR parameter values the
    /// differ emits in [`loomterm_render::ansi`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const REVERSE       = 1 << 5;
        const HIDDEN        = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// A cell's full visual style: colors plus attribute flags.
///
/// Two styles compare structurally (`#[derive(PartialEq)]`); that equality
/// is exactly what the differ uses to decide whether an SGR sequence needs
/// to be emitted when moving from one cell to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    /// The default style: default colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attrs::empty(),
    };

    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    #[must_use]
    pub const fn with(mut self, attr: Attrs) -> Self {
        self.attrs = self.attrs.union(attr);
        self
    }

    #[must_use]
    pub const fn bold(self) -> Self {
        self.with(Attrs::BOLD)
    }

    #[must_use]
    pub const fn underline(self) -> Self {
        self.with(Attrs::UNDERLINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_has_no_attrs() {
        assert_eq!(Style::DEFAULT.attrs, Attrs::empty());
        assert_eq!(Style::DEFAULT.fg, Color::Default);
    }

    #[test]
    fn builder_methods_compose() {
        let s = Style::DEFAULT.fg(Color::RED).bold().underline();
        assert_eq!(s.fg, Color::RED);
        assert!(s.attrs.contains(Attrs::BOLD));
        assert!(s.attrs.contains(Attrs::UNDERLINE));
    }

    #[test]
    fn equality_is_structural() {
        let a = Style::DEFAULT.fg(Color::GREEN);
        let b = Style::DEFAULT.fg(Color::GREEN);
        let c = Style::DEFAULT.fg(Color::BLUE);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
