//! Color values and the profile used to downgrade them for a given terminal.

/// A color request for a cell's foreground or background.
///
/// `Color` is a request, not a pixel: the differ picks the narrowest SGR
/// encoding that still represents it faithfully for the active
/// [`ColorProfile`] (see [`Color::downgrade`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default (SGR 39 / SGR 49).
    #[default]
    Default,
    /// One of the 16 standard ANSI colors (0-7 normal, 8-15 bright).
    Ansi16(u8),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard named ANSI-16 constructors, matching SGR 30-37 ordering.
    pub const BLACK: Self = Self::Ansi16(0);
    pub const RED: Self = Self::Ansi16(1);
    pub const GREEN: Self = Self::Ansi16(2);
    pub const YELLOW: Self = Self::Ansi16(3);
    pub const BLUE: Self = Self::Ansi16(4);
    pub const MAGENTA: Self = Self::Ansi16(5);
    pub const CYAN: Self = Self::Ansi16(6);
    pub const WHITE: Self = Self::Ansi16(7);

    /// Build a 24-bit true color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }

    /// Downgrade this color to what `profile` can represent, preferring the
    /// narrowest encoding that is still faithful.
    ///
    /// `Mono` has no color at all, so every color downgrades to `Default`;
    /// that's the only lossy case — the renderer still emits attribute
    /// (bold/underline/etc.) SGR codes even under `Mono`.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Self {
        match (self, profile) {
            (_, ColorProfile::Mono) => Self::Default,
            (Self::Rgb(..), ColorProfile::Ansi256) => Self::Indexed(self.to_ansi256()),
            (Self::Rgb(..) | Self::Indexed(_), ColorProfile::Ansi16) => {
                Self::Ansi16(self.to_ansi16())
            }
            _ => self,
        }
    }

    /// Approximate this color as one of the 256-palette indices.
    ///
    /// Grayscale RGB (r == g == b) maps into the 24-step grayscale ramp
    /// (indices 232-255); everything else maps into the 6x6x6 color cube
    /// (indices 16-231), matching the standard xterm-256color layout.
    #[must_use]
    pub fn to_ansi256(self) -> u8 {
        match self {
            Self::Indexed(n) => n,
            Self::Ansi16(n) => n,
            Self::Rgb(r, g, b) => {
                if r == g && g == b {
                    if r < 8 {
                        return 16;
                    }
                    if r > 248 {
                        return 231;
                    }
                    return 232 + (((r as u16 - 8) * 24) / 247) as u8;
                }
                let scale = |c: u8| (c as u16 * 5 / 255) as u8;
                16 + 36 * scale(r) + 6 * scale(g) + scale(b)
            }
            Self::Default => 0,
        }
    }

    /// Approximate this color as one of the 16 standard ANSI indices.
    #[must_use]
    pub fn to_ansi16(self) -> u8 {
        match self {
            Self::Ansi16(n) => n,
            Self::Default => 7,
            Self::Indexed(n) => ansi256_to_ansi16(n),
            Self::Rgb(r, g, b) => {
                let bright = r.max(g).max(b) > 191;
                let idx = ((b > 63) as u8) << 2 | ((g > 63) as u8) << 1 | (r > 63) as u8;
                idx + if bright { 8 } else { 0 }
            }
        }
    }
}

fn ansi256_to_ansi16(n: u8) -> u8 {
    if n < 16 {
        return n;
    }
    if n >= 232 {
        return if n < 244 { 0 } else { 7 };
    }
    let n = n - 16;
    let r = n / 36;
    let g = (n % 36) / 6;
    let b = n % 6;
    let bright = r.max(g).max(b) > 2;
    let idx = ((b > 2) as u8) << 2 | ((g > 2) as u8) << 1 | (r > 2) as u8;
    idx + if bright { 8 } else { 0 }
}

/// The color depth a terminal supports, used to downgrade requested colors.
///
/// Detected from `COLORTERM`/`TERM_PROGRAM`/`TERM` by the platform adapter's
/// capability probe; callers that already know the answer (tests, explicit
/// user override) can construct one directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProfile {
    /// No color output (`NO_COLOR` set, or a dumb terminal).
    Mono,
    /// Standard 16 ANSI colors.
    Ansi16,
    /// Extended 256-color palette.
    Ansi256,
    /// Full 24-bit RGB color.
    TrueColor,
}

impl ColorProfile {
    /// Whether this profile can represent 24-bit RGB faithfully.
    #[must_use]
    pub const fn supports_true_color(self) -> bool {
        matches!(self, Self::TrueColor)
    }

    /// Whether this profile can represent the 256-color palette faithfully.
    #[must_use]
    pub const fn supports_256(self) -> bool {
        matches!(self, Self::Ansi256 | Self::TrueColor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_downgrades_everything_to_default() {
        for c in [Color::RED, Color::rgb(10, 20, 30), Color::Indexed(200)] {
            assert_eq!(c.downgrade(ColorProfile::Mono), Color::Default);
        }
    }

    #[test]
    fn truecolor_is_identity() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c.downgrade(ColorProfile::TrueColor), c);
    }

    #[test]
    fn rgb_black_and_white_roundtrip_through_256() {
        assert_eq!(Color::rgb(0, 0, 0).to_ansi256(), 16);
        assert_eq!(Color::rgb(255, 255, 255).to_ansi256(), 231);
    }

    #[test]
    fn ansi16_downgrade_is_idempotent() {
        let c = Color::Ansi16(3);
        assert_eq!(c.downgrade(ColorProfile::Ansi16), c);
    }
}
