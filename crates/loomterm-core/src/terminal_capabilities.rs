#![forbid(unsafe_code)]

//! Terminal color-capability detection.
//!
//! The capability probe reads `NO_COLOR`, `COLORTERM`, `TERM`, and
//! `TERM_PROGRAM` to pick the narrowest-but-sufficient [`ColorProfile`] for
//! the host terminal. Detection is a pure function of the environment, so
//! it is deterministic and easy to test by constructing [`DetectInputs`]
//! directly instead of reading the process environment.

use std::env;

use loomterm_style::ColorProfile;

/// Terminal programs known to support full 24-bit color regardless of
/// `COLORTERM`.
const TRUE_COLOR_TERMINALS: &[&str] =
    &["iTerm.app", "WezTerm", "Alacritty", "Ghostty", "Rio", "kitty", "vscode"];

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    no_color: bool,
    term: String,
    term_program: String,
    colorterm: String,
}

impl DetectInputs {
    fn from_env() -> Self {
        Self {
            no_color: env::var("NO_COLOR").is_ok(),
            term: env::var("TERM").unwrap_or_default(),
            term_program: env::var("TERM_PROGRAM").unwrap_or_default(),
            colorterm: env::var("COLORTERM").unwrap_or_default(),
        }
    }

    fn resolve(&self) -> ColorProfile {
        if self.no_color || self.term.is_empty() || self.term == "dumb" {
            return ColorProfile::Mono;
        }
        if self.colorterm == "truecolor" || self.colorterm == "24bit" {
            return ColorProfile::TrueColor;
        }
        if TRUE_COLOR_TERMINALS.contains(&self.term_program.as_str()) {
            return ColorProfile::TrueColor;
        }
        if self.term.contains("256color") {
            return ColorProfile::Ansi256;
        }
        ColorProfile::Ansi16
    }
}

/// Detect the terminal's color profile from the current process
/// environment.
#[must_use]
pub fn detect_color_profile() -> ColorProfile {
    DetectInputs::from_env().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(term: &str, term_program: &str, colorterm: &str, no_color: bool) -> DetectInputs {
        DetectInputs {
            no_color,
            term: term.to_string(),
            term_program: term_program.to_string(),
            colorterm: colorterm.to_string(),
        }
    }

    #[test]
    fn no_color_env_forces_mono() {
        let inputs = inputs("xterm-256color", "", "", true);
        assert_eq!(inputs.resolve(), ColorProfile::Mono);
    }

    #[test]
    fn empty_or_dumb_term_is_mono() {
        assert_eq!(inputs("", "", "", false).resolve(), ColorProfile::Mono);
        assert_eq!(inputs("dumb", "", "", false).resolve(), ColorProfile::Mono);
    }

    #[test]
    fn colorterm_truecolor_wins() {
        let inputs = inputs("xterm", "", "truecolor", false);
        assert_eq!(inputs.resolve(), ColorProfile::TrueColor);
    }

    #[test]
    fn known_modern_terminal_gets_truecolor() {
        let inputs = inputs("xterm-256color", "WezTerm", "", false);
        assert_eq!(inputs.resolve(), ColorProfile::TrueColor);
    }

    #[test]
    fn plain_256color_term_is_ansi256() {
        let inputs = inputs("xterm-256color", "", "", false);
        assert_eq!(inputs.resolve(), ColorProfile::Ansi256);
    }

    #[test]
    fn plain_term_falls_back_to_ansi16() {
        let inputs = inputs("xterm", "", "", false);
        assert_eq!(inputs.resolve(), ColorProfile::Ansi16);
    }
}
