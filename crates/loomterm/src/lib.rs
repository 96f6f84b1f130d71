#![forbid(unsafe_code)]

//! loomterm public facade crate.
//!
//! # Role in loomterm
//! This crate is the user-facing entry point. It re-exports the commonly
//! used types from the internal crates (core/render/style/term/runtime) so
//! application code does not need to wire each crate individually.
//!
//! If you only depend on one crate in your application, it should be
//! `loomterm`.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use loomterm_core::event::{
    Event, Key, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind, TickEvent,
    UserEvent,
};
pub use loomterm_core::event_queue::EventQueue;
pub use loomterm_core::geometry::Rect;
pub use loomterm_core::input_parser::InputParser;
pub use loomterm_core::terminal_capabilities::detect_color_profile;

// --- Style re-exports --------------------------------------------------------

pub use loomterm_style::{Attrs, Color, ColorProfile, Style};

// --- Render re-exports -------------------------------------------------------

pub use loomterm_render::cell::Cell;
pub use loomterm_render::renderer::Renderer;
pub use loomterm_render::screen::Screen;

// --- Terminal adapter re-exports ---------------------------------------------

pub use loomterm_term::{TerminalConfig, TerminalController, TtyEventSource};

// --- Runtime re-exports -------------------------------------------------------

pub use loomterm_runtime::{App, AppConfig, EventResult, RenderContext, Widget};

// --- Errors ------------------------------------------------------------------

/// Top-level error type for loomterm apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal setup, teardown, or flush.
    Io(std::io::Error),
    /// A terminal-level error with no underlying `io::Error`.
    Terminal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Terminal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for loomterm APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude -------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        App, AppConfig, Cell, Color, Error, Event, EventResult, Key, KeyEvent, Modifiers,
        RenderContext, Renderer, Result, Screen, Style, TerminalConfig, TerminalController,
        TtyEventSource, Widget,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: Error = Error::from(io_err);
        match &err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            Error::Terminal(_) => panic!("expected Io variant"),
        }
    }

    #[test]
    fn error_terminal_display() {
        let err = Error::Terminal("something broke".into());
        assert_eq!(format!("{err}"), "something broke");
    }

    #[test]
    fn error_is_std_error() {
        let err = Error::Terminal("msg".into());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_ok().unwrap(), 42);

        let err: Result<i32> = Err(Error::Terminal("fail".into()));
        assert!(err.is_err());
    }

    #[test]
    fn prelude_re_exports_core_types() {
        use crate::prelude::*;
        let _config = TerminalConfig::default();
        let _app_config = AppConfig::default();
    }
}
