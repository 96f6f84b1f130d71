//! Color and style value types shared by loomterm's buffer and renderer.
//!
//! This crate has no I/O and no platform dependency: it is pure data plus
//! the downgrade math needed to fit a requested color into a terminal's
//! actual color depth.

mod color;
mod style;

pub use color::{Color, ColorProfile};
pub use style::{Attrs, Style};
