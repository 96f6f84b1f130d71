#![forbid(unsafe_code)]

//! Render kernel: cells, screens, the differ, ANSI byte generation, and the
//! [`renderer::Renderer`] that ties them together.

pub mod ansi;
pub mod cell;
pub mod diff;
pub mod renderer;
pub mod screen;
pub mod text_width;
