#![forbid(unsafe_code)]

//! Event types, input parsing, the event queue, and capability detection.

pub mod event;
pub mod event_queue;
pub mod geometry;
pub mod input_parser;
pub mod logging;
pub mod terminal_capabilities;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
