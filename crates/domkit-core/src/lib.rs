#![forbid(unsafe_code)]

//! Core: host capabilities, geometry, events, and sampling primitives.
//!
//! Widgets never touch a document directly. Everything they need from the
//! embedding environment (element lookup, class toggling, sizes, timers,
//! remote content, cookies) goes through the traits in [`host`].

pub mod css;
pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod throttle;
pub mod viewport;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
