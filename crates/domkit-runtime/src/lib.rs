#![forbid(unsafe_code)]

//! domkit runtime services
//!
//! The pieces a host needs to back the capability traits of `domkit-core`
//! without a browser: a host-controlled clock, a timer queue, a cookie jar
//! with expiry, and the completion channel for content fetches.
//!
//! # Key Components
//!
//! - [`DeterministicClock`] - monotonic time advanced explicitly by the host
//! - [`TimerQueue`] - repeating and one-shot timers keyed by owner element
//! - [`MemoryCookieJar`] - in-memory cookie storage with `max-age` and path
//! - [`FetchChannel`] - request ledger plus the single completion channel
//!
//! Everything here is single-threaded except [`FetchCompleter`], which can
//! be moved to whatever thread performs the transport.

pub mod clock;
pub mod cookies;
pub mod fetch;
pub mod timers;

pub use clock::DeterministicClock;
pub use cookies::{
    MemoryCookieJar, decode_component, encode_component, parse_document_cookie, set_cookie_string,
};
pub use fetch::{FetchChannel, FetchCompleter, FetchRequest};
pub use timers::{FiredTimer, TimerQueue};
