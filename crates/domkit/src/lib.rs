#![forbid(unsafe_code)]

//! domkit public facade crate.
//!
//! Re-exports the host capability traits, the widgets, and the binding
//! manager, plus a prelude for embedding code.
//!
//! ```
//! use domkit::prelude::*;
//! use domkit_harness::{ElementSpec, HeadlessHost};
//!
//! let mut host = HeadlessHost::new();
//! let root = host.dom().root();
//! let section = host.dom_mut().append(root, ElementSpec::new("section").size(800, 1200).offset_top(100));
//! let aside = host.dom_mut().append(section, ElementSpec::new("aside").size(200, 300));
//!
//! let mut widgets = BindingManager::new();
//! widgets.bind_pin(aside, PinOptions::default(), &mut host)?;
//! widgets.dispatch(&DomEvent::Ready, &mut host);
//! assert!(widgets.get::<Pin>(aside)?.is_enabled());
//! # Ok::<(), domkit::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use domkit_core::css::CssValue;
pub use domkit_core::event::{DomEvent, EventScope, KeyCode, Listeners};
pub use domkit_core::geometry::{GeometrySnapshot, Size};
pub use domkit_core::host::{
    Cookie, CookieJar, Dom, FetchCompletion, FetchHost, FetchOutcome, FetchTicket, Host, NodeId,
    StorageError, TimerHost, TimerId, Window,
};
pub use domkit_core::throttle::{Throttle, ThrottleDecision};

// --- Widget re-exports -----------------------------------------------------

pub use domkit_widgets::{
    Animation, BindError, BindingManager, Boundary, Carousel, CarouselOptions, ConfigError,
    Emitter, EventOutcome, Navigator, Pin, PinOptions, PinPhase, PinState, Side, Tabs, TabsMode,
    TabsOptions, Transition, Widget, WidgetEvent, WidgetKind,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use domkit_runtime::{DeterministicClock, FetchChannel, MemoryCookieJar, TimerQueue};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for domkit embedders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Option overrides could not be parsed.
    Config(ConfigError),
    /// Operation on an element with no (or another) widget.
    Bind(BindError),
    /// Cookie storage refused a write.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Bind(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Bind(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Standard result type for domkit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BindingManager, Carousel, CarouselOptions, DomEvent, Error, EventOutcome, Host, KeyCode,
        NodeId, Pin, PinOptions, Result, Tabs, TabsOptions, Widget, WidgetEvent,
    };

    pub use crate::{core, widgets};
}

pub use domkit_core as core;
#[cfg(feature = "runtime")]
pub use domkit_runtime as runtime;
pub use domkit_widgets as widgets;
