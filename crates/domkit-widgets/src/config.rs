#![forbid(unsafe_code)]

//! Option normalization and JSON overrides.
//!
//! Every widget takes an explicit options struct. Values that would make a
//! widget misbehave (a zero throttle window, a zero cycle period) are
//! replaced with defaults by `validated()` instead of being rejected; only
//! malformed JSON overrides surface as [`ConfigError`].

use std::fmt;
use std::time::Duration;

/// Errors from parsing option overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The text is not valid JSON.
    Syntax {
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// Parser message.
        message: String,
    },
    /// The JSON is well formed but a field has the wrong type or an unknown value.
    Invalid {
        /// Parser message, including the offending field.
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                line,
                column,
                message,
            } => write!(f, "option syntax error at {line}:{column}: {message}"),
            Self::Invalid { message } => write!(f, "invalid option: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Data => Self::Invalid {
                message: err.to_string(),
            },
            Category::Io | Category::Syntax | Category::Eof => Self::Syntax {
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            },
        }
    }
}

/// Parse an options struct from a JSON object; absent fields keep their defaults.
#[cfg(feature = "serde")]
pub(crate) fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// `value`, or `default` with a warning when `value` is zero.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn nonzero_or(value: Duration, default: Duration, field: &'static str) -> Duration {
    if value.is_zero() {
        domkit_core::warn!(field, "zero duration replaced with default");
        default
    } else {
        value
    }
}

/// Durations as whole milliseconds in JSON (`"throttle": 50`).
#[cfg(feature = "serde")]
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
