#![forbid(unsafe_code)]

//! In-memory cookie storage.
//!
//! [`MemoryCookieJar`] keeps the same observable behavior as
//! `document.cookie` for the subset widgets use: one value per name, a
//! `max-age` lifetime, and a path scope. Values are stored raw and
//! percent-encoded only when rendered as header text.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::InvalidName` | empty name, separators in name | write refused, jar unchanged |
//! | Expired entry | `max-age` elapsed | read returns `None`, entry evicted |
//! | Undecodable value | malformed `%` escape in header text | raw text kept |

use std::collections::BTreeMap;
use std::time::Duration;

use domkit_core::host::{Cookie, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    value: String,
    path: String,
    expires_at: Duration,
}

/// Cookie storage with expiry against a caller-supplied clock.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    entries: BTreeMap<String, StoredCookie>,
}

impl MemoryCookieJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a jar from `document.cookie`-style text; entries live `max_age` from `now`.
    #[must_use]
    pub fn from_document_cookie(text: &str, max_age: Duration, now: Duration) -> Self {
        let mut jar = Self::new();
        for (name, value) in parse_document_cookie(text) {
            let _ = jar.write(
                Cookie {
                    name,
                    value,
                    max_age,
                    path: "/".to_owned(),
                },
                now,
            );
        }
        jar
    }

    /// Value of `name` if present and not expired at `now`.
    pub fn read(&mut self, name: &str, now: Duration) -> Option<String> {
        let expired = self.entries.get(name)?.expires_at <= now;
        if expired {
            self.entries.remove(name);
            tracing::debug!(cookie = name, "cookie expired");
            return None;
        }
        self.entries.get(name).map(|c| c.value.clone())
    }

    /// Value of `name` without evicting expired entries.
    #[must_use]
    pub fn peek(&self, name: &str, now: Duration) -> Option<&str> {
        self.entries
            .get(name)
            .filter(|c| c.expires_at > now)
            .map(|c| c.value.as_str())
    }

    /// Store a cookie written at `now`.
    ///
    /// A zero `max_age` deletes the cookie, matching browser semantics.
    pub fn write(&mut self, cookie: Cookie, now: Duration) -> Result<(), StorageError> {
        validate_name(&cookie.name)?;
        if cookie.max_age.is_zero() {
            self.entries.remove(&cookie.name);
            return Ok(());
        }
        tracing::debug!(
            cookie = cookie.name.as_str(),
            path = cookie.path.as_str(),
            max_age_s = cookie.max_age.as_secs(),
            "cookie written"
        );
        self.entries.insert(
            cookie.name,
            StoredCookie {
                value: cookie.value,
                path: cookie.path,
                expires_at: now.saturating_add(cookie.max_age),
            },
        );
        Ok(())
    }

    /// Path scope a cookie was written with.
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|c| c.path.as_str())
    }

    /// Remove a cookie.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Live cookies rendered as `document.cookie` text (`a=1; b=2`).
    #[must_use]
    pub fn document_cookie(&self, now: Duration) -> String {
        self.entries
            .iter()
            .filter(|(_, c)| c.expires_at > now)
            .map(|(name, c)| format!("{name}={}", encode_component(&c.value)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Number of stored entries, including ones that have expired but not been read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the jar holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render a cookie as the text assigned to `document.cookie`.
#[must_use]
pub fn set_cookie_string(cookie: &Cookie) -> String {
    format!(
        "{}={}; max-age={}; path={}",
        cookie.name,
        encode_component(&cookie.value),
        cookie.max_age.as_secs(),
        cookie.path
    )
}

/// Split `document.cookie` text into decoded `(name, value)` pairs.
#[must_use]
pub fn parse_document_cookie(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let decoded = decode_component(value).unwrap_or_else(|| value.to_owned());
            Some((name.to_owned(), decoded))
        })
        .collect()
}

/// Percent-encode like `encodeURIComponent`.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        let unreserved = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if unreserved {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(hex_digit(byte >> 4));
            out.push(hex_digit(byte & 0x0F));
        }
    }
    out
}

/// Reverse of [`encode_component`]. `None` on malformed escapes or invalid UTF-8.
#[must_use]
pub fn decode_component(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','));
    if bad {
        return Err(StorageError::InvalidName(name.to_owned()));
    }
    Ok(())
}

const fn hex_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'A' + nibble - 10) as char,
    }
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(v: u64) -> Duration {
        Duration::from_secs(v)
    }

    #[test]
    fn write_then_read() {
        let mut jar = MemoryCookieJar::new();
        jar.write(Cookie::site_wide("domkit.tabs.main", "2", 30), secs(0))
            .unwrap();
        assert_eq!(jar.read("domkit.tabs.main", secs(10)).as_deref(), Some("2"));
        assert_eq!(jar.path_of("domkit.tabs.main"), Some("/"));
    }

    #[test]
    fn expiry_evicts() {
        let mut jar = MemoryCookieJar::new();
        jar.write(Cookie::site_wide("a", "1", 1), secs(0)).unwrap();
        assert_eq!(jar.peek("a", secs(86_399)), Some("1"));
        assert_eq!(jar.read("a", secs(86_400)), None);
        assert!(jar.is_empty());
    }

    #[test]
    fn zero_max_age_deletes() {
        let mut jar = MemoryCookieJar::new();
        jar.write(Cookie::site_wide("a", "1", 1), secs(0)).unwrap();
        jar.write(Cookie::site_wide("a", "", 0), secs(1)).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn rejects_bad_names() {
        let mut jar = MemoryCookieJar::new();
        for name in ["", "a b", "a;b", "a=b"] {
            let err = jar
                .write(Cookie::site_wide(name, "1", 1), secs(0))
                .unwrap_err();
            assert_eq!(err, StorageError::InvalidName(name.to_owned()));
        }
        assert!(jar.is_empty());
    }

    #[test]
    fn document_cookie_roundtrip() {
        let mut jar = MemoryCookieJar::new();
        jar.write(Cookie::site_wide("x", "a b;c", 1), secs(0)).unwrap();
        jar.write(Cookie::site_wide("y", "7", 1), secs(0)).unwrap();
        let text = jar.document_cookie(secs(1));
        assert_eq!(text, "x=a%20b%3Bc; y=7");
        let parsed = parse_document_cookie(&text);
        assert_eq!(
            parsed,
            vec![("x".to_owned(), "a b;c".to_owned()), ("y".to_owned(), "7".to_owned())]
        );
    }

    #[test]
    fn seed_from_document_cookie() {
        let mut jar = MemoryCookieJar::from_document_cookie(" domkit.tabs.t=3 ; junk", secs(60), secs(0));
        assert_eq!(jar.read("domkit.tabs.t", secs(1)).as_deref(), Some("3"));
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn set_cookie_text() {
        let cookie = Cookie::site_wide("domkit.tabs.t", "1", 30);
        assert_eq!(
            set_cookie_string(&cookie),
            "domkit.tabs.t=1; max-age=2592000; path=/"
        );
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(decode_component("%4"), None);
        assert_eq!(decode_component("%zz"), None);
        assert_eq!(decode_component("%E2%9C%93").as_deref(), Some("✓"));
    }
}
