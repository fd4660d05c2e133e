#![forbid(unsafe_code)]

//! Inline style values written through [`Dom::set_css`](crate::host::Dom::set_css).

use std::fmt;

/// A value for a single inline CSS property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssValue {
    /// Whole pixels, e.g. `120px`.
    Px(i32),
    /// A percentage, e.g. `33.5%`.
    Percent(f64),
    /// The `auto` keyword.
    Auto,
    /// Any other keyword (`absolute`, `fixed`, `none`, ...).
    Keyword(&'static str),
}

impl CssValue {
    /// Pixel value, if this is one.
    #[must_use]
    pub const fn as_px(&self) -> Option<i32> {
        match self {
            Self::Px(px) => Some(*px),
            _ => None,
        }
    }

    /// Whether this is the `auto` keyword.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
            Self::Auto => f.write_str("auto"),
            Self::Keyword(kw) => f.write_str(kw),
        }
    }
}

impl From<i32> for CssValue {
    fn from(px: i32) -> Self {
        Self::Px(px)
    }
}

/// Parse a leading integer the way `parseInt("120px", 10)` does.
///
/// Returns `None` for `auto`, empty strings and anything without leading digits.
#[must_use]
pub fn parse_px(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i32>().ok().map(|v| v * sign)
}
