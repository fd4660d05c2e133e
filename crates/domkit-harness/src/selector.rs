#![forbid(unsafe_code)]

//! Minimal CSS selector support for the headless DOM.
//!
//! Supported: type (`li`), id (`#main`), class (`.tabs-nav`), universal
//! (`*`), compounds of those (`li.item.active`), and the descendant (` `)
//! and child (`>`) combinators. That is everything widget option defaults
//! use; anything else fails to parse and matches nothing.

/// One compound selector, e.g. `li.item`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// Tag name, `None` for `*` or class/id-only compounds.
    pub tag: Option<String>,
    /// Required id.
    pub id: Option<String>,
    /// Required classes.
    pub classes: Vec<String>,
}

/// Relationship between a compound and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Any ancestor.
    Descendant,
    /// Direct parent.
    Child,
}

/// A parsed selector: compounds left to right with their leading combinators.
///
/// The combinator attached to the first compound is meaningless and always
/// [`Combinator::Descendant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// `(combinator, compound)` pairs in source order.
    pub parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parse a selector. Returns `None` for unsupported syntax.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let spaced = input.replace('>', " > ");
        let mut parts = Vec::new();
        let mut pending = Combinator::Descendant;
        for token in spaced.split_whitespace() {
            if token == ">" {
                if parts.is_empty() || pending == Combinator::Child {
                    return None;
                }
                pending = Combinator::Child;
                continue;
            }
            parts.push((pending, parse_compound(token)?));
            pending = Combinator::Descendant;
        }
        if parts.is_empty() || pending == Combinator::Child {
            return None;
        }
        Some(Self { parts })
    }
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = token;

    let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if !tag.is_empty() && tag != "*" {
        if !tag.chars().all(is_ident_char) {
            return None;
        }
        compound.tag = Some(tag.to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..end];
        if name.is_empty() || !name.chars().all(is_ident_char) {
            return None;
        }
        match marker {
            '.' => compound.classes.push(name.to_owned()),
            '#' => {
                if compound.id.replace(name.to_owned()).is_some() {
                    return None;
                }
            }
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(compound)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
