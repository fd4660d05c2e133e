#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The host translates its native events into [`DomEvent`] values and hands
//! them to the binding manager. Each event has a [`EventScope`] that decides
//! which widget instances see it:
//!
//! - window events (`ready`, `scroll`, `resize`, `keydown`) reach every
//!   instance listening for them;
//! - element events (`click`, `mouseover`, `mouseenter`, `mouseleave`) reach
//!   instances whose element contains the target;
//! - timer and fetch completions go to the single owning instance.

use bitflags::bitflags;

use crate::host::{FetchCompletion, NodeId, TimerId};

/// A key on the keyboard, reduced to what widgets bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// A printable character.
    Char(char),
    /// Anything else.
    Other,
}

impl KeyCode {
    /// Map a `KeyboardEvent.key` value.
    ///
    /// Both the standard names (`ArrowUp`) and the legacy ones (`Up`) are
    /// accepted, case-insensitively.
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::Char(c);
        }
        match name.to_ascii_lowercase().as_str() {
            "arrowup" | "up" => Self::Up,
            "arrowdown" | "down" => Self::Down,
            "arrowleft" | "left" => Self::Left,
            "arrowright" | "right" => Self::Right,
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "tab" => Self::Tab,
            _ => Self::Other,
        }
    }
}

bitflags! {
    /// Event kinds a widget wants delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Listeners: u16 {
        /// Document ready.
        const READY      = 0b0000_0000_0001;
        /// Window scroll.
        const SCROLL     = 0b0000_0000_0010;
        /// Window resize.
        const RESIZE     = 0b0000_0000_0100;
        /// Window keydown.
        const KEYDOWN    = 0b0000_0000_1000;
        /// Click inside the element.
        const CLICK      = 0b0000_0001_0000;
        /// Pointer moved over a descendant.
        const MOUSEOVER  = 0b0000_0010_0000;
        /// Pointer entered or left the element.
        const HOVER      = 0b0000_0100_0000;
        /// Owned timer fired.
        const TIMER      = 0b0000_1000_0000;
        /// Owned fetch completed.
        const FETCH      = 0b0001_0000_0000;
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::empty()
    }
}

/// Which instances an event is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Every listening instance.
    Window,
    /// Instances whose element contains this node.
    Element(NodeId),
    /// Exactly the instance bound to this element.
    Owner(NodeId),
}

/// Canonical host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// The document finished loading.
    Ready,
    /// The window scrolled.
    Scroll,
    /// The window resized.
    Resize,
    /// A key was pressed.
    Key(KeyCode),
    /// A click landed on `target`.
    Click {
        /// Innermost node clicked.
        target: NodeId,
    },
    /// The pointer moved onto `target`.
    MouseOver {
        /// Node under the pointer.
        target: NodeId,
    },
    /// The pointer entered `target`'s bounds.
    MouseEnter {
        /// Node entered.
        target: NodeId,
    },
    /// The pointer left `target`'s bounds.
    MouseLeave {
        /// Node left.
        target: NodeId,
    },
    /// A timer owned by `owner` fired.
    Timer {
        /// Element of the owning instance.
        owner: NodeId,
        /// The timer.
        id: TimerId,
    },
    /// A fetch completed.
    Fetched(FetchCompletion),
}

impl DomEvent {
    /// Listener kind this event belongs to.
    #[must_use]
    pub fn kind(&self) -> Listeners {
        match self {
            Self::Ready => Listeners::READY,
            Self::Scroll => Listeners::SCROLL,
            Self::Resize => Listeners::RESIZE,
            Self::Key(_) => Listeners::KEYDOWN,
            Self::Click { .. } => Listeners::CLICK,
            Self::MouseOver { .. } => Listeners::MOUSEOVER,
            Self::MouseEnter { .. } | Self::MouseLeave { .. } => Listeners::HOVER,
            Self::Timer { .. } => Listeners::TIMER,
            Self::Fetched(_) => Listeners::FETCH,
        }
    }

    /// Routing scope.
    #[must_use]
    pub fn scope(&self) -> EventScope {
        match self {
            Self::Ready | Self::Scroll | Self::Resize | Self::Key(_) => EventScope::Window,
            Self::Click { target }
            | Self::MouseOver { target }
            | Self::MouseEnter { target }
            | Self::MouseLeave { target } => EventScope::Element(*target),
            Self::Timer { owner, .. } => EventScope::Owner(*owner),
            Self::Fetched(done) => EventScope::Owner(done.owner),
        }
    }

    /// Target node of an element event.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self.scope() {
            EventScope::Element(target) => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FetchOutcome, FetchTicket};

    #[test]
    fn key_names() {
        assert_eq!(KeyCode::from_key_name("ArrowUp"), KeyCode::Up);
        assert_eq!(KeyCode::from_key_name("up"), KeyCode::Up);
        assert_eq!(KeyCode::from_key_name("Down"), KeyCode::Down);
        assert_eq!(KeyCode::from_key_name("ArrowLeft"), KeyCode::Left);
        assert_eq!(KeyCode::from_key_name("RIGHT"), KeyCode::Right);
        assert_eq!(KeyCode::from_key_name("Esc"), KeyCode::Escape);
        assert_eq!(KeyCode::from_key_name("x"), KeyCode::Char('x'));
        assert_eq!(KeyCode::from_key_name("F5"), KeyCode::Other);
    }

    #[test]
    fn scopes() {
        assert_eq!(DomEvent::Scroll.scope(), EventScope::Window);
        assert_eq!(
            DomEvent::Click { target: NodeId(4) }.scope(),
            EventScope::Element(NodeId(4))
        );
        assert_eq!(
            DomEvent::Timer {
                owner: NodeId(1),
                id: TimerId(9)
            }
            .scope(),
            EventScope::Owner(NodeId(1))
        );
        let done = DomEvent::Fetched(FetchCompletion {
            ticket: FetchTicket(1),
            owner: NodeId(2),
            url: "/a".into(),
            outcome: FetchOutcome::Success("ok".into()),
        });
        assert_eq!(done.scope(), EventScope::Owner(NodeId(2)));
        assert_eq!(done.target(), None);
    }

    #[test]
    fn hover_kinds_share_a_flag() {
        let enter = DomEvent::MouseEnter { target: NodeId(0) }.kind();
        let leave = DomEvent::MouseLeave { target: NodeId(0) }.kind();
        assert_eq!(enter, Listeners::HOVER);
        assert_eq!(enter, leave);
    }
}
