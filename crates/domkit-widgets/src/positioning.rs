#![forbid(unsafe_code)]

//! Pin placement from geometry and scroll offset.
//!
//! [`PositioningEngine::compute`] is pure: the same snapshot and scroll
//! offset always give the same [`PinState`]. The [`Pin`](crate::Pin) widget
//! owns when to call it and how to write the result.
//!
//! # Placement rules
//!
//! | Condition | Fixed mode | Absolute mode |
//! |-----------|------------|---------------|
//! | `scroll_top < container_top` | unpinned | unpinned |
//! | element bottom reaches container bottom | `absolute`, `top: auto`, `bottom: 0` | `top = container_height - element_height` |
//! | otherwise | `fixed`, `top: 0`, `bottom: auto` | `top = scroll_top - container_top + y_offset` |
//!
//! In absolute mode the result never goes above the element's original
//! static `top` when that was a positive pixel value.

use domkit_core::css::CssValue;
use domkit_core::geometry::GeometrySnapshot;

/// Horizontal edge the `x_offset` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// `left: x`.
    Left,
    /// `right: x`.
    #[default]
    Right,
}

impl Side {
    /// CSS property name.
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// CSS `position` of a pinned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Positioning {
    /// Tracks the viewport.
    Fixed,
    /// Tracks the container.
    Absolute,
}

impl Positioning {
    /// CSS keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Absolute => "absolute",
        }
    }
}

/// Inline placement for a pinned element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPlacement {
    /// `position`.
    pub position: Positioning,
    /// `top`.
    pub top: CssValue,
    /// `bottom`; absolute mode leaves it untouched.
    pub bottom: Option<CssValue>,
    /// Edge carrying the horizontal offset.
    pub side: Side,
    /// Horizontal offset in pixels.
    pub x: i32,
}

impl PinPlacement {
    /// `(property, value)` pairs in write order.
    #[must_use]
    pub fn styles(&self) -> Vec<(&'static str, CssValue)> {
        let mut out = Vec::with_capacity(4);
        out.push(("position", CssValue::Keyword(self.position.keyword())));
        if let Some(bottom) = self.bottom {
            out.push(("bottom", bottom));
        }
        out.push((self.side.property(), CssValue::Px(self.x)));
        out.push(("top", self.top));
        out
    }

    /// Vertical pixel offset, if `top` is one.
    #[must_use]
    pub const fn y(&self) -> Option<i32> {
        self.top.as_px()
    }
}

/// Result of one positioning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinState {
    /// Natural layout; inline placement cleared.
    Unpinned,
    /// Tracking scroll.
    Pinned(PinPlacement),
}

impl PinState {
    /// Whether the element is tracking scroll.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned(_))
    }

    /// Placement when pinned.
    #[must_use]
    pub const fn placement(&self) -> Option<&PinPlacement> {
        match self {
            Self::Pinned(placement) => Some(placement),
            Self::Unpinned => None,
        }
    }
}

/// Placement parameters fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositioningEngine {
    /// Switch between `fixed` and bottom-anchored `absolute`.
    pub fixed: bool,
    /// Edge carrying `x_offset`.
    pub side: Side,
    /// Horizontal offset.
    pub x_offset: i32,
    /// Vertical offset added while tracking in absolute mode.
    pub y_offset: i32,
}

impl PositioningEngine {
    /// Place the element for `scroll_top`.
    #[must_use]
    pub fn compute(&self, geometry: &GeometrySnapshot, scroll_top: i32) -> PinState {
        if scroll_top < geometry.container_top {
            return PinState::Unpinned;
        }

        let bottom_reached = geometry.element_bottom(scroll_top) >= geometry.container_bottom();

        let (position, top, bottom) = if self.fixed {
            if bottom_reached {
                (Positioning::Absolute, CssValue::Auto, Some(CssValue::Px(0)))
            } else {
                (Positioning::Fixed, CssValue::Px(0), Some(CssValue::Auto))
            }
        } else {
            let mut y = if bottom_reached {
                geometry.travel()
            } else {
                scroll_top
                    .saturating_sub(geometry.container_top)
                    .saturating_add(self.y_offset)
            };
            if let Some(original) = geometry.element_top.filter(|top| *top > 0) {
                y = y.max(original);
            }
            (Positioning::Absolute, CssValue::Px(y), None)
        };

        PinState::Pinned(PinPlacement {
            position,
            top,
            bottom,
            side: self.side,
            x: self.x_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GeometrySnapshot {
        GeometrySnapshot {
            container_top: 100,
            container_height: 500,
            element_height: 200,
            ..GeometrySnapshot::default()
        }
    }

    #[test]
    fn above_container_is_unpinned() {
        let engine = PositioningEngine::default();
        assert_eq!(engine.compute(&geometry(), 50), PinState::Unpinned);
        assert_eq!(engine.compute(&geometry(), 99), PinState::Unpinned);
    }

    #[test]
    fn absolute_tracks_scroll() {
        let engine = PositioningEngine {
            y_offset: 10,
            ..PositioningEngine::default()
        };
        let state = engine.compute(&geometry(), 150);
        let placement = state.placement().unwrap();
        assert_eq!(placement.position, Positioning::Absolute);
        assert_eq!(placement.y(), Some(60));
        assert_eq!(placement.bottom, None);
    }

    #[test]
    fn absolute_stops_at_container_bottom() {
        let engine = PositioningEngine::default();
        // 400 + 200 = 600 == container bottom
        let placement = *engine.compute(&geometry(), 400).placement().unwrap();
        assert_eq!(placement.y(), Some(300));
        let placement = *engine.compute(&geometry(), 5_000).placement().unwrap();
        assert_eq!(placement.y(), Some(300));
    }

    #[test]
    fn original_top_is_a_floor() {
        let engine = PositioningEngine::default();
        let mut g = geometry();
        g.element_top = Some(40);
        assert_eq!(engine.compute(&g, 110).placement().unwrap().y(), Some(40));
        assert_eq!(engine.compute(&g, 200).placement().unwrap().y(), Some(100));
        g.element_top = Some(-20);
        assert_eq!(engine.compute(&g, 110).placement().unwrap().y(), Some(10));
    }

    #[test]
    fn fixed_mode_switches_at_bottom() {
        let engine = PositioningEngine {
            fixed: true,
            side: Side::Left,
            x_offset: 12,
            y_offset: 99,
        };
        let tracking = *engine.compute(&geometry(), 150).placement().unwrap();
        assert_eq!(tracking.position, Positioning::Fixed);
        assert_eq!(tracking.top, CssValue::Px(0));
        assert_eq!(tracking.bottom, Some(CssValue::Auto));

        let anchored = *engine.compute(&geometry(), 450).placement().unwrap();
        assert_eq!(anchored.position, Positioning::Absolute);
        assert_eq!(anchored.top, CssValue::Auto);
        assert_eq!(anchored.bottom, Some(CssValue::Px(0)));
        assert_eq!(anchored.side, Side::Left);
        assert_eq!(anchored.x, 12);
    }

    #[test]
    fn styles_include_side_and_optional_bottom() {
        let engine = PositioningEngine::default();
        let placement = *engine.compute(&geometry(), 150).placement().unwrap();
        let names: Vec<_> = placement.styles().iter().map(|(p, _)| *p).collect();
        assert_eq!(names, ["position", "right", "top"]);
    }
}
