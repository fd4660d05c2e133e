#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All measurements are CSS pixels relative to the document origin
//! (top-left), rounded to whole pixels the way `offset().top` and
//! `outerHeight()` report them.

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// A point-in-time capture of the sizes and offsets the pin algorithm needs.
///
/// Snapshots are cheap to copy and are replaced wholesale; nothing inside one
/// is ever updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometrySnapshot {
    /// Window size at capture time.
    pub viewport: Size,
    /// Outer height of the pinned element.
    pub element_height: i32,
    /// The element's static `top` style captured at bind time, if any.
    pub element_top: Option<i32>,
    /// Outer height of the containing ancestor.
    pub container_height: i32,
    /// Document offset of the containing ancestor's top edge.
    pub container_top: i32,
}

impl GeometrySnapshot {
    /// Lowest document coordinate the element reaches when its top is at `scroll_top`.
    #[inline]
    pub const fn element_bottom(&self, scroll_top: i32) -> i32 {
        scroll_top.saturating_add(self.element_height)
    }

    /// Document coordinate of the container's bottom edge.
    #[inline]
    pub const fn container_bottom(&self) -> i32 {
        self.container_height.saturating_add(self.container_top)
    }

    /// Whether the container is tall enough for pinning to mean anything.
    ///
    /// A zero-height container never qualifies.
    #[inline]
    pub const fn container_fits_element(&self) -> bool {
        self.container_height > 0 && self.container_height >= self.element_height
    }

    /// Room the element has to travel inside the container.
    #[inline]
    pub const fn travel(&self) -> i32 {
        self.container_height.saturating_sub(self.element_height)
    }
}
