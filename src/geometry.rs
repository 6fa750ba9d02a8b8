//! Rectangle and point primitives plus the pure geometry helpers used by
//! selection rectangle computation.
//!
//! All functions here are pure (no host access, no side effects) and can be
//! tested independently of any surface state.

use serde::{Deserialize, Serialize};

/// A point in a surface's local visual coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// An axis-aligned rectangle carrying both edge and size fields, mirroring
/// the shape reported by client-rect queries.
///
/// Invariants (maintained by the constructors): `right >= left`,
/// `bottom >= top`, `width = right - left`, `height = bottom - top`,
/// `x = left`, `y = top`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let right = right.max(left);
        let bottom = bottom.max(top);
        Self {
            x: left,
            y: top,
            top,
            left,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Build a rectangle from origin and size.
    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_edges(x, y, x + width.max(0.0), y + height.max(0.0))
    }

    /// Zero-area rectangle (no visible extent).
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Point containment test, edges inclusive.
    ///
    /// Inclusive on all four edges so that a pointer resting exactly on a
    /// region border still counts as inside (the retention bound contract).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(self.right, self.bottom)
    }
}

/// Intersect `rect` with `bound`, clamping every edge into the bound's box.
///
/// Returns `None` when the two rectangles are disjoint. A result that merely
/// touches an edge of the bound is returned as a zero-area rectangle; callers
/// that care filter those with [`Rect::is_degenerate`].
pub fn clamp_rect(rect: Rect, bound: Rect) -> Option<Rect> {
    let left = rect.left.max(bound.left);
    let top = rect.top.max(bound.top);
    let right = rect.right.min(bound.right);
    let bottom = rect.bottom.min(bound.bottom);

    if right < left || bottom < top {
        return None;
    }

    Some(Rect::from_edges(left, top, right, bottom))
}

/// Translate a viewport rectangle into surface-local scrolled coordinates by
/// subtracting the surface's scroll offsets from both axes.
pub fn relative_rect(rect: Rect, scroll_x: f64, scroll_y: f64) -> Rect {
    Rect::from_edges(
        rect.left - scroll_x,
        rect.top - scroll_y,
        rect.right - scroll_x,
        rect.bottom - scroll_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_edges_invariants() {
        let r = Rect::from_edges(10.0, 20.0, 50.0, 60.0);
        assert_eq!(r.width, 40.0);
        assert_eq!(r.height, 40.0);
        assert_eq!(r.x, r.left);
        assert_eq!(r.y, r.top);
    }

    #[test]
    fn test_rect_from_edges_never_inverted() {
        // Inverted input collapses rather than producing negative size
        let r = Rect::from_edges(50.0, 50.0, 10.0, 10.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert!(r.is_degenerate());
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(100.0, 100.0));
        assert!(r.contains(50.0, 50.0));
        assert!(!r.contains(100.1, 50.0));
        assert!(!r.contains(-0.1, 50.0));
    }

    #[test]
    fn test_clamp_rect_overlapping() {
        let r = Rect::from_edges(-10.0, -10.0, 50.0, 50.0);
        let b = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        let clamped = clamp_rect(r, b).unwrap();
        assert_eq!(clamped, Rect::from_edges(0.0, 0.0, 50.0, 50.0));
        // Fully contained in the bound
        assert!(clamped.left >= b.left && clamped.right <= b.right);
        assert!(clamped.top >= b.top && clamped.bottom <= b.bottom);
    }

    #[test]
    fn test_clamp_rect_contained_is_unchanged() {
        let r = Rect::from_edges(10.0, 10.0, 20.0, 20.0);
        let b = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        assert_eq!(clamp_rect(r, b), Some(r));
    }

    #[test]
    fn test_clamp_rect_disjoint_is_none() {
        let r = Rect::from_edges(200.0, 200.0, 300.0, 300.0);
        let b = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        assert_eq!(clamp_rect(r, b), None);
    }

    #[test]
    fn test_clamp_rect_touching_edge_is_degenerate() {
        let r = Rect::from_edges(100.0, 0.0, 200.0, 50.0);
        let b = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        let clamped = clamp_rect(r, b).unwrap();
        assert!(clamped.is_degenerate());
        assert_eq!(clamped.left, 100.0);
        assert_eq!(clamped.right, 100.0);
    }

    #[test]
    fn test_relative_rect_subtracts_scroll() {
        let r = Rect::from_edges(10.0, 100.0, 90.0, 116.0);
        let shifted = relative_rect(r, 10.0, 96.0);
        assert_eq!(shifted, Rect::from_edges(0.0, 4.0, 80.0, 20.0));
        assert_eq!(shifted.width, r.width);
        assert_eq!(shifted.height, r.height);
    }
}
