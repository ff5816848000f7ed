//! Axis-aligned rectangle geometry
//!
//! Every collider in the game (ball, paddle, block) is an axis-aligned box in
//! playfield coordinates: x grows rightward from the left wall, y grows
//! downward from the ceiling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Inclusive interval overlap: true when either endpoint of one span lies
/// within the other span (this also covers one span containing the other)
#[inline]
pub fn spans_overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// An axis-aligned rectangle stored as its top-left and bottom-right corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(left + width, top + height),
        }
    }

    /// Square with the given top-left corner
    pub fn square(top_left: Vec2, side: f32) -> Self {
        Self::new(top_left.x, top_left.y, side, side)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Horizontal span overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        spans_overlap(self.left(), self.right(), other.left(), other.right())
    }

    /// Vertical span overlap
    #[inline]
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        spans_overlap(self.top(), self.bottom(), other.top(), other.bottom())
    }

    /// Both spans overlap (touching edges count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_overlap_endpoints() {
        // Endpoint of a inside b
        assert!(spans_overlap(0.0, 10.0, 5.0, 20.0));
        // Touching is inclusive
        assert!(spans_overlap(0.0, 10.0, 10.0, 20.0));
        // Disjoint
        assert!(!spans_overlap(0.0, 10.0, 10.5, 20.0));
    }

    #[test]
    fn test_spans_overlap_containment() {
        // a contains b: no endpoint of a lies inside b, but b's do inside a
        assert!(spans_overlap(0.0, 20.0, 5.0, 15.0));
        assert!(spans_overlap(5.0, 15.0, 0.0, 20.0));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 75.0, 15.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 85.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 35.0);
        assert_eq!(r.width(), 75.0);
        assert_eq!(r.height(), 15.0);
    }

    #[test]
    fn test_tall_ball_straddles_thin_block() {
        // 20px ball whose vertical span fully contains a 15px block
        let ball = Rect::square(Vec2::new(100.0, 95.0), 20.0);
        let block = Rect::new(90.0, 98.0, 75.0, 15.0);
        assert!(ball.overlaps(&block));
    }

    #[test]
    fn test_rects_apart_on_one_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 30.0, 10.0, 10.0);
        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps_y(&b));
        assert!(!a.overlaps(&b));
    }
}
