//! Collision detection and response for axis-aligned boxes
//!
//! Reflection in this game is a sign flip: hitting a horizontal surface flips
//! `rise`, hitting a vertical surface flips `run`. The interesting part is
//! deciding which surface of a block the ball struck.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Which side of a block the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl CollisionSide {
    /// Tie-break order: the earliest side in this list wins on equal distances
    pub const PRIORITY: [CollisionSide; 4] = [
        CollisionSide::Top,
        CollisionSide::Right,
        CollisionSide::Bottom,
        CollisionSide::Left,
    ];

    /// True for the horizontal faces, which reflect the vertical component
    pub fn flips_rise(self) -> bool {
        matches!(self, CollisionSide::Top | CollisionSide::Bottom)
    }
}

/// Resolve the side of `block` that `ball` struck
///
/// Each side's distance is measured between the ball edge facing it and that
/// block edge (ball bottom to block top, ball left to block right, and so on).
/// The smallest absolute distance wins; ties go to the earlier entry in
/// [`CollisionSide::PRIORITY`].
pub fn resolve_side(ball: &Rect, block: &Rect) -> CollisionSide {
    let distance = |side: CollisionSide| match side {
        CollisionSide::Top => (ball.bottom() - block.top()).abs(),
        CollisionSide::Right => (ball.left() - block.right()).abs(),
        CollisionSide::Bottom => (ball.top() - block.bottom()).abs(),
        CollisionSide::Left => (ball.right() - block.left()).abs(),
    };

    let mut best = CollisionSide::PRIORITY[0];
    let mut best_distance = distance(best);
    for side in &CollisionSide::PRIORITY[1..] {
        let d = distance(*side);
        // Strictly smaller only, so earlier sides keep ties
        if d < best_distance {
            best = *side;
            best_distance = d;
        }
    }
    best
}

/// Check whether the next step would leave through the ceiling
#[inline]
pub fn hits_ceiling(next_top: f32) -> bool {
    next_top < 0.0
}

/// Check whether the next step would drop below the playable floor
#[inline]
pub fn falls_out(next_top: f32, playfield_height: f32, diameter: f32) -> bool {
    next_top > playfield_height - diameter
}

/// Check whether the next step would cross the left or right wall
#[inline]
pub fn hits_side_wall(next_left: f32, playfield_width: f32, diameter: f32) -> bool {
    next_left < 0.0 || next_left > playfield_width - diameter
}
