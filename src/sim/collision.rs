//! Movement collision against static obstacles
//!
//! Each axis of a proposed move is tested on its own, so an entity pushing
//! diagonally into a wall keeps sliding along it instead of stopping dead.

use glam::Vec2;

use super::geometry::{Rect, aabb_overlap};

/// Result of resolving a proposed move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// New top-left corner of the bounding box
    pub pos: Vec2,
    /// X motion was rejected
    pub blocked_x: bool,
    /// Y motion was rejected
    pub blocked_y: bool,
}

impl MoveResult {
    /// Whether either axis hit something
    #[inline]
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }

    /// Displacement actually applied
    #[inline]
    pub fn applied(&self, from: &Rect) -> Vec2 {
        self.pos - Vec2::new(from.x, from.y)
    }
}

/// Resolve a move of `bbox` by `delta` against `obstacles`
pub fn resolve_move(bbox: &Rect, delta: Vec2, obstacles: &[Rect]) -> MoveResult {
    let x_only = bbox.translated(Vec2::new(delta.x, 0.0));
    let y_only = bbox.translated(Vec2::new(0.0, delta.y));

    let blocked_x = obstacles.iter().any(|o| aabb_overlap(&x_only, o));
    let blocked_y = obstacles.iter().any(|o| aabb_overlap(&y_only, o));

    let x = if blocked_x { bbox.x } else { x_only.x };
    let y = if blocked_y { bbox.y } else { y_only.y };

    MoveResult {
        pos: Vec2::new(x, y),
        blocked_x,
        blocked_y,
    }
}
