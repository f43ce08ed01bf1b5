//! Line-of-sight perception
//!
//! A target is visible when it sits inside the observer's vision cone and no
//! occluder edge crosses the segment between the two centers.

use glam::Vec2;

use super::geometry::{Rect, point_in_cone, segment_intersect};

/// Everything needed to test what an entity can see
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Eye position (entity center)
    pub center: Vec2,
    /// Facing angle (radians)
    pub facing: f32,
    /// Full field-of-view width (radians)
    pub fov: f32,
    /// Maximum sight distance
    pub range: f32,
}

/// Whether `observer` can see `target` past `occluders`
pub fn is_visible<'a, I>(observer: &Observer, target: Vec2, occluders: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    if !point_in_cone(
        target,
        observer.center,
        observer.facing,
        observer.fov,
        observer.range,
    ) {
        return false;
    }

    !occluders
        .into_iter()
        .any(|rect| blocks_segment(rect, observer.center, target))
}

/// Whether any edge of `rect` crosses the segment `from`-`to`
pub fn blocks_segment(rect: &Rect, from: Vec2, to: Vec2) -> bool {
    rect.edges()
        .iter()
        .any(|&(a, b)| segment_intersect(from, to, a, b).is_some())
}
