//! Geometry kernel
//!
//! Pure functions over points and axis-aligned rectangles. World coordinates
//! use a top-left origin with +y pointing down, so angles grow clockwise on
//! screen.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (top-left corner plus extent)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle shifted by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// The four edges as segments: top, bottom, left, right
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.x, self.y);
        let tr = Vec2::new(self.right(), self.y);
        let bl = Vec2::new(self.x, self.bottom());
        let br = Vec2::new(self.right(), self.bottom());
        [(tl, tr), (bl, br), (tl, bl), (tr, br)]
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: Vec2) -> Self {
        Self::new(
            self.x - margin.x,
            self.y - margin.y,
            self.width + 2.0 * margin.x,
            self.height + 2.0 * margin.y,
        )
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Bearing from `a` to `b` in radians
#[inline]
pub fn angle_to(a: Vec2, b: Vec2) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed angular difference `to - from` wrapped into (-π, π]
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    let mut diff = normalize_angle(to) - normalize_angle(from);
    if diff > PI {
        diff -= TAU;
    } else if diff <= -PI {
        diff += TAU;
    }
    diff
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Strict AABB overlap test. Touching edges do not overlap.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.right() && a.right() > b.x;
    let y_overlap = a.y < b.bottom() && a.bottom() > b.y;
    x_overlap && y_overlap
}

/// Intersection point of segments p1-p2 and p3-p4
///
/// Parallel (and therefore degenerate or collinear) segments never intersect.
pub fn segment_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let d12 = p2 - p1;
    let d34 = p4 - p3;
    let denominator = d34.y * d12.x - d34.x * d12.y;
    if denominator == 0.0 {
        return None;
    }

    let d31 = p1 - p3;
    let ua = (d34.x * d31.y - d34.y * d31.x) / denominator;
    let ub = (d12.x * d31.y - d12.y * d31.x) / denominator;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(p1 + d12 * ua)
    } else {
        None
    }
}

/// Whether `target` lies within a vision cone
///
/// The cone is centered on `origin`, opens `fov` radians wide around `facing`
/// and reaches `range` units (inclusive). A target on the origin is never
/// inside.
pub fn point_in_cone(target: Vec2, origin: Vec2, facing: f32, fov: f32, range: f32) -> bool {
    let dist = distance(origin, target);
    if dist == 0.0 || dist > range {
        return false;
    }
    let bearing = angle_to(origin, target);
    angle_diff(facing, bearing).abs() <= fov / 2.0
}
