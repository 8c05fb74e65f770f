//! 2D vector helpers
//!
//! Pieces use `glam::Vec2` as their value type. The arithmetic is glam's own;
//! this module names the operations the simulation leans on and adds the few
//! that glam does not provide in the form we need (exact zero test, projection
//! that refuses a zero axis, signed length along an axis).

use glam::Vec2;

#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

#[inline]
pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

#[inline]
pub fn scale(k: f32, v: Vec2) -> Vec2 {
    k * v
}

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.dot(b)
}

#[inline]
pub fn length(v: Vec2) -> f32 {
    v.length()
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Vector projection of `v` onto the direction of `axis`.
///
/// Returns `None` when `axis` has zero length, since there is no direction
/// to project onto.
#[inline]
pub fn project_onto(v: Vec2, axis: Vec2) -> Option<Vec2> {
    let axis_len_sq = axis.dot(axis);
    if axis_len_sq == 0.0 {
        return None;
    }
    Some((v.dot(axis) / axis_len_sq) * axis)
}

/// Signed magnitude of `v` along `axis`: positive when the projection points
/// the same way as `axis`.
#[inline]
pub fn signed_length_along(v: Vec2, axis: Vec2) -> Option<f32> {
    let projected = project_onto(v, axis)?;
    let magnitude = projected.length();
    if projected.dot(axis) < 0.0 {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Exact zero test (no epsilon)
#[inline]
pub fn is_zero(v: Vec2) -> bool {
    v == Vec2::ZERO
}

/// Round both components to the nearest integer
#[inline]
pub fn round(v: Vec2) -> Vec2 {
    v.round()
}
