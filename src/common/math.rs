//! Vector and rotation helpers.

use bevy::prelude::*;

/// Mirror `v` about the plane with unit normal `normal`.
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Rotation that turns the local `forward` axis onto `direction`.
///
/// Returns `None` when either vector is degenerate.
pub fn look_rotation(direction: Vec3, forward: Vec3) -> Option<Quat> {
    let to = direction.try_normalize()?;
    let from = forward.try_normalize()?;
    Some(Quat::from_rotation_arc(from, to))
}
