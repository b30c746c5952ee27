//! Press-depth geometry
//!
//! Pure, allocation-free functions evaluated once per interactor per tick.

use glam::Vec3;

use crate::sign_or_positive;

/// Raw geometry of one interaction point against the pokable surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PokeParams {
    /// Distance from the pokable attach point along the axis (unsigned)
    pub depth: f32,
    /// Alignment of the axis with the direction from surface to point.
    /// Positive means the point is on the entry side.
    pub entrance_dot: f32,
}

impl PokeParams {
    #[inline]
    pub fn is_over_surface(&self) -> bool {
        self.entrance_dot > 0.0
    }
}

/// Point used for depth measurement: the poker pushed back along the axis by the combined offset
#[inline]
pub fn compute_interaction_point(
    poker_position: Vec3,
    axis_normal: Vec3,
    combined_offset: f32,
) -> Vec3 {
    poker_position - axis_normal * combined_offset
}

/// Depth along the axis and entrance alignment of `interaction_point`
#[inline]
pub fn compute_poke_params(
    interaction_point: Vec3,
    pokable_attach_position: Vec3,
    axis_normal: Vec3,
) -> PokeParams {
    let to_point = interaction_point - pokable_attach_position;
    let projected = axis_normal * to_point.dot(axis_normal);
    PokeParams {
        depth: projected.length(),
        entrance_dot: axis_normal.dot(to_point.normalize_or_zero()),
    }
}

/// Signed depth as a fraction of the axis length
///
/// Negative when the point is behind the surface. Divides as written: a zero
/// `axis_length` yields an infinite or NaN result the caller must guard.
#[inline]
pub fn compute_depth_percent(depth: f32, entrance_dot: f32, axis_length: f32) -> f32 {
    sign_or_positive(entrance_dot) * depth / axis_length
}

/// Interaction point projected onto the axis line, clamped to the axis span
#[inline]
pub fn compute_axis_aligned_point(
    pokable_attach_position: Vec3,
    axis_normal: Vec3,
    clamped_depth_percent: f32,
    axis_length: f32,
) -> Vec3 {
    pokable_attach_position + axis_normal * (clamped_depth_percent * axis_length)
}
