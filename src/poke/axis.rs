//! Interaction axis geometry
//!
//! The poke axis is a cardinal direction of the target (or the world) along
//! which press depth is measured. Its length comes from the target's collider
//! bounds: the distance from the attach origin to the far face of the bounds.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::component;
use crate::settings::PokeAxis;

/// Axis-aligned world bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    /// Half of the size on each axis
    pub extents: Vec3,
}

impl Bounds {
    pub const ZERO: Self = Self {
        center: Vec3::ZERO,
        extents: Vec3::ZERO,
    };

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            extents: size.abs() * 0.5,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.extents * 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.extents == Vec3::ZERO
    }
}

/// Principal axis a capsule's height runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapsuleDirection {
    X,
    #[default]
    Y,
    Z,
}

impl CapsuleDirection {
    fn index(&self) -> usize {
        match self {
            CapsuleDirection::X => 0,
            CapsuleDirection::Y => 1,
            CapsuleDirection::Z => 2,
        }
    }
}

/// Collider primitives the axis length can be derived from (shape-local values)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box {
        center: Vec3,
        size: Vec3,
    },
    Sphere {
        center: Vec3,
        radius: f32,
    },
    Capsule {
        center: Vec3,
        radius: f32,
        /// Full height including both caps
        height: f32,
        direction: CapsuleDirection,
    },
    /// Meshes, terrain and anything else without a closed-form bound
    Unsupported,
}

/// Placement of a collider in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl ShapeTransform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Unit axis normal for `axis`
///
/// Positive axes are negated so the normal points out of the surface toward
/// the side a poker approaches from; negative axes use the basis vector as is.
/// Unless `world_space` is set the result is rotated by `orientation`.
/// Returns zero when there is no orientation to evaluate against.
pub fn compute_axis_normal(orientation: Option<Quat>, axis: PokeAxis, world_space: bool) -> Vec3 {
    let Some(rotation) = orientation else {
        return Vec3::ZERO;
    };

    let basis = axis.basis();
    let local = if axis.is_positive() { -basis } else { basis };

    if world_space {
        local
    } else {
        (rotation * local).normalize_or_zero()
    }
}

/// Distance from `origin` to the far face of `bounds` along `axis`
///
/// Half the bounds extent on the axis plus the signed offset of the bounds
/// center from the origin, so off-center colliders are measured correctly.
pub fn compute_axis_length(bounds: &Bounds, origin: Vec3, axis: PokeAxis) -> f32 {
    let index = axis.index();
    let center_offset = bounds.center - origin;
    component(bounds.extents, index) + component(center_offset, index)
}

/// World bounds of a collider
///
/// Shape-local sizes are scaled first. With `include_rotation` the result is
/// the axis-aligned box around the rotated shape; otherwise rotation is
/// ignored entirely. Unsupported shapes give [`Bounds::ZERO`].
pub fn compute_bounds(
    shape: &ColliderShape,
    transform: &ShapeTransform,
    include_rotation: bool,
) -> Bounds {
    let scale = transform.scale.abs();

    let (local_center, scaled_size) = match *shape {
        ColliderShape::Box { center, size } => (center, size.abs() * scale),
        ColliderShape::Sphere { center, radius } => {
            // Spheres stay spheres under non-uniform scale: use the largest factor
            let diameter = radius.abs() * 2.0 * scale.max_element();
            (center, Vec3::splat(diameter))
        }
        ColliderShape::Capsule {
            center,
            radius,
            height,
            direction,
        } => {
            let long = direction.index();
            let (a, b) = match long {
                0 => (scale.y, scale.z),
                1 => (scale.x, scale.z),
                _ => (scale.x, scale.y),
            };
            let diameter = radius.abs() * 2.0 * a.max(b);
            let length = (height.abs() * component(scale, long)).max(diameter);
            let mut size = Vec3::splat(diameter);
            match long {
                0 => size.x = length,
                1 => size.y = length,
                _ => size.z = length,
            }
            (center, size)
        }
        ColliderShape::Unsupported => return Bounds::ZERO,
    };

    let scaled_center = local_center * transform.scale;
    let half = scaled_size * 0.5;

    if include_rotation {
        let m = Mat3::from_quat(transform.rotation);
        let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
        Bounds {
            center: transform.position + transform.rotation * scaled_center,
            extents: abs * half,
        }
    } else {
        Bounds {
            center: transform.position + scaled_center,
            extents: half,
        }
    }
}

/// Far end of the axis: where a fully retracted poke sits
#[inline]
pub fn axis_endpoint(origin: Vec3, axis_normal: Vec3, axis_length: f32) -> Vec3 {
    origin + axis_normal * axis_length
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_axis_sign_convention() {
        let q = Some(Quat::IDENTITY);
        assert_eq!(compute_axis_normal(q, PokeAxis::X, false), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(compute_axis_normal(q, PokeAxis::NegativeX, false), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(compute_axis_normal(q, PokeAxis::Y, false), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(compute_axis_normal(q, PokeAxis::NegativeY, false), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(compute_axis_normal(q, PokeAxis::Z, false), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(compute_axis_normal(q, PokeAxis::NegativeZ, false), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_axis_normal_follows_orientation() {
        // Quarter turn about Y maps +Z onto +X
        let q = Some(Quat::from_rotation_y(FRAC_PI_2));
        let normal = compute_axis_normal(q, PokeAxis::Z, false);
        assert!(approx(normal, Vec3::new(-1.0, 0.0, 0.0)));

        // World-space axes ignore the orientation
        let normal = compute_axis_normal(q, PokeAxis::Z, true);
        assert_eq!(normal, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_axis_normal_without_orientation() {
        assert_eq!(compute_axis_normal(None, PokeAxis::X, false), Vec3::ZERO);
        assert_eq!(compute_axis_normal(None, PokeAxis::X, true), Vec3::ZERO);
    }

    #[test]
    fn test_axis_length_centered() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::new(0.1, 0.1, 0.04));
        assert!((compute_axis_length(&bounds, Vec3::ZERO, PokeAxis::Z) - 0.02).abs() < 1e-6);
        assert!((compute_axis_length(&bounds, Vec3::ZERO, PokeAxis::X) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_axis_length_off_center() {
        // Button face at origin, body extending 0.03 behind it along +Z
        let bounds =
            Bounds::from_center_size(Vec3::new(0.0, 0.0, 0.015), Vec3::new(0.1, 0.1, 0.03));
        let length = compute_axis_length(&bounds, Vec3::ZERO, PokeAxis::NegativeZ);
        assert!((length - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_box_bounds_scaled() {
        let shape = ColliderShape::Box {
            center: Vec3::new(0.0, 0.0, 1.0),
            size: Vec3::new(1.0, 2.0, 4.0),
        };
        let transform = ShapeTransform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(2.0, -1.0, 0.5),
        };
        let bounds = compute_bounds(&shape, &transform, false);
        assert!(approx(bounds.center, Vec3::new(10.0, 0.0, 0.5)));
        assert!(approx(bounds.size(), Vec3::new(2.0, 2.0, 2.0)));
    }

    #[test]
    fn test_box_bounds_rotated() {
        let shape = ColliderShape::Box {
            center: Vec3::ZERO,
            size: Vec3::new(4.0, 1.0, 2.0),
        };
        let transform = ShapeTransform {
            rotation: Quat::from_rotation_y(FRAC_PI_2),
            ..Default::default()
        };
        let rotated = compute_bounds(&shape, &transform, true);
        assert!(approx(rotated.size(), Vec3::new(2.0, 1.0, 4.0)));

        let unrotated = compute_bounds(&shape, &transform, false);
        assert!(approx(unrotated.size(), Vec3::new(4.0, 1.0, 2.0)));
    }

    #[test]
    fn test_sphere_bounds() {
        let shape = ColliderShape::Sphere {
            center: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.5,
        };
        let transform = ShapeTransform {
            scale: Vec3::new(1.0, 3.0, 2.0),
            ..Default::default()
        };
        let bounds = compute_bounds(&shape, &transform, false);
        assert!(approx(bounds.center, Vec3::new(0.0, 3.0, 0.0)));
        assert!(approx(bounds.size(), Vec3::splat(3.0)));
    }

    #[test]
    fn test_capsule_bounds_per_direction() {
        for (direction, expected) in [
            (CapsuleDirection::X, Vec3::new(2.0, 0.5, 0.5)),
            (CapsuleDirection::Y, Vec3::new(0.5, 2.0, 0.5)),
            (CapsuleDirection::Z, Vec3::new(0.5, 0.5, 2.0)),
        ] {
            let shape = ColliderShape::Capsule {
                center: Vec3::ZERO,
                radius: 0.25,
                height: 2.0,
                direction,
            };
            let bounds = compute_bounds(&shape, &ShapeTransform::default(), false);
            assert!(approx(bounds.size(), expected), "{direction:?}: {:?}", bounds.size());
        }
    }

    #[test]
    fn test_short_capsule_is_a_sphere() {
        let shape = ColliderShape::Capsule {
            center: Vec3::ZERO,
            radius: 0.5,
            height: 0.2,
            direction: CapsuleDirection::Y,
        };
        let bounds = compute_bounds(&shape, &ShapeTransform::default(), false);
        assert!(approx(bounds.size(), Vec3::ONE));
    }

    #[test]
    fn test_unsupported_shape() {
        let bounds = compute_bounds(&ColliderShape::Unsupported, &ShapeTransform::default(), true);
        assert_eq!(bounds, Bounds::ZERO);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_axis_endpoint() {
        let end = axis_endpoint(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.5);
        assert!(approx(end, Vec3::new(1.0, 0.0, -0.5)));
    }

    proptest! {
        #[test]
        fn prop_axis_normal_is_unit(
            yaw in -3.1f32..3.1,
            pitch in -1.5f32..1.5,
            axis_index in 0usize..6,
        ) {
            let q = Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, 0.0);
            let normal = compute_axis_normal(Some(q), PokeAxis::ALL[axis_index], false);
            prop_assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }
}
