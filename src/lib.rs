//! Poke Logic - press-depth evaluation for XR poke interactables
//!
//! Core modules:
//! - `poke`: Evaluation engine (axis model, depth math, hover gate, contention, state store)
//! - `settings`: Threshold configuration with JSON load/save

pub mod poke;
pub mod settings;

pub use poke::{
    Bounds, ColliderShape, InteractionSample, InteractorId, PokeLogic, PokeStateSnapshot,
    ShapeTransform, SubscriptionId, TargetId,
};
pub use settings::{ConfigError, PokeAxis, PokeThresholdConfig};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Evaluation constants
pub mod consts {
    /// Clamped depth percent below which a poke counts as pressed (2.5% of travel)
    pub const DEPTH_PERCENT_ACTIVATION_THRESHOLD: f32 = 0.025;
    /// Squared attach-point speed below which velocity is treated as tracking noise (~1 cm/s)
    pub const SQUARE_VELOCITY_HOVER_THRESHOLD: f32 = 0.0001;
    /// Largest usable entrance angle (degrees); 90 would accept grazing motion
    pub const MAX_POKE_ANGLE_DEGREES: f32 = 89.9;
    /// Default entrance angle (degrees)
    pub const DEFAULT_POKE_ANGLE_DEGREES: f32 = 45.0;
    /// Interaction axis length used until geometry or an override provides one
    pub const DEFAULT_AXIS_LENGTH: f32 = 1.0;
}

/// World-space position and orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with identity rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sign of `value` with zero counted as positive
#[inline]
pub fn sign_or_positive(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Component of `v` along basis index 0 (x), 1 (y) or 2 (z)
#[inline]
pub fn component(v: Vec3, index: usize) -> f32 {
    match index {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_or_positive() {
        assert_eq!(sign_or_positive(0.0), 1.0);
        assert_eq!(sign_or_positive(-0.0), 1.0);
        assert_eq!(sign_or_positive(3.5), 1.0);
        assert_eq!(sign_or_positive(-0.001), -1.0);
    }

    #[test]
    fn test_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(component(v, 0), 1.0);
        assert_eq!(component(v, 1), 2.0);
        assert_eq!(component(v, 2), 3.0);
    }
}
