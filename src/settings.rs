//! Poke threshold configuration
//!
//! Persisted as JSON alongside the interactable that owns it.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_POKE_ANGLE_DEGREES, MAX_POKE_ANGLE_DEGREES};

/// Cardinal axis along which press depth is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PokeAxis {
    X,
    Y,
    #[default]
    Z,
    NegativeX,
    NegativeY,
    NegativeZ,
}

impl PokeAxis {
    pub const ALL: [PokeAxis; 6] = [
        PokeAxis::X,
        PokeAxis::Y,
        PokeAxis::Z,
        PokeAxis::NegativeX,
        PokeAxis::NegativeY,
        PokeAxis::NegativeZ,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PokeAxis::X => "X",
            PokeAxis::Y => "Y",
            PokeAxis::Z => "Z",
            PokeAxis::NegativeX => "-X",
            PokeAxis::NegativeY => "-Y",
            PokeAxis::NegativeZ => "-Z",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "x" | "+x" => Some(PokeAxis::X),
            "y" | "+y" => Some(PokeAxis::Y),
            "z" | "+z" => Some(PokeAxis::Z),
            "-x" | "negativex" => Some(PokeAxis::NegativeX),
            "-y" | "negativey" => Some(PokeAxis::NegativeY),
            "-z" | "negativez" => Some(PokeAxis::NegativeZ),
            _ => None,
        }
    }

    /// Basis index (0 = x, 1 = y, 2 = z), ignoring sign
    pub fn index(&self) -> usize {
        match self {
            PokeAxis::X | PokeAxis::NegativeX => 0,
            PokeAxis::Y | PokeAxis::NegativeY => 1,
            PokeAxis::Z | PokeAxis::NegativeZ => 2,
        }
    }

    /// Whether this is one of the three positive axes
    pub fn is_positive(&self) -> bool {
        matches!(self, PokeAxis::X | PokeAxis::Y | PokeAxis::Z)
    }

    /// Unsigned unit basis vector for the axis
    pub fn basis(&self) -> Vec3 {
        match self.index() {
            0 => Vec3::X,
            1 => Vec3::Y,
            _ => Vec3::Z,
        }
    }
}

/// Errors raised while loading or saving a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Thresholds a poke must satisfy before it counts as a press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokeThresholdConfig {
    /// Axis the poker travels along into the surface
    pub poke_direction: PokeAxis,
    /// Extra distance added to the poker's own offset (meters)
    pub interaction_depth_offset: f32,
    /// Require approach velocity to line up with the axis before a hover arms
    pub enable_poke_angle_threshold: bool,
    /// Maximum angle (degrees) between approach direction and the axis
    pub poke_angle_threshold: f32,
    /// Treat `poke_direction` as a world axis instead of target-local
    pub world_space_axis: bool,
}

impl Default for PokeThresholdConfig {
    fn default() -> Self {
        Self {
            poke_direction: PokeAxis::Z,
            interaction_depth_offset: 0.0,
            enable_poke_angle_threshold: true,
            poke_angle_threshold: DEFAULT_POKE_ANGLE_DEGREES,
            world_space_axis: false,
        }
    }
}

impl PokeThresholdConfig {
    /// Config for `axis` with all other fields at their defaults
    pub fn with_axis(axis: PokeAxis) -> Self {
        Self {
            poke_direction: axis,
            ..Self::default()
        }
    }

    /// Cosine of the entrance angle; `dot(-velocity_dir, axis)` must exceed this
    pub fn select_entrance_vector_dot_threshold(&self) -> f32 {
        let angle = self.poke_angle_threshold.clamp(0.0, MAX_POKE_ANGLE_DEGREES);
        angle.to_radians().cos()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded poke config from {} (axis {})",
            path.display(),
            config.poke_direction.as_str()
        );
        Ok(config)
    }

    /// Save config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Poke config saved to {}", path.display());
        Ok(())
    }
}
