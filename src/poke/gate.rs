//! Hover arming gate
//!
//! Filters tracking jitter and grazing touches: a hover only starts counting
//! toward a press once the poker is in front of the surface and moving into
//! it within the configured entrance angle. Once armed the decision is
//! latched until the hysteresis rule releases it.

use glam::Vec3;

use super::depth::PokeParams;
use crate::consts::SQUARE_VELOCITY_HOVER_THRESHOLD;
use crate::settings::PokeThresholdConfig;

/// Angle/velocity gate derived from a threshold config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverGate {
    enabled: bool,
    /// Cosine of the entrance angle
    entrance_dot_threshold: f32,
}

impl HoverGate {
    pub fn new(enabled: bool, entrance_dot_threshold: f32) -> Self {
        Self {
            enabled,
            entrance_dot_threshold,
        }
    }

    pub fn from_config(config: &PokeThresholdConfig) -> Self {
        Self::new(
            config.enable_poke_angle_threshold,
            config.select_entrance_vector_dot_threshold(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn entrance_dot_threshold(&self) -> f32 {
        self.entrance_dot_threshold
    }

    /// Whether the hover is armed this tick
    ///
    /// `holding` is the interactor's latched flag. It is read to skip
    /// re-checking and written with the fresh decision whenever a check runs.
    /// Interactors without velocity data cannot be gated: they are armed for
    /// this tick but nothing is latched, so later velocity data is checked.
    pub fn evaluate(
        &self,
        holding: &mut bool,
        params: &PokeParams,
        velocity: Option<Vec3>,
        axis_normal: Vec3,
    ) -> bool {
        if !self.enabled {
            return true;
        }
        if *holding {
            return true;
        }

        let Some(velocity) = velocity else {
            return true;
        };
        let armed = self.approach_qualifies(params, velocity, axis_normal);
        *holding = armed;
        armed
    }

    fn approach_qualifies(&self, params: &PokeParams, velocity: Vec3, axis_normal: Vec3) -> bool {
        if !params.is_over_surface() {
            return false;
        }
        if velocity.length_squared() <= SQUARE_VELOCITY_HOVER_THRESHOLD {
            return false;
        }
        let approach = -velocity.normalize();
        approach.dot(axis_normal) > self.entrance_dot_threshold
    }
}

impl Default for HoverGate {
    fn default() -> Self {
        Self::from_config(&PokeThresholdConfig::default())
    }
}
