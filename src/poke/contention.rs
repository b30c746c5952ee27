//! Press decision and multi-interactor arbitration
//!
//! Turns a signed depth percent into a pressed/not-pressed decision, applies
//! the release hysteresis to the hover latch, and decides whether a result
//! may overwrite the published snapshot while other interactors poke the
//! same target.

use super::state::{InteractorHistory, InteractorId, PokeStateStore, TargetId};
use crate::consts::DEPTH_PERCENT_ACTIVATION_THRESHOLD;

/// Press decision for one interactor on one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Requirements {
    /// Depth percent in `[0, 1]`; 1 when the gate is not armed
    pub clamped_depth_percent: f32,
    pub meets_requirements: bool,
}

impl Requirements {
    /// Published strength: higher the further the poke is pressed
    #[inline]
    pub fn interaction_strength(&self) -> f32 {
        1.0 - self.clamped_depth_percent
    }
}

/// Clamp the depth percent and compare it with the activation threshold
///
/// An unarmed gate forces the poke to read as fully retracted so ungated
/// jitter can never register. Non-finite depths read as retracted as well.
pub fn decide_requirements(armed: bool, depth_percent: f32) -> Requirements {
    let clamped_depth_percent = if armed && depth_percent.is_finite() {
        depth_percent.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Requirements {
        clamped_depth_percent,
        meets_requirements: armed && clamped_depth_percent < DEPTH_PERCENT_ACTIVATION_THRESHOLD,
    }
}

/// Store the decision in the interactor's history
///
/// Leaving the pressed state releases the hover latch so the gate has to be
/// passed again before the next press.
pub fn record_requirements(history: &mut InteractorHistory, requirements: &Requirements) {
    if history.requirements_met && !requirements.meets_requirements {
        history.holding_hover = false;
    }
    history.requirements_met = requirements.meets_requirements;
    history.last_depth_percent = requirements.clamped_depth_percent;
}

/// Deepest interactor on `target` other than `interactor`, by recorded depth
pub fn deepest_sibling(
    store: &PokeStateStore,
    interactor: InteractorId,
    target: TargetId,
) -> Option<(InteractorId, f32)> {
    let hovered = store.hovered(target)?;
    hovered
        .interactors()
        .filter(|&other| other != interactor)
        .filter_map(|other| store.last_depth_percent(other).map(|depth| (other, depth)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Deepest other interactor on `target` whose recorded depth is strictly
/// below `clamped_depth_percent`
pub fn deeper_sibling(
    store: &PokeStateStore,
    interactor: InteractorId,
    target: TargetId,
    clamped_depth_percent: f32,
) -> Option<InteractorId> {
    deepest_sibling(store, interactor, target)
        .filter(|&(_, depth)| depth < clamped_depth_percent)
        .map(|(other, _)| other)
}

/// What to do with one evaluation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDecision {
    Publish,
    /// A deeper sibling owns the published snapshot; keep it
    Suppress,
    /// The releasing interactor owns the published snapshot but a sibling is
    /// deeper; publish the sibling's last result instead
    HandOver(InteractorId),
}

/// Whether this result may replace the published snapshot
///
/// A release never overwrites the state of a deeper interactor on the same
/// target, and never leaves the releasing interactor's own pressed state
/// published.
pub fn publish_decision(
    store: &PokeStateStore,
    interactor: InteractorId,
    target: TargetId,
    requirements: &Requirements,
) -> PublishDecision {
    if requirements.meets_requirements {
        return PublishDecision::Publish;
    }
    let depth = requirements.clamped_depth_percent;
    let Some(deeper) = deeper_sibling(store, interactor, target, depth) else {
        return PublishDecision::Publish;
    };

    match store.owner() {
        Some(owner) if owner == interactor => PublishDecision::HandOver(deeper),
        Some(owner)
            if store
                .history(owner)
                .is_some_and(|h| h.target == target && h.last_depth_percent < depth) =>
        {
            log::trace!(
                "Interactor {} release suppressed: {} is deeper on target {}",
                interactor.0,
                owner.0,
                target.0
            );
            PublishDecision::Suppress
        }
        _ => PublishDecision::Publish,
    }
}
