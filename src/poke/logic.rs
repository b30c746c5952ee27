//! Poke evaluation engine
//!
//! One [`PokeLogic`] serves one pokable interactable. The host forwards hover
//! enter/exit events and calls [`PokeLogic::evaluate`] once per hovering
//! interactor per tick, or [`PokeLogic::evaluate_tick`] with every sample of
//! the tick for an order-independent result.

use glam::Vec3;

use super::axis::{
    ColliderShape, ShapeTransform, axis_endpoint, compute_axis_length, compute_axis_normal,
    compute_bounds,
};
use super::contention::{
    PublishDecision, Requirements, decide_requirements, deepest_sibling, publish_decision,
    record_requirements,
};
use super::depth::{
    compute_axis_aligned_point, compute_depth_percent, compute_interaction_point,
    compute_poke_params,
};
use super::gate::HoverGate;
use super::state::{
    Departure, InteractorId, PokeStateSnapshot, PokeStateStore, SubscriptionId, TargetId,
};
use crate::Pose;
use crate::consts::DEFAULT_AXIS_LENGTH;
use crate::settings::PokeThresholdConfig;

/// Positions reported for one interactor on one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSample {
    pub interactor: InteractorId,
    pub target: TargetId,
    /// Attach point of the poker (fingertip)
    pub poker_attach_position: Vec3,
    /// Attach point of the pokable surface
    pub pokable_attach_position: Vec3,
    /// Poker's own contact offset (e.g. fingertip radius)
    pub poke_offset: f32,
    /// Attach-point velocity, for interactors that can report one
    pub velocity: Option<Vec3>,
}

impl InteractionSample {
    pub fn new(interactor: InteractorId, target: TargetId, poker: Vec3, pokable: Vec3) -> Self {
        Self {
            interactor,
            target,
            poker_attach_position: poker,
            pokable_attach_position: pokable,
            poke_offset: 0.0,
            velocity: None,
        }
    }

    pub fn with_offset(mut self, poke_offset: f32) -> Self {
        self.poke_offset = poke_offset;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

/// Measured but not yet published result
#[derive(Debug, Clone, Copy)]
struct Evaluation {
    interactor: InteractorId,
    requirements: Requirements,
    snapshot: PokeStateSnapshot,
}

/// Poke evaluation for a single interactable
#[derive(Debug)]
pub struct PokeLogic {
    config: Option<PokeThresholdConfig>,
    gate: HoverGate,
    /// Attach pose the axis is evaluated against
    reference: Option<Pose>,
    axis_length: f32,
    store: PokeStateStore,
}

impl Default for PokeLogic {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeLogic {
    /// Uninitialized engine; evaluates nothing until [`initialize`](Self::initialize)
    pub fn new() -> Self {
        Self {
            config: None,
            gate: HoverGate::default(),
            reference: None,
            axis_length: DEFAULT_AXIS_LENGTH,
            store: PokeStateStore::new(),
        }
    }

    /// Engine initialized without collider geometry
    pub fn with_config(reference: Pose, config: PokeThresholdConfig) -> Self {
        let mut logic = Self::new();
        logic.initialize(reference, config, None);
        logic
    }

    /// Bind the engine to a reference pose and thresholds
    ///
    /// With a collider the axis length is measured from its bounds. A
    /// collider without usable bounds keeps the current length; use
    /// [`set_poke_depth`](Self::set_poke_depth) to provide one.
    pub fn initialize(
        &mut self,
        reference: Pose,
        config: PokeThresholdConfig,
        collider: Option<(&ColliderShape, &ShapeTransform)>,
    ) {
        self.gate = HoverGate::from_config(&config);

        if let Some((shape, transform)) = collider {
            let bounds = compute_bounds(shape, transform, true);
            if bounds.is_empty() {
                log::warn!(
                    "Collider {:?} has no usable bounds, keeping axis length {}",
                    shape,
                    self.axis_length
                );
            } else {
                let length =
                    compute_axis_length(&bounds, reference.position, config.poke_direction);
                if length <= 0.0 {
                    log::warn!(
                        "Collider bounds give non-positive axis length {} along {}",
                        length,
                        config.poke_direction.as_str()
                    );
                }
                self.axis_length = length;
            }
        }

        log::debug!(
            "Poke logic initialized: axis {}, length {}, angle gate {}",
            config.poke_direction.as_str(),
            self.axis_length,
            if self.gate.is_enabled() { "on" } else { "off" }
        );

        self.config = Some(config);
        self.reference = Some(reference);
        self.reset_poke_state(reference.position);
    }

    /// Release all state; the engine must be initialized again before use
    pub fn dispose(&mut self) {
        self.store.clear();
        self.store.publish(PokeStateSnapshot::default());
        self.config = None;
        self.reference = None;
    }

    /// Move the reference pose (the interactable moved)
    pub fn set_reference_pose(&mut self, reference: Pose) {
        self.reference = Some(reference);
    }

    pub fn reference_pose(&self) -> Option<Pose> {
        self.reference
    }

    pub fn config(&self) -> Option<&PokeThresholdConfig> {
        self.config.as_ref()
    }

    /// Override the geometry-derived axis length (flat UI surfaces etc.)
    pub fn set_poke_depth(&mut self, poke_depth: f32) {
        if !(poke_depth > 0.0 && poke_depth.is_finite()) {
            log::warn!("Poke depth {} is degenerate; pokes will never select", poke_depth);
        }
        log::debug!("Poke depth overridden: {} -> {}", self.axis_length, poke_depth);
        self.axis_length = poke_depth;
    }

    pub fn interaction_axis_length(&self) -> f32 {
        self.axis_length
    }

    /// Current world axis normal; zero before initialization
    pub fn axis_normal(&self) -> Vec3 {
        match (&self.config, self.reference) {
            (Some(config), Some(reference)) => compute_axis_normal(
                Some(reference.rotation),
                config.poke_direction,
                config.world_space_axis,
            ),
            _ => Vec3::ZERO,
        }
    }

    /// Latest published state
    pub fn poke_state(&self) -> PokeStateSnapshot {
        self.store.snapshot()
    }

    /// Call `observer` whenever the published state changes
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PokeStateSnapshot) + Send + 'static,
    {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn store(&self) -> &PokeStateStore {
        &self.store
    }

    pub fn is_hovering(&self, interactor: InteractorId) -> bool {
        self.store.is_hovering(interactor)
    }

    pub fn hovered_target(&self, interactor: InteractorId) -> Option<TargetId> {
        self.store.history(interactor).map(|h| h.target)
    }

    pub fn hovered_interactors(&self, target: TargetId) -> Vec<InteractorId> {
        self.store.hovered_interactors(target)
    }

    pub fn last_depth_percent(&self, interactor: InteractorId) -> Option<f32> {
        self.store.last_depth_percent(interactor)
    }

    /// Start tracking `interactor` hovering `target` at attach pose `pose`
    pub fn on_hover_entered(&mut self, interactor: InteractorId, pose: Pose, target: TargetId) {
        log::debug!("Hover entered: interactor {} -> target {}", interactor.0, target.0);
        if let Some(departure) = self.store.register(interactor, pose, target) {
            self.handle_departure(departure);
        }
    }

    /// Stop tracking `interactor`; safe to call when it is not hovering
    pub fn on_hover_exited(&mut self, interactor: InteractorId) {
        let Some(departure) = self.store.remove(interactor) else {
            return;
        };
        log::debug!(
            "Hover exited: interactor {} <- target {}",
            interactor.0,
            departure.target.0
        );
        self.handle_departure(departure);
    }

    /// Evaluate one sample and publish the result
    ///
    /// Returns whether the poke meets the select requirements. Returns false
    /// without touching any state when the engine is not initialized or the
    /// interactor is not hovering `sample.target`. Siblings on the same
    /// target are compared at their last recorded depth, which is this tick's
    /// value only if they were evaluated earlier in the tick.
    pub fn evaluate(&mut self, sample: &InteractionSample) -> bool {
        match self.measure(sample) {
            Some(evaluation) => self.resolve(&evaluation),
            None => false,
        }
    }

    /// Evaluate every sample of a tick
    ///
    /// Samples are processed in interactor id order. All depths are measured
    /// and recorded before any contention check runs, so siblings are always
    /// compared at their current-tick depth. Results are returned in the
    /// processing order.
    pub fn evaluate_tick(&mut self, samples: &[InteractionSample]) -> Vec<(InteractorId, bool)> {
        let mut ordered: Vec<&InteractionSample> = samples.iter().collect();
        ordered.sort_by_key(|s| s.interactor);

        let measured: Vec<(InteractorId, Option<Evaluation>)> = ordered
            .into_iter()
            .map(|sample| (sample.interactor, self.measure(sample)))
            .collect();

        measured
            .into_iter()
            .map(|(interactor, evaluation)| {
                let met = evaluation.is_some_and(|e| self.resolve(&e));
                (interactor, met)
            })
            .collect()
    }

    /// Geometry, gate and press decision; records history but publishes nothing
    fn measure(&mut self, sample: &InteractionSample) -> Option<Evaluation> {
        let config = self.config.as_ref()?;
        self.reference?;
        if self.store.history(sample.interactor)?.target != sample.target {
            return None;
        }

        let combined_offset = sample.poke_offset + config.interaction_depth_offset;
        let axis_normal = self.axis_normal();
        let interaction_point =
            compute_interaction_point(sample.poker_attach_position, axis_normal, combined_offset);
        let params =
            compute_poke_params(interaction_point, sample.pokable_attach_position, axis_normal);

        let gate = self.gate;
        let axis_length = self.axis_length;
        let history = self.store.history_mut(sample.interactor)?;

        let armed =
            gate.evaluate(&mut history.holding_hover, &params, sample.velocity, axis_normal);
        let depth_percent = if axis_length > 0.0 && axis_length.is_finite() {
            compute_depth_percent(params.depth, params.entrance_dot, axis_length)
        } else {
            1.0
        };
        let requirements = decide_requirements(armed, depth_percent);
        record_requirements(history, &requirements);

        let travel = if axis_length.is_finite() { axis_length.max(0.0) } else { 0.0 };
        let axis_aligned_interaction_point = compute_axis_aligned_point(
            sample.pokable_attach_position,
            axis_normal,
            requirements.clamped_depth_percent,
            travel,
        );

        let snapshot = PokeStateSnapshot {
            meets_requirements: requirements.meets_requirements,
            interaction_point,
            axis_aligned_interaction_point,
            interaction_strength: requirements.interaction_strength(),
            axis_normal,
            target: Some(sample.target),
        };
        history.last_snapshot = Some(snapshot);

        Some(Evaluation {
            interactor: sample.interactor,
            requirements,
            snapshot,
        })
    }

    /// Contention check and publish
    fn resolve(&mut self, evaluation: &Evaluation) -> bool {
        let Some(target) = evaluation.snapshot.target else {
            return false;
        };
        let interactor = evaluation.interactor;
        match publish_decision(&self.store, interactor, target, &evaluation.requirements) {
            PublishDecision::Publish => self.store.publish_from(interactor, evaluation.snapshot),
            PublishDecision::Suppress => {}
            PublishDecision::HandOver(sibling) => {
                if !self.publish_last(sibling) {
                    self.store.publish_from(interactor, evaluation.snapshot);
                }
            }
        }
        evaluation.requirements.meets_requirements
    }

    /// Republish the last evaluation of `interactor`; false if it has none
    fn publish_last(&mut self, interactor: InteractorId) -> bool {
        let Some(snapshot) = self.store.history(interactor).and_then(|h| h.last_snapshot) else {
            return false;
        };
        log::trace!("Published state handed over to interactor {}", interactor.0);
        self.store.publish_from(interactor, snapshot);
        true
    }

    fn handle_departure(&mut self, departure: Departure) {
        if self.store.owner() == Some(departure.interactor) {
            // The published state belonged to the leaver
            let handed_over = deepest_sibling(&self.store, departure.interactor, departure.target)
                .is_some_and(|(sibling, _)| self.publish_last(sibling));
            if !handed_over {
                self.reset_poke_state(departure.target_pose.position);
            }
            return;
        }
        if !departure.target_emptied {
            return;
        }
        let published_here = self
            .store
            .snapshot()
            .target
            .is_none_or(|target| target == departure.target);
        if published_here || self.store.hovered_target_count() == 0 {
            self.reset_poke_state(departure.target_pose.position);
        }
    }

    /// Publish the neutral state parked at the far end of the axis from `origin`
    fn reset_poke_state(&mut self, origin: Vec3) {
        let endpoint = axis_endpoint(origin, self.axis_normal(), self.axis_length);
        log::debug!("Poke state reset at {:?}", endpoint);
        self.store.publish(PokeStateSnapshot::neutral(endpoint));
    }
}
