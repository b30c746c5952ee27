//! Poke evaluation module
//!
//! Everything here runs on the host's update loop, once per interactor per tick:
//! - Pure math only in `axis` and `depth`
//! - No panics or errors on the evaluation path; degenerate input yields safe defaults
//! - Stable iteration order (by interactor/target id)

pub mod axis;
pub mod contention;
pub mod depth;
pub mod gate;
pub mod logic;
pub mod state;

pub use axis::{
    Bounds, CapsuleDirection, ColliderShape, ShapeTransform, axis_endpoint, compute_axis_length,
    compute_axis_normal, compute_bounds,
};
pub use contention::{
    PublishDecision, Requirements, decide_requirements, deeper_sibling, deepest_sibling,
    publish_decision, record_requirements,
};
pub use depth::{
    PokeParams, compute_axis_aligned_point, compute_depth_percent, compute_interaction_point,
    compute_poke_params,
};
pub use gate::HoverGate;
pub use logic::{InteractionSample, PokeLogic};
pub use state::{
    Departure, HoveredTarget, InteractorHistory, InteractorId, PokeStateSnapshot, PokeStateStore,
    SubscriptionId, TargetId,
};
