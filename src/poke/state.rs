//! Poke state store
//!
//! Owns all per-interactor history, the per-target hovered sets and the
//! published snapshot. Maps are ordered by id so iteration is stable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Pose;

/// Handle of an interactor (finger, controller tip) managed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractorId(pub u32);

/// Handle of a pokable surface; several targets may share one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Handle returned by [`PokeStateStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u32);

/// Published result of the latest evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PokeStateSnapshot {
    /// Whether the poke is deep enough to select
    pub meets_requirements: bool,
    /// Poker position offset back along the axis
    pub interaction_point: Vec3,
    /// Interaction point projected onto the axis line
    pub axis_aligned_interaction_point: Vec3,
    /// 1 when fully pressed, 0 when fully retracted
    pub interaction_strength: f32,
    pub axis_normal: Vec3,
    pub target: Option<TargetId>,
}

impl PokeStateSnapshot {
    /// Nothing poking: both points parked at `axis_endpoint`
    pub fn neutral(axis_endpoint: Vec3) -> Self {
        Self {
            meets_requirements: false,
            interaction_point: axis_endpoint,
            axis_aligned_interaction_point: axis_endpoint,
            interaction_strength: 0.0,
            axis_normal: Vec3::ZERO,
            target: None,
        }
    }
}

impl Default for PokeStateSnapshot {
    fn default() -> Self {
        Self::neutral(Vec3::ZERO)
    }
}

/// What the engine remembers about one hovering interactor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractorHistory {
    /// Target the interactor is hovering
    pub target: TargetId,
    /// Target attach pose captured at hover enter
    pub enter_pose: Pose,
    /// Clamped depth percent from the last evaluation (1 = retracted)
    pub last_depth_percent: f32,
    /// Latched hover gate
    pub holding_hover: bool,
    /// Requirements result of the last evaluation
    pub requirements_met: bool,
    /// Snapshot built by the last evaluation, published or not
    pub last_snapshot: Option<PokeStateSnapshot>,
}

impl InteractorHistory {
    fn new(target: TargetId, enter_pose: Pose) -> Self {
        Self {
            target,
            enter_pose,
            last_depth_percent: 1.0,
            holding_hover: false,
            requirements_met: false,
            last_snapshot: None,
        }
    }
}

/// Interactors hovering one target
#[derive(Debug, Clone, PartialEq)]
pub struct HoveredTarget {
    /// Attach pose of the target when it was last entered
    pub pose: Pose,
    interactors: BTreeSet<InteractorId>,
}

impl HoveredTarget {
    pub fn interactors(&self) -> impl Iterator<Item = InteractorId> + '_ {
        self.interactors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.interactors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactors.is_empty()
    }
}

/// Result of removing an interactor from the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    pub interactor: InteractorId,
    pub target: TargetId,
    /// Pose of the target the interactor left
    pub target_pose: Pose,
    /// No interactor hovers that target anymore
    pub target_emptied: bool,
}

type Observer = Box<dyn FnMut(&PokeStateSnapshot) + Send>;

/// History maps plus the published snapshot
pub struct PokeStateStore {
    history: BTreeMap<InteractorId, InteractorHistory>,
    hovered: BTreeMap<TargetId, HoveredTarget>,
    snapshot: PokeStateSnapshot,
    /// Interactor whose evaluation is published; `None` for neutral states
    owner: Option<InteractorId>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u32,
}

impl Default for PokeStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PokeStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PokeStateStore")
            .field("history", &self.history)
            .field("hovered", &self.hovered)
            .field("snapshot", &self.snapshot)
            .field("owner", &self.owner)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PokeStateStore {
    pub fn new() -> Self {
        Self {
            history: BTreeMap::new(),
            hovered: BTreeMap::new(),
            snapshot: PokeStateSnapshot::default(),
            owner: None,
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Start tracking `interactor` on `target`
    ///
    /// An interactor already hovering another target is moved; the departure
    /// from the old target is returned so the caller can reset if needed.
    pub fn register(
        &mut self,
        interactor: InteractorId,
        pose: Pose,
        target: TargetId,
    ) -> Option<Departure> {
        let moved = self
            .history
            .get(&interactor)
            .is_some_and(|previous| previous.target != target);
        let departure = if moved { self.remove(interactor) } else { None };

        self.history.insert(interactor, InteractorHistory::new(target, pose));
        let entry = self.hovered.entry(target).or_insert_with(|| HoveredTarget {
            pose,
            interactors: BTreeSet::new(),
        });
        entry.pose = pose;
        entry.interactors.insert(interactor);

        departure
    }

    /// Stop tracking `interactor`; `None` if it was not tracked
    pub fn remove(&mut self, interactor: InteractorId) -> Option<Departure> {
        let history = self.history.remove(&interactor)?;
        let target = history.target;

        let (target_pose, target_emptied) = match self.hovered.get_mut(&target) {
            Some(hovered) => {
                hovered.interactors.remove(&interactor);
                let pose = hovered.pose;
                let emptied = hovered.is_empty();
                if emptied {
                    self.hovered.remove(&target);
                }
                (pose, emptied)
            }
            None => (history.enter_pose, true),
        };

        Some(Departure {
            interactor,
            target,
            target_pose,
            target_emptied,
        })
    }

    pub fn history(&self, interactor: InteractorId) -> Option<&InteractorHistory> {
        self.history.get(&interactor)
    }

    pub fn history_mut(&mut self, interactor: InteractorId) -> Option<&mut InteractorHistory> {
        self.history.get_mut(&interactor)
    }

    pub fn is_hovering(&self, interactor: InteractorId) -> bool {
        self.history.contains_key(&interactor)
    }

    pub fn last_depth_percent(&self, interactor: InteractorId) -> Option<f32> {
        self.history.get(&interactor).map(|h| h.last_depth_percent)
    }

    pub fn hovered(&self, target: TargetId) -> Option<&HoveredTarget> {
        self.hovered.get(&target)
    }

    /// Interactors hovering `target`, in id order
    pub fn hovered_interactors(&self, target: TargetId) -> Vec<InteractorId> {
        self.hovered
            .get(&target)
            .map(|h| h.interactors().collect())
            .unwrap_or_default()
    }

    /// Number of targets with at least one hovering interactor
    pub fn hovered_target_count(&self) -> usize {
        self.hovered.len()
    }

    /// Copy of the published snapshot
    pub fn snapshot(&self) -> PokeStateSnapshot {
        self.snapshot
    }

    /// Interactor the published snapshot came from
    pub fn owner(&self) -> Option<InteractorId> {
        self.owner
    }

    /// Publish a snapshot that belongs to no interactor (neutral, reset)
    pub fn publish(&mut self, snapshot: PokeStateSnapshot) {
        self.owner = None;
        self.notify(snapshot);
    }

    /// Publish the evaluation of `interactor`
    pub fn publish_from(&mut self, interactor: InteractorId, snapshot: PokeStateSnapshot) {
        self.owner = Some(interactor);
        self.notify(snapshot);
    }

    /// Replace the snapshot, notifying observers on change
    fn notify(&mut self, snapshot: PokeStateSnapshot) {
        if self.snapshot == snapshot {
            return;
        }
        self.snapshot = snapshot;
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }

    /// Call `observer` whenever the published snapshot changes
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PokeStateSnapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Drop all history and hovered sets (observers are kept)
    pub fn clear(&mut self) {
        self.history.clear();
        self.hovered.clear();
        self.owner = None;
    }
}
