//! Being - an autonomous agent in the arena
//!
//! A being owns its identity, genes, position, destination, health,
//! pregnancy, lineage and combat record, plus one destination behavior
//! instance. Links to other beings (pursuit target, father) are ids only;
//! the environment resolves them against the live population.

use crate::behavior::{DestinationBehavior, Idle};
use crate::core::geometry;
use crate::core::types::{BeingId, Position, Sex, SimTime};
use crate::entity::combat::CombatStats;
use crate::entity::reproduction::Pregnancy;
use crate::genetics::Genes;
use ahash::AHashSet;
use serde::Serialize;

/// What a being is currently heading for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// A fixed point in the arena
    Fixed(Position),
    /// Another being, followed by id. `last_known` is refreshed every tick
    /// from the live population and used whenever the target can't be seen.
    Pursuing { target: BeingId, last_known: Position },
}

impl Destination {
    pub fn position(&self) -> Position {
        match self {
            Destination::Fixed(position) => *position,
            Destination::Pursuing { last_known, .. } => *last_known,
        }
    }

    pub fn target(&self) -> Option<BeingId> {
        match self {
            Destination::Fixed(_) => None,
            Destination::Pursuing { target, .. } => Some(*target),
        }
    }

    pub fn is_pursuit(&self) -> bool {
        matches!(self, Destination::Pursuing { .. })
    }
}

#[derive(Debug)]
pub struct Being {
    pub(super) id: BeingId,
    pub(super) genes: Genes,
    pub(super) health: f64,
    pub(super) sex: Sex,
    pub(super) group: String,
    pub(super) position: Position,
    pub(super) destination: Destination,
    pub(super) pregnancy: Option<Pregnancy>,
    pub(super) family_ids: AHashSet<BeingId>,
    pub(super) stats: CombatStats,
    pub(super) born_at: SimTime,
    pub(super) behavior: Box<dyn DestinationBehavior>,
}

impl Being {
    /// Create a being at full health heading for its own position.
    ///
    /// Genes are clamped into the legal trait range.
    pub fn new(
        genes: Genes,
        sex: Sex,
        group: impl Into<String>,
        position: Position,
        behavior: Box<dyn DestinationBehavior>,
        born_at: SimTime,
    ) -> Self {
        let genes = genes.clamped();
        Self {
            id: BeingId::new(),
            health: genes.max_health,
            genes,
            sex,
            group: group.into(),
            position,
            destination: Destination::Fixed(position),
            pregnancy: None,
            family_ids: AHashSet::new(),
            stats: CombatStats::default(),
            born_at,
            behavior,
        }
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn id(&self) -> BeingId {
        self.id
    }

    pub fn genes(&self) -> &Genes {
        &self.genes
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn family_ids(&self) -> &AHashSet<BeingId> {
        &self.family_ids
    }

    pub fn is_family_of(&self, other: &Being) -> bool {
        self.family_ids.contains(&other.id)
    }

    pub fn born_at(&self) -> SimTime {
        self.born_at
    }

    /// Simulation milliseconds lived so far
    pub fn age(&self, now: SimTime) -> u64 {
        now.since(self.born_at)
    }

    pub fn behavior(&self) -> &dyn DestinationBehavior {
        self.behavior.as_ref()
    }

    pub fn behavior_kind(&self) -> &'static str {
        self.behavior.kind()
    }

    /// Half the edge of the square this being occupies
    pub fn half_size(&self) -> f64 {
        self.genes.size / 2.0
    }

    pub fn is_ally_of(&self, other: &Being) -> bool {
        self.group == other.group
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = destination;
    }

    /// Start following `target`
    pub fn pursue(&mut self, target: &Being) {
        self.destination = Destination::Pursuing {
            target: target.id,
            last_known: target.position,
        };
    }

    /// Sync a pursuit destination with the target's live position.
    ///
    /// `None` means the target is gone: the pursuit collapses to a fixed
    /// destination at the current position, which counts as reached.
    pub fn track_target(&mut self, live_position: Option<Position>) {
        if let Destination::Pursuing { target, .. } = self.destination {
            self.destination = match live_position {
                Some(position) => Destination::Pursuing {
                    target,
                    last_known: position,
                },
                None => Destination::Fixed(self.position),
            };
        }
    }

    /// Concrete point the being is heading for
    pub fn destination_position(&self) -> Position {
        self.destination.position()
    }

    pub fn distance_to_destination(&self) -> f64 {
        geometry::distance(self.position, self.destination_position())
    }

    /// Move straight towards the destination by `distance`, stopping on it
    /// rather than overshooting.
    pub fn move_towards_destination_by(&mut self, distance: f64) {
        self.position =
            geometry::step_towards(self.position, self.destination_position(), distance);
    }

    /// Swap the behavior out so it can inspect the population this being
    /// lives in. Must be paired with `restore_behavior`.
    pub(crate) fn take_behavior(&mut self) -> Box<dyn DestinationBehavior> {
        std::mem::replace(&mut self.behavior, Box::new(Idle))
    }

    pub(crate) fn restore_behavior(&mut self, behavior: Box<dyn DestinationBehavior>) {
        self.behavior = behavior;
    }

    /// Read model for rendering and reporting
    pub fn snapshot(&self, now: SimTime) -> BeingSnapshot {
        BeingSnapshot {
            id: self.id,
            group: self.group.clone(),
            sex: self.sex,
            position: self.position,
            destination: self.destination_position(),
            pursuing: self.destination.target(),
            health: self.health,
            genes: self.genes,
            stats: self.stats,
            fitness: self.fitness(),
            pregnant: self.pregnancy.is_some(),
            age_ms: self.age(now),
            family_size: self.family_ids.len(),
            behavior: self.behavior.kind().to_string(),
        }
    }
}

/// Serializable point-in-time view of a being
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeingSnapshot {
    pub id: BeingId,
    pub group: String,
    pub sex: Sex,
    pub position: Position,
    pub destination: Position,
    pub pursuing: Option<BeingId>,
    pub health: f64,
    pub genes: Genes,
    pub stats: CombatStats,
    pub fitness: f64,
    pub pregnant: bool,
    pub age_ms: u64,
    pub family_size: usize,
    pub behavior: String,
}
