//! Destination behaviors
//!
//! Architecture: trait + per-being state
//! - `DestinationBehavior` is the swappable policy each being owns
//! - `BehaviorContext` is the read-only view of the world it decides from
//! - The environment applies whatever destination the behavior returns

pub mod chase;
pub mod wander;

pub use chase::LimitedMemoryChaseEnemy;
pub use wander::{Idle, Wander};

use crate::core::types::SimTime;
use crate::entity::{Being, Destination};
use crate::simulation::Population;
use crate::spatial::PositionIndex;
use rand::RngCore;
use std::fmt;

/// Everything a behavior may look at while deciding
pub struct BehaviorContext<'a> {
    pub population: &'a Population,
    pub index: &'a PositionIndex,
    pub width: f64,
    pub height: f64,
    pub now: SimTime,
    pub rng: &'a mut dyn RngCore,
}

/// Per-being policy for choosing where to head next
pub trait DestinationBehavior: fmt::Debug + Send {
    /// Stable name of the behavior kind, used for reporting and inheritance
    fn kind(&self) -> &'static str;

    /// Decide whether `being` should head somewhere new this tick.
    ///
    /// `None` keeps the current destination. Only the behavior's own state
    /// may change here.
    fn update_destination(
        &mut self,
        being: &Being,
        ctx: &mut BehaviorContext<'_>,
    ) -> Option<Destination>;

    /// A new instance of the same kind with clean state
    fn spawn_fresh(&self) -> Box<dyn DestinationBehavior>;
}

/// Distance at which a destination counts as reached
pub const ARRIVAL_DISTANCE: f64 = 1.0;
