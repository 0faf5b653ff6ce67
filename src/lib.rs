//! Beings - evolutionary arena simulation
//!
//! Beings move, fight, breed and die in a bounded 2D arena. The
//! `simulation::Environment` owns the population and advances it tick by
//! tick; everything else is read through snapshots, stats and events.

pub mod behavior;
pub mod core;
pub mod entity;
pub mod genetics;
pub mod simulation;
pub mod spatial;

pub use crate::core::{BeingId, Position, Sex, SimError, SimTime, SimulationConfig};
pub use crate::entity::{Being, BeingSnapshot, Destination};
pub use crate::simulation::{Environment, EnvironmentStats, SimulationEvent, SimulationRunner};
