pub mod being;
pub mod combat;
pub mod reproduction;

pub use being::{Being, BeingSnapshot, Destination};
pub use combat::CombatStats;
pub use reproduction::Pregnancy;
