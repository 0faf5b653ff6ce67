pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod random;
pub mod types;

pub use clock::SimClock;
pub use config::SimulationConfig;
pub use error::{Result, SimError};
pub use types::{BeingId, Position, Sex, SimTime};
