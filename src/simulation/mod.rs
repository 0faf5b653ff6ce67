pub mod collision;
pub mod environment;
pub mod events;
pub mod population;
pub mod runner;
pub mod stats;
pub mod tick;

pub use environment::{Environment, RunState};
pub use events::{EventBus, SimulationEvent};
pub use population::{spawn_initial_population, Population};
pub use runner::SimulationRunner;
pub use stats::EnvironmentStats;
