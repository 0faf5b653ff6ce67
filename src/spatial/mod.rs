//! Spatial queries over the population

pub mod position_index;

pub use position_index::{IndexedBeing, PositionIndex};
