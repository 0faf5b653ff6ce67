//! Population storage and initial generation
//!
//! Beings live in a dense vector in insertion order. An id -> slot map
//! resolves the id-only links beings hold on each other (pursuit targets,
//! fathers). Removal is batched and rebuilds the map once.

use crate::behavior::LimitedMemoryChaseEnemy;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::random::{random_position, random_sex, select_random};
use crate::core::types::{BeingId, Position, SimTime};
use crate::entity::{Being, Destination};
use crate::genetics::fuzz_genes;
use ahash::{AHashMap, AHashSet};
use rand::Rng;

#[derive(Debug, Default)]
pub struct Population {
    beings: Vec<Being>,
    slots: AHashMap<BeingId, usize>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_beings(beings: Vec<Being>) -> Self {
        let mut population = Self {
            beings,
            slots: AHashMap::new(),
        };
        population.reindex();
        population
    }

    fn reindex(&mut self) {
        self.slots.clear();
        for (slot, being) in self.beings.iter().enumerate() {
            self.slots.insert(being.id(), slot);
        }
    }

    pub fn len(&self) -> usize {
        self.beings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Being> {
        self.beings.iter()
    }

    pub fn as_slice(&self) -> &[Being] {
        &self.beings
    }

    pub fn contains(&self, id: BeingId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn slot_of(&self, id: BeingId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    pub fn get(&self, id: BeingId) -> Option<&Being> {
        self.slot_of(id).map(|slot| &self.beings[slot])
    }

    pub fn get_mut(&mut self, id: BeingId) -> Option<&mut Being> {
        let slot = self.slot_of(id)?;
        self.beings.get_mut(slot)
    }

    /// Live position of a being, `None` once it has been removed
    pub fn position_of(&self, id: BeingId) -> Option<Position> {
        self.get(id).map(Being::position)
    }

    /// Being at `slot`. Panics when out of range, like slice indexing.
    pub fn at(&self, slot: usize) -> &Being {
        &self.beings[slot]
    }

    pub fn at_mut(&mut self, slot: usize) -> &mut Being {
        &mut self.beings[slot]
    }

    /// Ids in current iteration order
    pub fn ids(&self) -> Vec<BeingId> {
        self.beings.iter().map(Being::id).collect()
    }

    /// Append a being. A being whose id is already present is dropped and
    /// `false` is returned.
    pub fn push(&mut self, being: Being) -> bool {
        if self.slots.contains_key(&being.id()) {
            return false;
        }
        self.slots.insert(being.id(), self.beings.len());
        self.beings.push(being);
        true
    }

    /// Mutable access to two distinct beings at once
    pub fn pair_mut(&mut self, a: BeingId, b: BeingId) -> Option<(&mut Being, &mut Being)> {
        let slot_a = self.slot_of(a)?;
        let slot_b = self.slot_of(b)?;
        if slot_a == slot_b {
            return None;
        }
        if slot_a < slot_b {
            let (left, right) = self.beings.split_at_mut(slot_b);
            Some((&mut left[slot_a], &mut right[0]))
        } else {
            let (left, right) = self.beings.split_at_mut(slot_a);
            Some((&mut right[0], &mut left[slot_b]))
        }
    }

    /// Drop every being whose id is in `ids`, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn remove_ids(&mut self, ids: &AHashSet<BeingId>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.beings.len();
        self.beings.retain(|being| !ids.contains(&being.id()));
        let removed = before - self.beings.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }
}

/// Generate the starting population described by `config`.
///
/// Every being gets fuzzed starting genes, a random sex, group, position
/// and destination, and its own chase behavior.
pub fn spawn_initial_population<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
    now: SimTime,
) -> Result<Vec<Being>> {
    if config.groups.is_empty() {
        return Err(SimError::InvalidConfig("at least one group is required".into()));
    }

    let mut beings = Vec::with_capacity(config.initial_population);
    for _ in 0..config.initial_population {
        let genes = fuzz_genes(&config.starting_genes, config.gene_fuzz_amount, rng);
        let sex = random_sex(rng);
        let group = match select_random(rng, &config.groups) {
            Some(group) => group.clone(),
            None => continue,
        };
        let position = random_position(rng, config.width, config.height);
        let destination = random_position(rng, config.width, config.height);
        let behavior = LimitedMemoryChaseEnemy::new(config.min_follow_ms, config.max_follow_ms);

        beings.push(
            Being::new(genes, sex, group, position, Box::new(behavior), now)
                .with_destination(Destination::Fixed(destination)),
        );
    }
    Ok(beings)
}
