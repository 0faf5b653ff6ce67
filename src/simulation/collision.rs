//! Collision policy
//!
//! Each being resolves its own collisions on its own turn, so a pair of
//! enemies trades at most one blow in each direction per tick.
//! - Same group, opposite sex: the male fathers the female's next child
//! - Different groups: the being attacks whoever it touches

use crate::core::types::{BeingId, Sex, SimTime};
use crate::entity::Being;
use crate::simulation::environment::Environment;

impl Environment {
    pub(crate) fn resolve_collisions(&mut self, slot: usize, now: SimTime) {
        let being = self.population.at(slot);
        let id = being.id();
        let colliders: Vec<BeingId> = self
            .index
            .find_colliding(being)
            .iter()
            .map(|entry| entry.id)
            .collect();
        let gestation_ms = self.config.gestation_ms;

        for other_id in colliders {
            let Some((being, other)) = self.population.pair_mut(id, other_id) else {
                continue;
            };
            if being.is_dead() {
                break;
            }
            if other.is_dead() {
                continue;
            }

            if being.is_ally_of(other) {
                if other.sex() == being.sex().opposite() && mate(being, other, gestation_ms, now) {
                    tracing::trace!(a = %id, b = %other_id, "Conceived");
                }
            } else {
                being.attack(other);
            }
        }
    }
}

/// Whichever of the two is female conceives from the other
fn mate(a: &mut Being, b: &mut Being, gestation_ms: u64, now: SimTime) -> bool {
    let (mother, father) = if a.sex() == Sex::Female { (a, b) } else { (b, a) };
    mother.becomes_pregnant_from(father, gestation_ms, now)
}
