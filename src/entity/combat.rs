//! Combat - attacks, area damage and healing
//!
//! Health always stays within `[0, genes.max_health]`.

use crate::entity::being::Being;
use serde::{Deserialize, Serialize};

/// Lifetime damage record. Both counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage_dealt: f64,
    pub damage_taken: f64,
}

impl CombatStats {
    /// Damage dealt minus damage taken
    pub fn fitness(&self) -> f64 {
        self.damage_dealt - self.damage_taken
    }
}

impl Being {
    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn fitness(&self) -> f64 {
        self.stats.fitness()
    }

    /// Strike `target`. Only lands when attack beats the target's defense;
    /// the attacker recovers half of the damage it deals.
    ///
    /// Returns the damage dealt (0 when the attack glanced off).
    pub fn attack(&mut self, target: &mut Being) -> f64 {
        let damage = self.genes.attack - target.genes.defense;
        if !(damage > 0.0) {
            return 0.0;
        }

        target.health = (target.health - damage).max(0.0);
        target.stats.damage_taken += damage;
        self.stats.damage_dealt += damage;
        self.heal_by(damage / 2.0);

        damage
    }

    /// Unconditional damage, used by area bombing
    pub fn hurt_by(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        self.stats.damage_taken += amount;
    }

    pub fn heal_by(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        self.health = (self.health + amount).min(self.genes.max_health);
    }
}
