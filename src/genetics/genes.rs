//! Genes - heritable traits that set a being's physical ceiling
//!
//! Genes are never mutated in place. Variation only enters through
//! `fuzz_genes`, applied to the initial population and to every child.

use crate::core::random::random_float;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest value any trait may take
pub const GENE_MIN: f64 = 0.0;
/// Highest value any trait may take
pub const GENE_MAX: f64 = 1000.0;

/// Heritable traits of a being
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genes {
    /// Health ceiling; a being is born at full health
    pub max_health: f64,

    /// Damage potential, compared against the target's defense
    pub attack: f64,

    /// Absorbs that much of every incoming attack
    pub defense: f64,

    /// Movement in world units per simulated second
    pub speed: f64,

    /// Edge length of the square a being occupies
    pub size: f64,
}

impl Default for Genes {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            attack: 10.0,
            defense: 5.0,
            speed: 60.0,
            size: 5.0,
        }
    }
}

impl Genes {
    /// All traits in declaration order
    pub fn traits(&self) -> [f64; 5] {
        [self.max_health, self.attack, self.defense, self.speed, self.size]
    }

    /// Apply `f` to every trait
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Genes {
        Genes {
            max_health: f(self.max_health),
            attack: f(self.attack),
            defense: f(self.defense),
            speed: f(self.speed),
            size: f(self.size),
        }
    }

    /// Copy with every trait clamped into `[GENE_MIN, GENE_MAX]`
    pub fn clamped(&self) -> Genes {
        self.map(clamp_trait)
    }
}

/// Clamp one trait value. NaN collapses to the minimum.
fn clamp_trait(value: f64) -> f64 {
    if value.is_nan() {
        GENE_MIN
    } else {
        value.clamp(GENE_MIN, GENE_MAX)
    }
}

/// Redraw every trait uniformly from `[value - fuzz_amount, value + fuzz_amount]`
/// and clamp the result into `[GENE_MIN, GENE_MAX]`.
///
/// The window is capped at the full gene range, which any wider window
/// clamps to anyway.
pub fn fuzz_genes<R: Rng + ?Sized>(genes: &Genes, fuzz_amount: f64, rng: &mut R) -> Genes {
    let fuzz = if fuzz_amount.is_finite() {
        fuzz_amount.abs().min(GENE_MAX - GENE_MIN)
    } else {
        0.0
    };
    genes.map(|value| clamp_trait(random_float(&mut *rng, value - fuzz, value + fuzz)))
}
