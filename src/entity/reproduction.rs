//! Reproduction - pregnancy, birth and lineage
//!
//! The fitter parent (damage dealt minus damage taken, ties to the mother)
//! passes on its genes, which are then fuzzed. The child takes a fresh
//! behavior of one parent's kind, chosen by coin flip.

use crate::core::error::{Result, SimError};
use crate::core::random::random_sex;
use crate::core::types::{BeingId, Sex, SimTime};
use crate::entity::being::Being;
use crate::genetics::fuzz_genes;
use rand::Rng;

/// An active pregnancy. The father is referenced by id and may no longer
/// exist by the time the child is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pregnancy {
    pub father: BeingId,
    pub due_at: SimTime,
}

impl Being {
    pub fn pregnancy(&self) -> Option<&Pregnancy> {
        self.pregnancy.as_ref()
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy.is_some()
    }

    /// Conceive with `father`, due `gestation_ms` from `now`.
    ///
    /// At most one pregnancy at a time; only a female can carry and only a
    /// male can father. Returns whether a new pregnancy started.
    pub fn becomes_pregnant_from(
        &mut self,
        father: &Being,
        gestation_ms: u64,
        now: SimTime,
    ) -> bool {
        if self.pregnancy.is_some() || self.sex != Sex::Female || father.sex != Sex::Male {
            return false;
        }
        self.pregnancy = Some(Pregnancy {
            father: father.id,
            due_at: now.after(gestation_ms),
        });
        true
    }

    /// Record `relative` as family. Used to tell older siblings about a
    /// newborn once it has a place in the population.
    pub(crate) fn add_relative(&mut self, relative: BeingId) {
        if relative != self.id {
            self.family_ids.insert(relative);
        }
    }

    pub fn pregnancy_is_due(&self, now: SimTime) -> bool {
        self.pregnancy.map_or(false, |p| now >= p.due_at)
    }

    /// Give birth. `father` is the live father if he still exists; a
    /// being with any other id is ignored. Without a father the child
    /// inherits from the mother alone.
    ///
    /// The child is placed at the mother's position but is not added to
    /// any population.
    pub fn produce_child<R: Rng + ?Sized>(
        &mut self,
        father: Option<&mut Being>,
        fuzz_amount: f64,
        now: SimTime,
        rng: &mut R,
    ) -> Result<Being> {
        let pregnancy = self.pregnancy.ok_or(SimError::NotPregnant(self.id))?;
        let father = father.filter(|f| f.id == pregnancy.father);

        let (base_genes, behavior) = match father.as_deref() {
            Some(father) => {
                let genes = if father.fitness() > self.fitness() {
                    father.genes
                } else {
                    self.genes
                };
                let behavior = if rng.gen_bool(0.5) {
                    father.behavior.spawn_fresh()
                } else {
                    self.behavior.spawn_fresh()
                };
                (genes, behavior)
            }
            None => (self.genes, self.behavior.spawn_fresh()),
        };

        let genes = fuzz_genes(&base_genes, fuzz_amount, rng);
        let sex = random_sex(rng);
        let mut child = Being::new(genes, sex, self.group.clone(), self.position, behavior, now);

        child.family_ids.insert(self.id);
        if let Some(father) = father {
            // Children both parents already share are the newborn's siblings
            child.family_ids.extend(self.family_ids.intersection(&father.family_ids).copied());
            child.family_ids.insert(father.id);

            father.family_ids.insert(self.id);
            father.family_ids.insert(child.id);
            self.family_ids.insert(father.id);
        }
        self.family_ids.insert(child.id);
        self.pregnancy = None;

        Ok(child)
    }
}
