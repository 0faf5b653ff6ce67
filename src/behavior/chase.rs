//! Chase a random nearby enemy, but only for a while
//!
//! Once a chase starts a deadline is armed. When it passes the being gives
//! up and heads for a random point instead, even if it never caught up.

use super::{BehaviorContext, DestinationBehavior, ARRIVAL_DISTANCE};
use crate::core::random::{random_int, random_position};
use crate::core::types::SimTime;
use crate::entity::{Being, Destination};

#[derive(Debug, Clone, PartialEq)]
pub struct LimitedMemoryChaseEnemy {
    pub min_follow_ms: u64,
    pub max_follow_ms: u64,
    force_random_position_at: Option<SimTime>,
}

impl LimitedMemoryChaseEnemy {
    pub fn new(min_follow_ms: u64, max_follow_ms: u64) -> Self {
        Self {
            min_follow_ms,
            max_follow_ms,
            force_random_position_at: None,
        }
    }

    /// When the current chase will be abandoned, if one is armed
    pub fn force_random_position_at(&self) -> Option<SimTime> {
        self.force_random_position_at
    }
}

impl DestinationBehavior for LimitedMemoryChaseEnemy {
    fn kind(&self) -> &'static str {
        "limited_memory_chase_enemy"
    }

    fn update_destination(
        &mut self,
        being: &Being,
        ctx: &mut BehaviorContext<'_>,
    ) -> Option<Destination> {
        if let Some(deadline) = self.force_random_position_at {
            if ctx.now >= deadline {
                self.force_random_position_at = None;
                let point = random_position(&mut *ctx.rng, ctx.width, ctx.height);
                return Some(Destination::Fixed(point));
            }
        }

        if being.distance_to_destination() > ARRIVAL_DISTANCE {
            return None;
        }

        let radius = ctx.width.max(ctx.height) / 4.0;
        let population = ctx.population;
        let enemy = ctx.index.random_near(
            being.position(),
            radius,
            |entry| {
                entry.group != being.group()
                    && population.get(entry.id).map_or(false, |b| !b.is_dead())
            },
            &mut *ctx.rng,
        );

        match enemy {
            Some(enemy) => {
                if self.force_random_position_at.is_none() {
                    let follow_ms =
                        random_int(&mut *ctx.rng, self.min_follow_ms, self.max_follow_ms);
                    self.force_random_position_at = Some(ctx.now.after(follow_ms));
                }
                let last_known = population
                    .get(enemy.id)
                    .map_or(enemy.position, |b| b.position());
                Some(Destination::Pursuing {
                    target: enemy.id,
                    last_known,
                })
            }
            None => Some(Destination::Fixed(random_position(
                &mut *ctx.rng,
                ctx.width,
                ctx.height,
            ))),
        }
    }

    fn spawn_fresh(&self) -> Box<dyn DestinationBehavior> {
        Box::new(Self::new(self.min_follow_ms, self.max_follow_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Idle;
    use crate::core::types::{Position, Sex};
    use crate::genetics::Genes;
    use crate::simulation::Population;
    use crate::spatial::PositionIndex;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn being_at(x: f64, y: f64, group: &str) -> Being {
        Being::new(
            Genes::default(),
            Sex::Male,
            group,
            Position::new(x, y),
            Box::new(Idle),
            SimTime::ZERO,
        )
    }

    fn decide(
        behavior: &mut LimitedMemoryChaseEnemy,
        population: &Population,
        slot: usize,
        now: SimTime,
        rng: &mut ChaCha8Rng,
    ) -> Option<Destination> {
        let index = PositionIndex::build(population.iter());
        let mut ctx = BehaviorContext {
            population,
            index: &index,
            width: 400.0,
            height: 400.0,
            now,
            rng,
        };
        behavior.update_destination(population.at(slot), &mut ctx)
    }

    #[test]
    fn test_picks_enemy_when_destination_reached() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let population = Population::from_beings(vec![
            being_at(100.0, 100.0, "Red"),
            being_at(120.0, 100.0, "Red"),
            being_at(130.0, 110.0, "Blue"),
        ]);
        let enemy_id = population.at(2).id();
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 3_000);

        let destination = decide(&mut behavior, &population, 0, SimTime(500), &mut rng).unwrap();

        assert_eq!(destination.target(), Some(enemy_id));
        assert_eq!(destination.position(), Position::new(130.0, 110.0));
        let deadline = behavior.force_random_position_at().unwrap();
        assert!(deadline >= SimTime(1_500) && deadline <= SimTime(3_500));
    }

    #[test]
    fn test_no_enemy_means_random_point() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let population = Population::from_beings(vec![
            being_at(100.0, 100.0, "Red"),
            being_at(110.0, 100.0, "Red"),
        ]);
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 3_000);

        let destination = decide(&mut behavior, &population, 0, SimTime(0), &mut rng).unwrap();

        assert!(!destination.is_pursuit());
        let p = destination.position();
        assert!(p.x >= 0.0 && p.x < 400.0 && p.y >= 0.0 && p.y < 400.0);
        assert!(behavior.force_random_position_at().is_none());
    }

    #[test]
    fn test_enemy_out_of_range_is_ignored() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Search radius is 400 / 4 = 100
        let population = Population::from_beings(vec![
            being_at(0.0, 0.0, "Red"),
            being_at(300.0, 300.0, "Blue"),
        ]);
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 3_000);

        let destination = decide(&mut behavior, &population, 0, SimTime(0), &mut rng).unwrap();
        assert!(!destination.is_pursuit());
    }

    #[test]
    fn test_keeps_destination_while_travelling() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let traveller = being_at(0.0, 0.0, "Red")
            .with_destination(Destination::Fixed(Position::new(50.0, 0.0)));
        let population = Population::from_beings(vec![traveller, being_at(5.0, 0.0, "Blue")]);
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 3_000);

        assert!(decide(&mut behavior, &population, 0, SimTime(0), &mut rng).is_none());
    }

    #[test]
    fn test_expired_chase_forces_random_point() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let population = Population::from_beings(vec![
            being_at(100.0, 100.0, "Red"),
            being_at(105.0, 100.0, "Blue"),
        ]);
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 1_000);

        decide(&mut behavior, &population, 0, SimTime(0), &mut rng).unwrap();
        assert_eq!(behavior.force_random_position_at(), Some(SimTime(1_000)));

        // Still chasing just before the deadline
        let pursuer = being_at(100.0, 100.0, "Red")
            .with_destination(Destination::Fixed(Position::new(300.0, 300.0)));
        let far = Population::from_beings(vec![pursuer]);
        assert!(decide(&mut behavior, &far, 0, SimTime(999), &mut rng).is_none());

        let destination = decide(&mut behavior, &far, 0, SimTime(1_000), &mut rng).unwrap();
        assert!(!destination.is_pursuit());
        assert!(behavior.force_random_position_at().is_none());
    }

    #[test]
    fn test_armed_deadline_is_not_extended() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let population = Population::from_beings(vec![
            being_at(100.0, 100.0, "Red"),
            being_at(105.0, 100.0, "Blue"),
        ]);
        let mut behavior = LimitedMemoryChaseEnemy::new(2_000, 2_000);

        decide(&mut behavior, &population, 0, SimTime(0), &mut rng);
        decide(&mut behavior, &population, 0, SimTime(1_500), &mut rng);
        assert_eq!(behavior.force_random_position_at(), Some(SimTime(2_000)));
    }

    #[test]
    fn test_spawn_fresh_clears_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let population = Population::from_beings(vec![
            being_at(100.0, 100.0, "Red"),
            being_at(105.0, 100.0, "Blue"),
        ]);
        let mut behavior = LimitedMemoryChaseEnemy::new(1_000, 3_000);
        decide(&mut behavior, &population, 0, SimTime(0), &mut rng);
        assert!(behavior.force_random_position_at().is_some());

        let fresh = behavior.spawn_fresh();
        assert_eq!(fresh.kind(), "limited_memory_chase_enemy");
    }
}
