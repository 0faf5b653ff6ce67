//! Tick system - advances the whole population by one step
//!
//! Order within a tick:
//! clock -> index rebuild -> overpopulation cull -> per-being update -> batch removal -> publish
//!
//! The per-being update walks a snapshot of ids, so beings born during the
//! tick are only processed from the next one. Effects between beings
//! (attacks, conception) apply immediately and are visible to beings
//! processed later in the same tick.

use crate::behavior::BehaviorContext;
use crate::core::geometry;
use crate::core::types::SimTime;
use crate::simulation::environment::Environment;
use crate::simulation::events::SimulationEvent;
use crate::simulation::stats::EnvironmentStats;
use ahash::AHashSet;

impl Environment {
    /// Run one tick of `dt` seconds and return the events it produced.
    ///
    /// Negative or non-finite `dt` is treated as zero. An empty population
    /// makes this a no-op.
    pub fn update(&mut self, dt: f64) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        if self.population.is_empty() {
            return events;
        }

        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock.advance(dt);
        self.tick_count += 1;
        let now = self.clock.now();

        self.rebuild_index();

        if self.population.len() > self.config.population_ceiling {
            tracing::warn!(
                population = self.population.len(),
                ceiling = self.config.population_ceiling,
                "Population over ceiling, bombing arena center"
            );
            let center = geometry::arena_center(self.width, self.height);
            let (_, event) =
                self.area_damage(center, self.config.cull_diameter, self.config.cull_damage);
            events.push(event);
        }

        let mut stats = EnvironmentStats::new(self.tick_count, now.as_millis());
        let mut dead = AHashSet::new();

        for id in self.population.ids() {
            let Some(slot) = self.population.slot_of(id) else {
                continue;
            };

            if !self.population.at(slot).is_dead() {
                self.step_being(slot, dt, now, &mut events);
            }

            let being = self.population.at(slot);
            stats.record(being);
            if being.is_dead() {
                tracing::debug!(being = %id, group = being.group(), "Being died");
                events.push(SimulationEvent::BeingDied(being.snapshot(now)));
                dead.insert(id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
        }

        stats.deaths = self.population.remove_ids(&dead);
        stats.births = events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::BeingBorn(_)))
            .count();
        stats.population = self.population.len();

        for event in &events {
            self.events.publish(event);
        }
        self.stats = stats;

        events
    }

    /// Movement, destination choice, birth, bounds and collisions for the
    /// living being at `slot`
    fn step_being(
        &mut self,
        slot: usize,
        dt: f64,
        now: SimTime,
        events: &mut Vec<SimulationEvent>,
    ) {
        let live_target = self
            .population
            .at(slot)
            .destination()
            .target()
            .map(|target| self.population.position_of(target));

        let being = self.population.at_mut(slot);
        if let Some(live_position) = live_target {
            being.track_target(live_position);
        }
        let step = being.genes().speed * dt;
        being.move_towards_destination_by(step);

        self.run_behavior(slot, now);

        if self.population.at(slot).pregnancy_is_due(now) {
            self.deliver(slot, now, events);
        }

        let being = self.population.at_mut(slot);
        if !geometry::in_bounds(being.position(), self.width, self.height) {
            being.set_position(geometry::arena_center(self.width, self.height));
        }

        self.resolve_collisions(slot, now);
    }

    fn run_behavior(&mut self, slot: usize, now: SimTime) {
        let mut behavior = self.population.at_mut(slot).take_behavior();

        let decision = {
            let mut ctx = BehaviorContext {
                population: &self.population,
                index: &self.index,
                width: self.width,
                height: self.height,
                now,
                rng: &mut self.rng,
            };
            behavior.update_destination(self.population.at(slot), &mut ctx)
        };

        let being = self.population.at_mut(slot);
        being.restore_behavior(behavior);
        if let Some(destination) = decision {
            being.set_destination(destination);
        }
    }

    /// Produce the child of the pregnant being at `slot` and append it.
    /// A failed birth is logged and skipped.
    fn deliver(&mut self, slot: usize, now: SimTime, events: &mut Vec<SimulationEvent>) {
        let mother_id = self.population.at(slot).id();
        let Some(father_id) = self.population.at(slot).pregnancy().map(|p| p.father) else {
            return;
        };
        let fuzz = self.config.gene_fuzz_amount;

        let result = match self.population.pair_mut(mother_id, father_id) {
            Some((mother, father)) => mother.produce_child(Some(father), fuzz, now, &mut self.rng),
            None => self
                .population
                .at_mut(slot)
                .produce_child(None, fuzz, now, &mut self.rng),
        };

        match result {
            Ok(child) => {
                let child_id = child.id();
                for &relative in child.family_ids() {
                    if relative == mother_id || relative == father_id {
                        continue;
                    }
                    if let Some(sibling) = self.population.get_mut(relative) {
                        sibling.add_relative(child_id);
                    }
                }
                tracing::debug!(child = %child_id, mother = %mother_id, "Being born");
                events.push(SimulationEvent::BeingBorn(child.snapshot(now)));
                self.population.push(child);
            }
            Err(err) => {
                tracing::warn!(being = %mother_id, error = %err, "Birth failed, skipping");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Idle, LimitedMemoryChaseEnemy};
    use crate::core::config::SimulationConfig;
    use crate::core::types::{BeingId, Position, Sex};
    use crate::entity::{Being, Destination};
    use crate::genetics::Genes;

    fn env() -> Environment {
        Environment::new(SimulationConfig {
            width: 100.0,
            height: 100.0,
            seed: Some(7),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    fn being(sex: Sex, group: &str, x: f64, y: f64) -> Being {
        Being::new(Genes::default(), sex, group, Position::new(x, y), Box::new(Idle), SimTime::ZERO)
    }

    #[test]
    fn test_empty_population_is_noop() {
        let mut env = env();
        assert!(env.update(0.1).is_empty());
        assert_eq!(env.tick_count(), 0);
        assert_eq!(env.now(), SimTime::ZERO);
    }

    #[test]
    fn test_moves_towards_destination_by_speed() {
        let mut env = env();
        let walker = being(Sex::Male, "Red", 10.0, 10.0)
            .with_destination(Destination::Fixed(Position::new(90.0, 10.0)));
        env.initialize(100.0, 100.0, vec![walker]).unwrap();

        env.update(0.1);

        // Default speed 60 for 0.1s
        let p = env.beings()[0].position();
        assert!((p.x - 16.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
        assert_eq!(env.now(), SimTime(100));
    }

    #[test]
    fn test_out_of_bounds_recentered() {
        let mut env = env();
        env.initialize(100.0, 100.0, vec![being(Sex::Male, "Red", 150.0, -3.0)]).unwrap();

        env.update(0.0);

        assert_eq!(env.beings()[0].position(), Position::new(50.0, 50.0));
        assert!(!env.beings()[0].is_dead());
    }

    #[test]
    fn test_dead_being_removed_with_event() {
        let mut env = env();
        let mut doomed = being(Sex::Male, "Red", 10.0, 10.0);
        doomed.hurt_by(1_000.0);
        let doomed_id = doomed.id();
        env.initialize(100.0, 100.0, vec![doomed, being(Sex::Male, "Red", 80.0, 80.0)]).unwrap();
        env.select_being_at(10.0, 10.0);
        let rx = env.subscribe();

        let events = env.update(0.1);

        assert_eq!(env.beings().len(), 1);
        assert!(env.get(doomed_id).is_none());
        assert!(env.selected_being().is_none());
        assert_eq!(env.stats().deaths, 1);
        assert!(matches!(&events[..], [SimulationEvent::BeingDied(s)] if s.id == doomed_id));
        assert!(matches!(rx.try_recv(), Ok(SimulationEvent::BeingDied(_))));
    }

    #[test]
    fn test_dead_being_does_not_move() {
        let mut env = env();
        let mut doomed = being(Sex::Male, "Red", 10.0, 10.0)
            .with_destination(Destination::Fixed(Position::new(90.0, 10.0)));
        doomed.hurt_by(1_000.0);
        env.initialize(100.0, 100.0, vec![doomed]).unwrap();

        let events = env.update(0.1);
        match &events[..] {
            [SimulationEvent::BeingDied(snapshot)] => {
                assert_eq!(snapshot.position, Position::new(10.0, 10.0))
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_due_pregnancy_gives_birth() {
        let mut env = env();
        let father = being(Sex::Male, "Green", 10.0, 10.0);
        let mut mother = being(Sex::Female, "Green", 80.0, 80.0);
        mother.becomes_pregnant_from(&father, 0, SimTime::ZERO);
        let (father_id, mother_id) = (father.id(), mother.id());
        env.initialize(100.0, 100.0, vec![father, mother]).unwrap();

        let events = env.update(0.01);

        assert_eq!(env.beings().len(), 3);
        assert_eq!(env.stats().births, 1);
        let child = &env.beings()[2];
        assert_eq!(child.group(), "Green");
        assert_eq!(child.position(), Position::new(80.0, 80.0));
        assert!(child.family_ids().contains(&father_id));
        assert!(child.family_ids().contains(&mother_id));
        assert!(!env.get(mother_id).unwrap().is_pregnant());
        assert!(matches!(&events[..], [SimulationEvent::BeingBorn(s)] if s.id == child.id()));
    }

    #[test]
    fn test_older_sibling_learns_of_newborn() {
        let mut env = env();
        let father = being(Sex::Male, "Green", 10.0, 10.0);
        let mut mother = being(Sex::Female, "Green", 80.0, 80.0);
        mother.becomes_pregnant_from(&father, 0, SimTime::ZERO);
        let (father_id, mother_id) = (father.id(), mother.id());
        env.initialize(100.0, 100.0, vec![father, mother]).unwrap();

        env.update(0.01);
        let first_id = env.beings()[2].id();

        let now = env.now();
        let (mother, father) = env.population.pair_mut(mother_id, father_id).unwrap();
        assert!(mother.becomes_pregnant_from(father, 0, now));
        env.update(0.01);

        assert_eq!(env.beings().len(), 4);
        let second_id = env
            .beings()
            .iter()
            .map(|b| b.id())
            .find(|id| ![father_id, mother_id, first_id].contains(id))
            .unwrap();
        assert!(env.get(second_id).unwrap().family_ids().contains(&first_id));
        assert!(env.get(first_id).unwrap().family_ids().contains(&second_id));
    }

    #[test]
    fn test_birth_after_father_removed() {
        let mut env = env();
        let father = being(Sex::Male, "Green", 10.0, 10.0);
        let mut mother = being(Sex::Female, "Green", 80.0, 80.0);
        mother.becomes_pregnant_from(&father, 50, SimTime::ZERO);
        let mother_id = mother.id();
        env.initialize(100.0, 100.0, vec![father, mother]).unwrap();

        let father_id = env.beings()[0].id();
        env.remove_beings(&[father_id].into_iter().collect());
        env.update(0.1);

        assert_eq!(env.beings().len(), 2);
        let child = &env.beings()[1];
        assert_eq!(child.family_ids().len(), 1);
        assert!(child.family_ids().contains(&mother_id));
    }

    #[test]
    fn test_newborn_not_processed_in_birth_tick() {
        let mut env = env();
        let father = being(Sex::Male, "Green", 10.0, 10.0);
        let mut mother = being(Sex::Female, "Green", 80.0, 80.0);
        mother.becomes_pregnant_from(&father, 0, SimTime::ZERO);
        env.initialize(100.0, 100.0, vec![father, mother]).unwrap();

        env.update(0.01);

        let recorded: usize = env.stats().groups.values().sum();
        assert_eq!(recorded, 2);
        assert_eq!(env.stats().population, 3);
    }

    #[test]
    fn test_lost_pursuit_target_counts_as_reached() {
        let mut env = env();
        let prey = being(Sex::Male, "Blue", 90.0, 90.0);
        let mut hunter = being(Sex::Male, "Red", 10.0, 10.0);
        hunter.pursue(&prey);
        let prey_id = prey.id();
        env.initialize(100.0, 100.0, vec![hunter, prey]).unwrap();
        env.remove_beings(&[prey_id].into_iter().collect());

        env.update(0.1);

        let hunter = &env.beings()[0];
        assert_eq!(*hunter.destination(), Destination::Fixed(Position::new(10.0, 10.0)));
        assert_eq!(hunter.position(), Position::new(10.0, 10.0));
    }

    #[test]
    fn test_pursuit_follows_live_position() {
        let mut env = env();
        let prey = being(Sex::Male, "Blue", 50.0, 10.0)
            .with_destination(Destination::Fixed(Position::new(50.0, 90.0)));
        let mut hunter = being(Sex::Male, "Red", 10.0, 10.0);
        hunter.pursue(&prey);
        // Prey moves first, hunter reads its new position
        env.initialize(100.0, 100.0, vec![prey, hunter]).unwrap();

        env.update(0.1);

        let hunter = &env.beings()[1];
        let seen = hunter.destination_position();
        assert!((seen.x - 50.0).abs() < 1e-9);
        assert!((seen.y - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_overpopulation_bombs_center() {
        let mut env = Environment::new(SimulationConfig {
            width: 100.0,
            height: 100.0,
            population_ceiling: 3,
            cull_diameter: 20.0,
            cull_damage: 40.0,
            seed: Some(1),
            ..SimulationConfig::default()
        })
        .unwrap();
        let crowd: Vec<Being> = (0..5)
            .map(|i| being(Sex::Male, "Red", 45.0 + i as f64 * 2.0, 50.0))
            .collect();
        let loner = being(Sex::Male, "Red", 5.0, 5.0);
        let loner_id = loner.id();
        let mut beings = crowd;
        beings.push(loner);
        env.initialize(100.0, 100.0, beings).unwrap();

        let events = env.update(0.0);

        assert!(matches!(
            events.first(),
            Some(SimulationEvent::AreaBombed { diameter, .. }) if *diameter == 20.0
        ));
        for b in env.beings() {
            if b.id() == loner_id {
                assert_eq!(b.health(), 100.0);
            } else {
                assert_eq!(b.health(), 60.0);
            }
        }
    }

    #[test]
    fn test_population_balance_over_many_ticks() {
        let mut env = Environment::new(SimulationConfig {
            width: 300.0,
            height: 300.0,
            initial_population: 150,
            gestation_ms: 200,
            seed: Some(2024),
            ..SimulationConfig::default()
        })
        .unwrap();
        env.populate_random().unwrap();

        for _ in 0..100 {
            let before = env.beings().len();
            let events = env.update(0.05);
            let births = events
                .iter()
                .filter(|e| matches!(e, SimulationEvent::BeingBorn(_)))
                .count();
            let deaths = events
                .iter()
                .filter(|e| matches!(e, SimulationEvent::BeingDied(_)))
                .count();
            assert_eq!(env.beings().len(), before + births - deaths);

            for b in env.beings() {
                assert!(b.health() >= 0.0 && b.health() <= b.genes().max_health);
            }
        }
    }

    #[test]
    fn test_chasers_target_enemies() {
        let mut env = env();
        let mut beings = Vec::new();
        for i in 0..4 {
            let group = if i % 2 == 0 { "Red" } else { "Blue" };
            beings.push(Being::new(
                Genes::default(),
                Sex::Male,
                group,
                Position::new(40.0 + i as f64 * 8.0, 50.0),
                Box::new(LimitedMemoryChaseEnemy::new(1_000, 2_000)),
                SimTime::ZERO,
            ));
        }
        env.initialize(100.0, 100.0, beings).unwrap();

        env.update(0.0);

        assert_eq!(env.stats().targeting_being, 4);
        for b in env.beings() {
            let target: BeingId = b.destination().target().unwrap();
            assert_ne!(env.get(target).unwrap().group(), b.group());
        }
    }
}
