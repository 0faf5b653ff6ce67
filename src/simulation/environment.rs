//! Environment - owner of the population and everything derived from it
//!
//! The environment is the only mutator of beings. External consumers read
//! snapshots and stats, and act through the commands here (`add_being`,
//! `remove_beings`, `bomb_area`, selection). The per-tick update lives in
//! `tick.rs`, collision policy in `collision.rs`.

use crate::core::clock::SimClock;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::geometry;
use crate::core::types::{BeingId, Position, SimTime};
use crate::entity::{Being, BeingSnapshot};
use crate::simulation::events::{EventBus, SimulationEvent};
use crate::simulation::population::{spawn_initial_population, Population};
use crate::simulation::stats::EnvironmentStats;
use crate::spatial::PositionIndex;
use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::mpsc;

/// Engine scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

#[derive(Debug)]
pub struct Environment {
    pub(crate) config: SimulationConfig,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) population: Population,
    pub(crate) index: PositionIndex,
    pub(crate) stats: EnvironmentStats,
    pub(crate) state: RunState,
    pub(crate) debug_mode: bool,
    pub(crate) selected: Option<BeingId>,
    pub(crate) clock: SimClock,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) events: EventBus,
    pub(crate) tick_count: u64,
    seed: u64,
}

impl Environment {
    /// Create an empty, stopped environment. The RNG is seeded from
    /// `config.seed` when present.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);

        Ok(Self {
            width: config.width,
            height: config.height,
            config,
            population: Population::new(),
            index: PositionIndex::default(),
            stats: EnvironmentStats::default(),
            state: RunState::Stopped,
            debug_mode: false,
            selected: None,
            clock: SimClock::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: EventBus::new(),
            tick_count: 0,
            seed,
        })
    }

    /// Replace the arena and population. Every being must belong to one of
    /// the configured groups.
    pub fn initialize(&mut self, width: f64, height: f64, beings: Vec<Being>) -> Result<()> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "arena must have positive finite size, got {}x{}",
                width, height
            )));
        }
        if let Some(stray) = beings.iter().find(|b| !self.config.has_group(b.group())) {
            return Err(SimError::UnknownGroup(stray.group().to_string()));
        }

        self.width = width;
        self.height = height;
        self.population = Population::from_beings(beings);
        self.selected = None;
        self.stats = EnvironmentStats::new(self.tick_count, self.clock.now().as_millis());
        self.rebuild_index();

        tracing::info!(
            population = self.population.len(),
            width,
            height,
            "Environment initialized"
        );
        Ok(())
    }

    /// Initialize with a freshly generated population from the config
    pub fn populate_random(&mut self) -> Result<()> {
        let beings = spawn_initial_population(&self.config, &mut self.rng, self.clock.now())?;
        self.initialize(self.config.width, self.config.height, beings)
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Stopped {
            self.state = RunState::Running;
            tracing::info!(time_ms = self.clock.now().as_millis(), "Simulation resumed");
        }
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            tracing::info!(time_ms = self.clock.now().as_millis(), "Simulation paused");
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn toggle_debug_mode(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        self.debug_mode
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Add a being to the population. It takes part from the next tick on.
    pub fn add_being(&mut self, being: Being) -> Result<BeingId> {
        if !self.config.has_group(being.group()) {
            return Err(SimError::UnknownGroup(being.group().to_string()));
        }
        let id = being.id();
        self.population.push(being);
        Ok(id)
    }

    /// Remove every being in `ids`; unknown ids are ignored
    pub fn remove_beings(&mut self, ids: &AHashSet<BeingId>) -> usize {
        if self.selected.map_or(false, |id| ids.contains(&id)) {
            self.selected = None;
        }
        let removed = self.population.remove_ids(ids);
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Damage every being touched by the blast circle of `diameter` around
    /// `position`. Dead beings stay until the next tick collects them.
    ///
    /// Returns how many beings were hit.
    pub fn bomb_area(&mut self, position: Position, diameter: f64, damage: f64) -> usize {
        self.rebuild_index();
        let (hit, event) = self.area_damage(position, diameter, damage);
        self.events.publish(&event);
        hit
    }

    /// Apply area damage against the current index without publishing
    pub(crate) fn area_damage(
        &mut self,
        position: Position,
        diameter: f64,
        damage: f64,
    ) -> (usize, SimulationEvent) {
        let radius = if diameter.is_finite() { diameter.abs() / 2.0 } else { 0.0 };
        let targets: Vec<BeingId> = self
            .index
            .find_within(position, radius, |entry| {
                geometry::circle_intersects_square(
                    position,
                    radius,
                    entry.position,
                    entry.half_size,
                )
            })
            .iter()
            .map(|entry| entry.id)
            .collect();

        let mut hit = 0;
        for id in targets {
            if let Some(being) = self.population.get_mut(id) {
                being.hurt_by(damage);
                hit += 1;
            }
        }

        tracing::info!(x = position.x, y = position.y, diameter, hit, "Area bombed");
        (hit, SimulationEvent::AreaBombed { position, diameter })
    }

    /// Select the being nearest to `(x, y)` within the selection radius.
    /// Clears the selection when nothing is close enough.
    pub fn select_being_at(&mut self, x: f64, y: f64) -> Option<BeingId> {
        self.rebuild_index();
        let population = &self.population;
        self.selected = self
            .index
            .find_closest_to(Position::new(x, y), self.config.select_radius, |entry| {
                population.contains(entry.id)
            })
            .map(|entry| entry.id);
        self.selected
    }

    pub fn selected_being(&self) -> Option<&Being> {
        self.selected.and_then(|id| self.population.get(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.index = PositionIndex::build(self.population.iter());
    }

    /// Send every future event to the returned receiver
    pub fn subscribe(&mut self) -> mpsc::Receiver<SimulationEvent> {
        let rx = self.events.subscribe();
        tracing::debug!(subscribers = self.events.subscriber_count(), "Event subscriber added");
        rx
    }

    pub fn beings(&self) -> &[Being] {
        self.population.as_slice()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn get(&self, id: BeingId) -> Option<&Being> {
        self.population.get(id)
    }

    pub fn stats(&self) -> &EnvironmentStats {
        &self.stats
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seed the RNG was created from, for replaying a run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshots(&self) -> Vec<BeingSnapshot> {
        let now = self.clock.now();
        self.population.iter().map(|b| b.snapshot(now)).collect()
    }
}
