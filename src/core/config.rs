//! Simulation configuration with documented constants
//!
//! Every tunable of the engine lives here and is handed to the
//! `Environment` at construction time. Values can be loaded from TOML.

use crate::core::error::{Result, SimError};
use crate::genetics::{Genes, GENE_MAX, GENE_MIN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the simulation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === ARENA ===
    /// Arena width (world units)
    pub width: f64,

    /// Arena height (world units)
    pub height: f64,

    // === POPULATION ===
    /// Number of beings generated by `spawn_initial_population`
    pub initial_population: usize,

    /// Group labels. Beings of the same group are allies; every being's
    /// group must be one of these.
    pub groups: Vec<String>,

    /// Genes every initial being is fuzzed from
    pub starting_genes: Genes,

    /// Half-width of the uniform window each trait is redrawn from when
    /// genes are fuzzed (initial population and every child)
    pub gene_fuzz_amount: f64,

    // === REPRODUCTION ===
    /// Time from conception to birth (simulation milliseconds)
    pub gestation_ms: u64,

    // === PURSUIT ===
    /// Lower bound on how long a being keeps chasing one target (ms)
    pub min_follow_ms: u64,

    /// Upper bound on how long a being keeps chasing one target (ms)
    pub max_follow_ms: u64,

    // === OVERPOPULATION RELIEF ===
    /// Population above which a cull bomb is dropped on the arena center
    ///
    /// This is pressure relief, not a cap: the population may stay above
    /// the ceiling after the cull.
    pub population_ceiling: usize,

    /// Diameter of the cull bomb (world units)
    pub cull_diameter: f64,

    /// Damage dealt by the cull bomb to every being it touches
    pub cull_damage: f64,

    // === INTERACTION ===
    /// Radius searched by `select_being_at`
    pub select_radius: f64,

    // === SCHEDULING ===
    /// Wall-clock interval between ticks when driven by the runner (ms)
    pub tick_interval_ms: u64,

    /// Longest simulated step a single tick may take (seconds).
    ///
    /// Keeps a stalled host from teleporting beings across the arena.
    pub max_step_secs: f64,

    /// Seed for the engine RNG. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,

            initial_population: 300,
            groups: vec!["Red".into(), "Green".into(), "Blue".into()],
            starting_genes: Genes::default(),
            gene_fuzz_amount: 2.0,

            gestation_ms: 5_000,

            min_follow_ms: 1_000,
            max_follow_ms: 3_000,

            population_ceiling: 2_000,
            cull_diameter: 600.0,
            cull_damage: 60.0,

            select_radius: 50.0,

            tick_interval_ms: 10,
            max_step_secs: 0.1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(SimError::InvalidConfig(format!(
                "arena must have positive finite size, got {}x{}",
                self.width, self.height
            )));
        }

        if self.groups.is_empty() {
            return Err(SimError::InvalidConfig("at least one group is required".into()));
        }
        for (i, group) in self.groups.iter().enumerate() {
            if self.groups[..i].contains(group) {
                return Err(SimError::InvalidConfig(format!("duplicate group {}", group)));
            }
        }

        if self.min_follow_ms > self.max_follow_ms {
            return Err(SimError::InvalidConfig(format!(
                "min_follow_ms ({}) should be <= max_follow_ms ({})",
                self.min_follow_ms, self.max_follow_ms
            )));
        }

        if !(0.0..=GENE_MAX - GENE_MIN).contains(&self.gene_fuzz_amount) {
            return Err(SimError::InvalidConfig(format!(
                "gene_fuzz_amount must lie in [0, {}], got {}",
                GENE_MAX - GENE_MIN,
                self.gene_fuzz_amount
            )));
        }

        let genes = &self.starting_genes;
        if genes.traits().iter().any(|v| !(GENE_MIN..=GENE_MAX).contains(v)) {
            return Err(SimError::InvalidConfig(format!(
                "starting genes must lie in [{}, {}]",
                GENE_MIN, GENE_MAX
            )));
        }

        if self.population_ceiling == 0 {
            return Err(SimError::InvalidConfig("population_ceiling must be positive".into()));
        }

        if !(self.cull_diameter >= 0.0)
            || !(self.cull_damage >= 0.0)
            || !(self.select_radius >= 0.0)
        {
            return Err(SimError::InvalidConfig(
                "cull_diameter, cull_damage and select_radius must be non-negative".into(),
            ));
        }

        if self.tick_interval_ms == 0 || !(self.max_step_secs > 0.0) {
            return Err(SimError::InvalidConfig(
                "tick_interval_ms and max_step_secs must be positive".into(),
            ));
        }

        Ok(())
    }
}
