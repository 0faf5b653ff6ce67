//! Per-tick population statistics

use crate::core::types::Sex;
use crate::entity::Being;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts gathered while a tick walks the population. Replaced wholesale
/// every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentStats {
    pub tick: u64,
    pub time_ms: u64,
    /// Population size once the tick's deaths have been removed
    pub population: usize,
    pub targeting_location: usize,
    pub targeting_being: usize,
    pub groups: BTreeMap<String, usize>,
    pub sexes: BTreeMap<Sex, usize>,
    pub births: usize,
    pub deaths: usize,
}

impl EnvironmentStats {
    pub fn new(tick: u64, time_ms: u64) -> Self {
        Self {
            tick,
            time_ms,
            ..Self::default()
        }
    }

    pub fn record(&mut self, being: &Being) {
        if being.destination().is_pursuit() {
            self.targeting_being += 1;
        } else {
            self.targeting_location += 1;
        }
        *self.groups.entry(being.group().to_string()).or_insert(0) += 1;
        *self.sexes.entry(being.sex()).or_insert(0) += 1;
    }

    pub fn group_count(&self, group: &str) -> usize {
        self.groups.get(group).copied().unwrap_or(0)
    }

    pub fn sex_count(&self, sex: Sex) -> usize {
        self.sexes.get(&sex).copied().unwrap_or(0)
    }
}
