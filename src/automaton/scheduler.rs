//! Optional rotation of the active rule set on a fixed step cadence.

use serde::{Deserialize, Serialize};

use super::rules::{RuleSet, CATALOG};
use super::seed::TowerRng;

/// How the next preset is chosen when a rotation fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShuffleMode {
    /// Walk the catalog in order, wrapping at the end.
    #[default]
    Cycle,
    /// Pick a uniformly random preset.
    Random,
}

/// Rotation settings. Changes take effect on the next completed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub interval_steps: u32,
    pub mode: ShuffleMode,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            enabled: false,
            interval_steps: 12,
            mode: ShuffleMode::Cycle,
        }
    }
}

/// Rotation settings plus the catalog cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleScheduler {
    pub config: ScheduleConfig,
    cursor: usize,
}

impl RuleScheduler {
    pub fn new(config: ScheduleConfig, cursor: usize) -> Self {
        RuleScheduler { config, cursor }
    }

    /// Catalog position of the most recent rotation (or the starting preset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Whether a rotation fires after `step_index` completed steps.
    pub fn is_due(&self, step_index: u32) -> bool {
        self.config.enabled
            && self.config.interval_steps > 0
            && step_index % self.config.interval_steps == 0
    }

    /// Return the rule set to use for the next step.
    ///
    /// `step_index` is the count of completed steps including the one just
    /// applied. When no rotation is due the current rules come back unchanged.
    pub fn maybe_rotate(
        &mut self,
        step_index: u32,
        current: &RuleSet,
        rng: &mut TowerRng,
    ) -> RuleSet {
        if !self.is_due(step_index) {
            return current.clone();
        }
        self.cursor = match self.config.mode {
            ShuffleMode::Cycle => (self.cursor + 1) % CATALOG.len(),
            ShuffleMode::Random => rng.next_below(CATALOG.len()),
        };
        CATALOG[self.cursor].clone()
    }
}
