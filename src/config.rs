//! Simulation configuration.
//!
//! One plain struct carries every tunable. It can be built in code or parsed
//! from TOML; either way `validate` runs before any tower is touched.

use serde::{Deserialize, Serialize};

use crate::automaton::lattice::VoxelLattice;
use crate::automaton::rules::{preset_by_name, RuleSet};
use crate::automaton::scheduler::{ScheduleConfig, ShuffleMode};
use crate::automaton::seed::{SeedParams, Symmetry};
use crate::color::GradientMode;
use crate::error::{TowerError, TowerResult};

/// Upper bound on towers in one array.
pub const MAX_TOWERS: usize = 1024;

/// Upper bound on cells summed over every tower of one array.
pub const MAX_TOTAL_CELLS: usize = 1 << 26;

/// Every option the simulation recognizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid_x: i16,
    pub grid_y: i16,
    pub grid_z: i16,

    pub tower_count_x: i16,
    pub tower_count_y: i16,
    /// World-space distance between adjacent tower centers.
    pub tower_spacing: f32,

    pub seed_density: f32,
    pub seed_symmetry: Symmetry,
    pub random_seed: u32,

    pub rule_preset: String,

    pub rule_shuffle_enabled: bool,
    pub rule_shuffle_interval_steps: u32,
    pub rule_shuffle_mode: ShuffleMode,

    pub gradient_mode: GradientMode,

    /// Steps per second for [`crate::StepClock::from_config`]. Not enforced by the towers.
    pub step_rate: f32,

    /// Threads for stepping towers in parallel. 0 uses the global rayon pool.
    pub worker_threads: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid_x: 16,
            grid_y: 32,
            grid_z: 16,
            tower_count_x: 3,
            tower_count_y: 3,
            tower_spacing: 20.0,
            seed_density: 0.35,
            seed_symmetry: Symmetry::Mirror,
            random_seed: 1337,
            rule_preset: "Spine Rise".to_string(),
            rule_shuffle_enabled: false,
            rule_shuffle_interval_steps: 12,
            rule_shuffle_mode: ShuffleMode::Cycle,
            gradient_mode: GradientMode::Neighbors,
            step_rate: 8.0,
            worker_threads: 0,
        }
    }
}

impl SimulationConfig {
    /// Parse from TOML text and validate. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> TowerResult<Self> {
        let config: SimulationConfig =
            toml::from_str(text).map_err(|e| TowerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> TowerResult<String> {
        toml::to_string(self).map_err(|e| TowerError::InvalidConfig(e.to_string()))
    }

    /// Check every field. Returns the first violation found.
    pub fn validate(&self) -> TowerResult<()> {
        let cells = VoxelLattice::checked_volume(self.grid_x, self.grid_y, self.grid_z).ok_or(
            TowerError::InvalidDimensions {
                x: self.grid_x,
                y: self.grid_y,
                z: self.grid_z,
            },
        )?;
        let bad_count = TowerError::InvalidTowerCount {
            x: self.tower_count_x,
            y: self.tower_count_y,
        };
        if self.tower_count_x <= 0 || self.tower_count_y <= 0 {
            return Err(bad_count);
        }
        let towers = self.tower_count_x as usize * self.tower_count_y as usize;
        if towers > MAX_TOWERS || towers * cells > MAX_TOTAL_CELLS {
            return Err(bad_count);
        }
        if !self.tower_spacing.is_finite() || self.tower_spacing < 0.0 {
            return Err(TowerError::InvalidConfig(format!(
                "tower_spacing must be finite and non-negative, got {}",
                self.tower_spacing
            )));
        }
        if !(0.0..=1.0).contains(&self.seed_density) {
            return Err(TowerError::InvalidConfig(format!(
                "seed_density must lie in [0, 1], got {}",
                self.seed_density
            )));
        }
        if self.rule_shuffle_interval_steps == 0 {
            return Err(TowerError::InvalidConfig(
                "rule_shuffle_interval_steps must be positive".to_string(),
            ));
        }
        if !self.step_rate.is_finite() || self.step_rate < 0.0 {
            return Err(TowerError::InvalidConfig(format!(
                "step_rate must be finite and non-negative, got {}",
                self.step_rate
            )));
        }
        preset_by_name(&self.rule_preset)?;
        Ok(())
    }

    pub fn dims(&self) -> (i16, i16, i16) {
        (self.grid_x, self.grid_y, self.grid_z)
    }

    pub fn seed_params(&self) -> SeedParams {
        SeedParams {
            density: self.seed_density,
            symmetry: self.seed_symmetry,
        }
    }

    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            enabled: self.rule_shuffle_enabled,
            interval_steps: self.rule_shuffle_interval_steps,
            mode: self.rule_shuffle_mode,
        }
    }

    /// The configured preset.
    pub fn starting_rules(&self) -> TowerResult<RuleSet> {
        preset_by_name(&self.rule_preset).cloned()
    }

    /// Whether switching from `self` to `other` needs the towers rebuilt.
    pub fn needs_rebuild(&self, other: &SimulationConfig) -> bool {
        self.dims() != other.dims()
            || self.tower_count_x != other.tower_count_x
            || self.tower_count_y != other.tower_count_y
            || self.seed_params() != other.seed_params()
            || self.random_seed != other.random_seed
            || self.rule_preset != other.rule_preset
    }
}
