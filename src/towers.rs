//! A grid of independent towers sharing one configuration.
//!
//! Towers never touch each other's lattices, so `step_all` fans out across a
//! rayon pool. Each tower's own pass stays sequential and double-buffered.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::automaton::rules::RuleSet;
use crate::automaton::seed::derive_tower_seed;
use crate::automaton::stepping::AutomatonEngine;
use crate::color::{voxel_color, GradientMode, Hsl};
use crate::config::SimulationConfig;
use crate::error::TowerResult;

/// One live voxel in world space, ready for a renderer or exporter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveVoxel {
    /// Center of the unit cube.
    pub position: [f32; 3],
    pub neighbor_count: u8,
    pub age: u16,
    pub color: Hsl,
}

/// Owns every tower and lays them out on a centered grid.
pub struct TowerArray {
    config: SimulationConfig,
    towers: Vec<AutomatonEngine>,
    thread_pool: Option<rayon::ThreadPool>,
}

impl TowerArray {
    /// Build towers from a validated configuration.
    pub fn new(config: SimulationConfig) -> TowerResult<Self> {
        let mut array = TowerArray {
            thread_pool: None,
            config: SimulationConfig::default(),
            towers: Vec::new(),
        };
        array.configure(config)?;
        Ok(array)
    }

    /// Tear down and rebuild every tower. On error the previous towers stay intact.
    pub fn configure(&mut self, config: SimulationConfig) -> TowerResult<()> {
        let rules = match config.validate().and_then(|()| config.starting_rules()) {
            Ok(rules) => rules,
            Err(err) => {
                warn!(error = %err, "rejected tower configuration");
                return Err(err);
            }
        };
        self.configure_with_rules(config, rules)
    }

    /// Rebuild with a custom starting rule set instead of the configured preset.
    pub fn configure_with_rules(
        &mut self,
        config: SimulationConfig,
        rules: RuleSet,
    ) -> TowerResult<()> {
        let rules_name = rules.name.clone();
        let towers = match build_towers(&config, rules) {
            Ok(towers) => towers,
            Err(err) => {
                warn!(error = %err, "rejected tower configuration");
                return Err(err);
            }
        };

        if config.worker_threads != self.config.worker_threads {
            self.thread_pool = build_pool(config.worker_threads);
        }
        info!(
            towers = towers.len(),
            count_x = config.tower_count_x,
            count_y = config.tower_count_y,
            width = config.grid_x,
            height = config.grid_y,
            depth = config.grid_z,
            seed = config.random_seed,
            rules = %rules_name,
            "towers configured"
        );
        self.towers = towers;
        self.config = config;
        Ok(())
    }

    /// Apply a changed configuration. Layout-affecting changes rebuild the
    /// towers; shuffle, gradient, spacing and rate changes apply in place.
    pub fn apply_config(&mut self, config: SimulationConfig) -> TowerResult<()> {
        if let Err(err) = config.validate() {
            warn!(error = %err, "rejected tower configuration");
            return Err(err);
        }
        if self.config.needs_rebuild(&config) {
            return self.configure(config);
        }
        let schedule = config.schedule();
        for tower in &mut self.towers {
            tower.set_schedule(schedule);
        }
        if config.worker_threads != self.config.worker_threads {
            self.thread_pool = build_pool(config.worker_threads);
        }
        self.config = config;
        Ok(())
    }

    /// Reseed every tower from a new base seed. Step counts and rules reset.
    pub fn reset(&mut self, base_seed: u32) {
        for tower in &mut self.towers {
            tower.reset(derive_tower_seed(base_seed, tower.tower_index()));
        }
        self.config.random_seed = base_seed;
        info!(seed = base_seed, towers = self.towers.len(), "towers reset");
    }

    /// Step every tower once. Returns false when no tower advanced.
    pub fn step_all(&mut self) -> bool {
        let towers = &mut self.towers;
        let mut step = move || {
            towers
                .par_iter_mut()
                .map(AutomatonEngine::step)
                .filter(|&advanced| advanced)
                .count()
        };
        let advanced = match &self.thread_pool {
            Some(pool) => pool.install(step),
            None => step(),
        };
        advanced > 0
    }

    /// True once every tower has converged.
    pub fn is_converged(&self) -> bool {
        self.towers.iter().all(AutomatonEngine::is_converged)
    }

    /// World-space (x, z) center of a tower.
    pub fn world_offset_for(&self, tower_index: usize) -> (f32, f32) {
        let count_x = self.config.tower_count_x as usize;
        let row = tower_index / count_x;
        let col = tower_index % count_x;
        let spacing = self.config.tower_spacing;
        let offset_x = (col as f32 - (self.config.tower_count_x as f32 - 1.0) / 2.0) * spacing;
        let offset_z = (row as f32 - (self.config.tower_count_y as f32 - 1.0) / 2.0) * spacing;
        (offset_x, offset_z)
    }

    /// Visit every live voxel of every tower with its world position,
    /// neighbor count and age. Towers in index order, voxels in z, y, x order.
    ///
    /// Each tower's footprint is centered on its offset; y is the layer index.
    pub fn for_each_active_voxel<F>(&self, mut callback: F)
    where
        F: FnMut([f32; 3], u8, u16),
    {
        for (index, tower) in self.towers.iter().enumerate() {
            let (offset_x, offset_z) = self.world_offset_for(index);
            let lattice = tower.lattice();
            let center_x = (lattice.width() as f32 - 1.0) / 2.0;
            let center_z = (lattice.depth() as f32 - 1.0) / 2.0;
            for voxel in lattice.live_voxels() {
                let position = [
                    offset_x + voxel.x as f32 - center_x,
                    voxel.y as f32,
                    offset_z + voxel.z as f32 - center_z,
                ];
                callback(position, voxel.neighbor_count, voxel.age);
            }
        }
    }

    /// Collect live voxels with colors under `mode`.
    pub fn active_voxels(&self, mode: GradientMode) -> Vec<ActiveVoxel> {
        let mut voxels = Vec::with_capacity(self.active_voxel_count());
        self.for_each_active_voxel(|position, neighbor_count, age| {
            voxels.push(ActiveVoxel {
                position,
                neighbor_count,
                age,
                color: voxel_color(neighbor_count, age, mode),
            });
        });
        voxels
    }

    /// Collect live voxels under the configured gradient mode.
    pub fn active_voxels_default(&self) -> Vec<ActiveVoxel> {
        self.active_voxels(self.config.gradient_mode)
    }

    pub fn active_voxel_count(&self) -> usize {
        self.towers.iter().map(|t| t.lattice().population()).sum()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn towers(&self) -> &[AutomatonEngine] {
        &self.towers
    }

    pub fn tower(&self, tower_index: usize) -> Option<&AutomatonEngine> {
        self.towers.get(tower_index)
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }
}

fn build_towers(config: &SimulationConfig, rules: RuleSet) -> TowerResult<Vec<AutomatonEngine>> {
    config.validate()?;
    rules.validate()?;

    let count = config.tower_count_x as usize * config.tower_count_y as usize;
    (0..count as u32)
        .map(|tower_index| {
            AutomatonEngine::new(
                tower_index,
                config.dims(),
                derive_tower_seed(config.random_seed, tower_index),
                config.seed_params(),
                rules.clone(),
                config.schedule(),
            )
        })
        .collect()
}

/// A dedicated pool for `worker_threads > 0`, otherwise the global rayon pool.
fn build_pool(worker_threads: u8) -> Option<rayon::ThreadPool> {
    if worker_threads == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads as usize)
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(error = %err, threads = worker_threads, "falling back to global rayon pool");
            None
        }
    }
}
