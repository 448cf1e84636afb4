//! Core automaton logic.
//!
//! Lattice storage, seeding, rule sets, rule rotation and tower stepping.
//! Everything here is single-tower and synchronous; `towers` and `ffi` build on it.

pub mod lattice;
pub mod region;
pub mod rules;
pub mod scheduler;
pub mod seed;
pub mod stepping;

pub use lattice::{LiveVoxel, VoxelLattice, AGE_CAP, MAX_LATTICE_CELLS, MAX_NEIGHBORS};
pub use region::{extract_region, Region};
pub use rules::{preset_by_index, preset_by_name, RuleSet, CATALOG};
pub use scheduler::{RuleScheduler, ScheduleConfig, ShuffleMode};
pub use seed::{derive_tower_seed, seed_lattice, SeedParams, Symmetry, TowerRng};
pub use stepping::{advance_lattice, AutomatonEngine, EngineState};
