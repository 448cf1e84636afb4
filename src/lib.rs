//! Tower Automata - procedural voxel towers from a 3D cellular automaton
//!
//! Each tower is a voxel lattice seeded on its bottom layer and grown upward by
//! birth/survival rules over the 26-cell Moore neighborhood. A [`TowerArray`]
//! lays out a grid of independent towers and exposes their live voxels, with
//! per-voxel age and neighbor count, to renderers and exporters.
//!
//! The library is usable from Rust directly or through the C ABI in [`ffi`].

pub mod automaton;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod ffi;
pub mod towers;

pub use automaton::{
    AutomatonEngine, EngineState, RuleScheduler, RuleSet, ScheduleConfig, ShuffleMode, Symmetry,
    VoxelLattice, CATALOG,
};
pub use clock::StepClock;
pub use color::{voxel_color, GradientMode, Hsl};
pub use config::SimulationConfig;
pub use error::{TowerError, TowerResult};
pub use towers::{ActiveVoxel, TowerArray};
