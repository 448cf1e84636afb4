//! Deterministic seeding of a tower's bottom layer.
//!
//! The generator is a fixed 32-bit splitmix-style mixer so the same seed yields
//! the same layout on every platform and in every implementation that follows it:
//!
//! ```text
//! s += 0x9E3779B9
//! z = s
//! z = (z ^ (z >> 16)) * 0x85EBCA6B
//! z = (z ^ (z >> 13)) * 0xC2B2AE35
//! out = z ^ (z >> 16)
//! ```

use serde::{Deserialize, Serialize};

use super::lattice::VoxelLattice;

const GOLDEN_GAMMA: u32 = 0x9E37_79B9;

/// Avalanche finalizer shared by the generator and per-tower seed derivation.
#[inline]
pub const fn mix32(mut z: u32) -> u32 {
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Derive an independent seed for tower `tower_index` from a base seed.
#[inline]
pub const fn derive_tower_seed(base_seed: u32, tower_index: u32) -> u32 {
    mix32(base_seed ^ tower_index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA))
}

/// Portable deterministic random source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerRng {
    state: u32,
}

impl TowerRng {
    pub fn new(seed: u32) -> Self {
        TowerRng { state: seed }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix32(self.state)
    }

    /// Uniform float in [0, 1) with 24 bits of precision.
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in [0, n). Returns 0 for n == 0.
    #[inline]
    pub fn next_below(&mut self, n: usize) -> usize {
        ((u64::from(self.next_u32()) * n as u64) >> 32) as usize
    }
}

/// How the bottom layer is sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symmetry {
    /// Every cell sampled independently.
    Asymmetric,
    /// Mirrored across the X midline.
    #[default]
    Mirror,
    /// Mirrored across both the X and Z midlines.
    FourWay,
}

/// Seeding inputs besides the seed itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedParams {
    /// Probability that a sampled cell starts alive, in [0, 1].
    pub density: f32,
    pub symmetry: Symmetry,
}

/// Clear the lattice and populate its bottom layer (y = 0).
///
/// Only the sampled part of the layer draws from `rng`; reflected cells copy
/// their source. Recorded neighbor counts of the bottom layer are refreshed
/// afterwards and every age is zero.
pub fn seed_lattice(lattice: &mut VoxelLattice, rng: &mut TowerRng, params: SeedParams) {
    lattice.clear();

    let width = lattice.width();
    let depth = lattice.depth();
    let half_x = (width + 1) / 2;
    let half_z = (depth + 1) / 2;

    let (span_x, span_z) = match params.symmetry {
        Symmetry::Asymmetric => (width, depth),
        Symmetry::Mirror => (half_x, depth),
        Symmetry::FourWay => (half_x, half_z),
    };

    for z in 0..span_z {
        for x in 0..span_x {
            if rng.next_unit() >= params.density {
                continue;
            }
            lattice.set(x, 0, z, true);
            match params.symmetry {
                Symmetry::Asymmetric => {}
                Symmetry::Mirror => lattice.set(width - 1 - x, 0, z, true),
                Symmetry::FourWay => {
                    lattice.set(width - 1 - x, 0, z, true);
                    lattice.set(x, 0, depth - 1 - z, true);
                    lattice.set(width - 1 - x, 0, depth - 1 - z, true);
                }
            }
        }
    }

    for z in 0..depth {
        for x in 0..width {
            let n = lattice.neighbor_count_at(x, 0, z);
            let idx = lattice.index_of(x, 0, z);
            lattice.set_neighbor_count(idx, n);
        }
    }
}
