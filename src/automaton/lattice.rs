//! Dense voxel storage for one tower: alive flags plus per-cell neighbor count and age.

use crate::error::{TowerError, TowerResult};

/// Age saturates here instead of wrapping.
pub const AGE_CAP: u16 = 1000;

/// Largest possible neighbor count (full 3x3x3 Moore neighborhood).
pub const MAX_NEIGHBORS: u8 = 26;

/// Upper bound on cells in one lattice.
pub const MAX_LATTICE_CELLS: usize = 1 << 24;

/// A fixed-size 3D lattice of voxels.
///
/// Cell (x, y, z) lives at `x + width * (y + height * z)`. Y is the growth axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelLattice {
    width: i16,
    height: i16,
    depth: i16,
    alive: Vec<bool>,
    neighbors: Vec<u8>,
    age: Vec<u16>,
}

/// One live voxel as seen by readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveVoxel {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub neighbor_count: u8,
    pub age: u16,
}

impl VoxelLattice {
    /// Create an all-dead lattice. Every axis must be positive and the volume
    /// at most [`MAX_LATTICE_CELLS`].
    pub fn new(width: i16, height: i16, depth: i16) -> TowerResult<Self> {
        let size = Self::checked_volume(width, height, depth).ok_or(
            TowerError::InvalidDimensions {
                x: width,
                y: height,
                z: depth,
            },
        )?;
        Ok(VoxelLattice {
            width,
            height,
            depth,
            alive: vec![false; size],
            neighbors: vec![0; size],
            age: vec![0; size],
        })
    }

    /// Cell count for the given extents, or `None` if any axis is non-positive
    /// or the volume exceeds [`MAX_LATTICE_CELLS`].
    pub fn checked_volume(width: i16, height: i16, depth: i16) -> Option<usize> {
        if width <= 0 || height <= 0 || depth <= 0 {
            return None;
        }
        let size = (width as usize) * (height as usize) * (depth as usize);
        (size <= MAX_LATTICE_CELLS).then_some(size)
    }

    #[inline]
    pub fn width(&self) -> i16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i16 {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> i16 {
        self.depth
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Calculate the linear index for a 3D coordinate.
    #[inline]
    pub fn index_of(&self, x: i16, y: i16, z: i16) -> usize {
        debug_assert!(
            self.in_bounds(x, y, z),
            "voxel ({x}, {y}, {z}) outside {}x{}x{} lattice",
            self.width,
            self.height,
            self.depth
        );
        z as usize * self.height as usize * self.width as usize
            + y as usize * self.width as usize
            + x as usize
    }

    /// Check if coordinates are within lattice bounds.
    #[inline]
    pub fn in_bounds(&self, x: i16, y: i16, z: i16) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.depth
    }

    /// Alive flag. Out-of-range reads assert in debug builds and read as dead otherwise.
    #[inline]
    pub fn get(&self, x: i16, y: i16, z: i16) -> bool {
        debug_assert!(self.in_bounds(x, y, z));
        if !self.in_bounds(x, y, z) {
            return false;
        }
        self.alive[self.index_of(x, y, z)]
    }

    /// Write an alive flag. Out-of-range writes assert in debug builds and are dropped otherwise.
    #[inline]
    pub fn set(&mut self, x: i16, y: i16, z: i16, alive: bool) {
        debug_assert!(self.in_bounds(x, y, z));
        if !self.in_bounds(x, y, z) {
            return;
        }
        let idx = self.index_of(x, y, z);
        self.alive[idx] = alive;
    }

    /// Count alive neighbors using Moore neighborhood (26 neighbors).
    /// Neighbors outside the lattice do not count; there is no wraparound.
    pub fn neighbor_count_at(&self, x: i16, y: i16, z: i16) -> u8 {
        let mut count = 0;

        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    // Skip the center cell
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }

                    let nx = x + dx;
                    let ny = y + dy;
                    let nz = z + dz;

                    if self.in_bounds(nx, ny, nz) && self.alive[self.index_of(nx, ny, nz)] {
                        count += 1;
                    }
                }
            }
        }

        count
    }

    /// Neighbor count recorded by the last seeding or step.
    #[inline]
    pub fn neighbor_count(&self, x: i16, y: i16, z: i16) -> u8 {
        self.neighbors[self.index_of(x, y, z)]
    }

    /// Consecutive steps the cell has been alive.
    #[inline]
    pub fn age(&self, x: i16, y: i16, z: i16) -> u16 {
        self.age[self.index_of(x, y, z)]
    }

    /// Kill every cell and zero every attribute.
    pub fn clear(&mut self) {
        self.alive.fill(false);
        self.neighbors.fill(0);
        self.age.fill(0);
    }

    /// Number of alive cells.
    pub fn population(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Number of alive cells in one horizontal layer.
    pub fn layer_population(&self, y: i16) -> usize {
        let mut count = 0;
        for z in 0..self.depth {
            for x in 0..self.width {
                if self.alive[self.index_of(x, y, z)] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Iterate live voxels in z, y, x order (x fastest).
    pub fn live_voxels(&self) -> impl Iterator<Item = LiveVoxel> + '_ {
        let (w, h) = (self.width as usize, self.height as usize);
        self.alive
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(move |(idx, _)| LiveVoxel {
                x: (idx % w) as i16,
                y: ((idx / w) % h) as i16,
                z: (idx / (w * h)) as i16,
                neighbor_count: self.neighbors[idx],
                age: self.age[idx],
            })
    }

    /// Store a full cell record by linear index. Used by seeding and stepping.
    #[inline]
    pub(crate) fn store(&mut self, idx: usize, alive: bool, neighbors: u8, age: u16) {
        self.alive[idx] = alive;
        self.neighbors[idx] = neighbors;
        self.age[idx] = age;
    }

    #[inline]
    pub(crate) fn alive_at(&self, idx: usize) -> bool {
        self.alive[idx]
    }

    #[inline]
    pub(crate) fn age_at(&self, idx: usize) -> u16 {
        self.age[idx]
    }

    #[inline]
    pub(crate) fn set_neighbor_count(&mut self, idx: usize, neighbors: u8) {
        self.neighbors[idx] = neighbors;
    }
}
