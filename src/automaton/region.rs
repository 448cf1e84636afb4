//! Dense snapshots of a lattice box for chunked renderers.

use super::lattice::VoxelLattice;

/// An axis-aligned box, min inclusive, max exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: [i16; 3],
    pub max: [i16; 3],
}

impl Region {
    /// The whole lattice.
    pub fn full(lattice: &VoxelLattice) -> Self {
        Region {
            min: [0, 0, 0],
            max: [lattice.width(), lattice.height(), lattice.depth()],
        }
    }

    /// Clamp both corners into the lattice. Returns None if the result is empty.
    pub fn clamp_to(self, lattice: &VoxelLattice) -> Option<Region> {
        let limits = [lattice.width(), lattice.height(), lattice.depth()];
        let mut min = [0i16; 3];
        let mut max = [0i16; 3];
        for axis in 0..3 {
            min[axis] = self.min[axis].max(0).min(limits[axis]);
            max[axis] = self.max[axis].max(0).min(limits[axis]);
            if min[axis] >= max[axis] {
                return None;
            }
        }
        Some(Region { min, max })
    }

    /// Number of cells covered.
    pub fn volume(&self) -> usize {
        (0..3)
            .map(|axis| (self.max[axis] - self.min[axis]).max(0) as usize)
            .product()
    }
}

/// Extract alive flags of a box into a flat buffer (1 = alive, 0 = dead).
///
/// # Layout
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
///
/// # Returns
/// Number of bytes written, or 0 if the clamped region is empty or the buffer too small.
pub fn extract_region(lattice: &VoxelLattice, region: Region, out_buf: &mut [u8]) -> usize {
    let region = match region.clamp_to(lattice) {
        Some(r) => r,
        None => return 0,
    };

    if out_buf.len() < region.volume() {
        return 0;
    }

    let mut offset = 0;
    for z in region.min[2]..region.max[2] {
        for y in region.min[1]..region.max[1] {
            for x in region.min[0]..region.max[0] {
                out_buf[offset] = u8::from(lattice.get(x, y, z));
                offset += 1;
            }
        }
    }

    offset
}
