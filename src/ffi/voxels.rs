//! Voxel readout: counts, colored voxel streams, dense region snapshots.

use crate::automaton::region::{extract_region, Region};
use crate::towers::TowerArray;

/// Floats written per voxel by `ta_extract_voxels`: x, y, z, r, g, b, age.
pub const VOXEL_STRIDE: usize = 7;

/// Number of live voxels across all towers, or 0 for a null pointer.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_active_voxel_count(ptr: *const TowerArray) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).active_voxel_count() as u64
}

/// Writes live voxels as `VOXEL_STRIDE` floats each: world position, RGB color
/// under the configured gradient, and age.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
/// - `out_buf` must point to at least `capacity * VOXEL_STRIDE` floats
///
/// # Returns
/// Number of voxels written (at most `capacity`), or 0 on null pointers.
#[no_mangle]
pub unsafe extern "C" fn ta_extract_voxels(
    ptr: *const TowerArray,
    out_buf: *mut f32,
    capacity: u64,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }
    let array = &*ptr;
    let out = std::slice::from_raw_parts_mut(out_buf, capacity as usize * VOXEL_STRIDE);

    let mut written = 0;
    for (voxel, chunk) in array
        .active_voxels_default()
        .iter()
        .zip(out.chunks_exact_mut(VOXEL_STRIDE))
    {
        let [r, g, b] = voxel.color.to_rgb();
        let [x, y, z] = voxel.position;
        chunk.copy_from_slice(&[x, y, z, r, g, b, f32::from(voxel.age)]);
        written += 1;
    }
    written
}

/// Extracts a box of one tower's lattice into a flat byte buffer (1 alive, 0 dead).
///
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
/// Coordinates are clamped to the lattice.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
/// - `out_buf` must point to at least `len` bytes
///
/// # Returns
/// Number of bytes written, or 0 on error (null pointers, unknown tower,
/// empty region, short buffer).
#[no_mangle]
pub unsafe extern "C" fn ta_extract_region(
    ptr: *const TowerArray,
    tower_index: u32,
    out_buf: *mut u8,
    len: u64,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }
    let tower = match (*ptr).tower(tower_index as usize) {
        Some(t) => t,
        None => return 0,
    };
    let out = std::slice::from_raw_parts_mut(out_buf, len as usize);
    let region = Region {
        min: [min_x, min_y, min_z],
        max: [max_x, max_y, max_z],
    };
    extract_region(tower.lattice(), region, out) as u64
}

/// Reads one cell of one tower (1 alive, 0 dead or out of range).
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_get_cell(
    ptr: *const TowerArray,
    tower_index: u32,
    x: i16,
    y: i16,
    z: i16,
) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    match (*ptr).tower(tower_index as usize) {
        Some(tower) if tower.lattice().in_bounds(x, y, z) => u8::from(tower.lattice().get(x, y, z)),
        _ => 0,
    }
}
