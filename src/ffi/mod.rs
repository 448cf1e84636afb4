//! C FFI layer for host applications.
//!
//! All functions are `#[no_mangle] extern "C"` and operate on an opaque
//! `TowerArray` handle. They are thin wrappers: null checks, C-to-Rust
//! conversions, and error-to-status mapping. The logic lives in `towers`
//! and `automaton`.
//!
//! Status codes: 0 ok, 1 null handle or argument, otherwise [`TowerError::code`].
//!
//! [`TowerError::code`]: crate::error::TowerError::code

pub mod lifecycle;
pub mod towers;
pub mod voxels;

pub use lifecycle::{ta_create, ta_destroy, ta_step_index};
pub use towers::{
    ta_configure, ta_configure_toml, ta_is_converged, ta_reset, ta_set_gradient, ta_set_shuffle,
    ta_step_all, ta_tower_count,
};
pub use voxels::{
    ta_active_voxel_count, ta_extract_region, ta_extract_voxels, ta_get_cell, VOXEL_STRIDE,
};

pub(crate) const STATUS_OK: i32 = 0;
pub(crate) const STATUS_NULL: i32 = 1;

pub(crate) fn status_of(result: crate::error::TowerResult<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => err.code(),
    }
}
