//! Handle creation, destruction, and step queries.

use crate::config::SimulationConfig;
use crate::towers::TowerArray;

/// Creates a tower array with the default configuration.
///
/// # Returns
/// A pointer to a new TowerArray, or null if construction failed.
///
/// # Safety
/// The returned pointer must eventually be freed with `ta_destroy()`.
#[no_mangle]
pub extern "C" fn ta_create() -> *mut TowerArray {
    match TowerArray::new(SimulationConfig::default()) {
        Ok(array) => Box::into_raw(Box::new(array)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Destroys a tower array and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ta_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn ta_destroy(ptr: *mut TowerArray) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the completed step count of one tower.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
///
/// # Returns
/// The step index, or 0 if ptr is null or the tower does not exist.
#[no_mangle]
pub unsafe extern "C" fn ta_step_index(ptr: *const TowerArray, tower_index: u32) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr)
        .tower(tower_index as usize)
        .map_or(0, |tower| tower.step_index())
}
