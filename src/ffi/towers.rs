//! Configuration, stepping and reset.

use std::ffi::{c_char, CStr};

use super::{status_of, STATUS_NULL};
use crate::automaton::rules::preset_by_index;
use crate::automaton::scheduler::ShuffleMode;
use crate::automaton::seed::Symmetry;
use crate::color::GradientMode;
use crate::config::SimulationConfig;
use crate::error::TowerError;
use crate::towers::TowerArray;

fn symmetry_from(code: u8) -> Option<Symmetry> {
    match code {
        0 => Some(Symmetry::Asymmetric),
        1 => Some(Symmetry::Mirror),
        2 => Some(Symmetry::FourWay),
        _ => None,
    }
}

fn gradient_from(code: u8) -> Option<GradientMode> {
    match code {
        0 => Some(GradientMode::Solid),
        1 => Some(GradientMode::Age),
        2 => Some(GradientMode::Neighbors),
        _ => None,
    }
}

/// Rebuilds every tower with a new layout and seeding.
///
/// `symmetry`: 0 asymmetric, 1 mirror, 2 four-way.
/// `preset_index`: position in the rule preset catalog.
/// Shuffle and gradient settings are kept.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
///
/// # Returns
/// 0 on success, 1 on null pointer, otherwise an error status. On error the
/// previous towers are untouched.
#[no_mangle]
pub unsafe extern "C" fn ta_configure(
    ptr: *mut TowerArray,
    grid_x: i16,
    grid_y: i16,
    grid_z: i16,
    tower_count_x: i16,
    tower_count_y: i16,
    tower_spacing: f32,
    seed_density: f32,
    symmetry: u8,
    random_seed: u32,
    preset_index: u8,
) -> i32 {
    if ptr.is_null() {
        return STATUS_NULL;
    }
    let array = &mut *ptr;

    let seed_symmetry = match symmetry_from(symmetry) {
        Some(s) => s,
        None => return TowerError::InvalidConfig(format!("unknown symmetry {symmetry}")).code(),
    };
    let rule_preset = match preset_by_index(preset_index as usize) {
        Some(rules) => rules.name.to_string(),
        None => return TowerError::UnknownPreset(format!("#{preset_index}")).code(),
    };

    let config = SimulationConfig {
        grid_x,
        grid_y,
        grid_z,
        tower_count_x,
        tower_count_y,
        tower_spacing,
        seed_density,
        seed_symmetry,
        random_seed,
        rule_preset,
        ..array.config().clone()
    };
    status_of(array.configure(config))
}

/// Applies a TOML configuration. Layout changes rebuild the towers, other
/// changes apply in place.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
/// - `text` must be a NUL-terminated string, or null
#[no_mangle]
pub unsafe extern "C" fn ta_configure_toml(ptr: *mut TowerArray, text: *const c_char) -> i32 {
    if ptr.is_null() || text.is_null() {
        return STATUS_NULL;
    }
    let array = &mut *ptr;

    let text = match CStr::from_ptr(text).to_str() {
        Ok(t) => t,
        Err(e) => return TowerError::InvalidConfig(e.to_string()).code(),
    };
    status_of(SimulationConfig::from_toml_str(text).and_then(|config| array.apply_config(config)))
}

/// Changes rule rotation without reseeding.
///
/// `mode`: 0 cycle, 1 random.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_set_shuffle(
    ptr: *mut TowerArray,
    enabled: u8,
    interval_steps: u32,
    mode: u8,
) -> i32 {
    if ptr.is_null() {
        return STATUS_NULL;
    }
    let array = &mut *ptr;

    let rule_shuffle_mode = match mode {
        0 => ShuffleMode::Cycle,
        1 => ShuffleMode::Random,
        _ => return TowerError::InvalidConfig(format!("unknown shuffle mode {mode}")).code(),
    };
    let config = SimulationConfig {
        rule_shuffle_enabled: enabled != 0,
        rule_shuffle_interval_steps: interval_steps,
        rule_shuffle_mode,
        ..array.config().clone()
    };
    status_of(array.apply_config(config))
}

/// Selects the gradient used by `ta_extract_voxels`.
///
/// `mode`: 0 solid, 1 age, 2 neighbors.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_set_gradient(ptr: *mut TowerArray, mode: u8) -> i32 {
    if ptr.is_null() {
        return STATUS_NULL;
    }
    let array = &mut *ptr;

    let gradient_mode = match gradient_from(mode) {
        Some(g) => g,
        None => return TowerError::InvalidConfig(format!("unknown gradient mode {mode}")).code(),
    };
    let config = SimulationConfig {
        gradient_mode,
        ..array.config().clone()
    };
    status_of(array.apply_config(config))
}

/// Steps every tower once.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
///
/// # Returns
/// 1 if any tower advanced, 0 if all have converged or ptr is null.
#[no_mangle]
pub unsafe extern "C" fn ta_step_all(ptr: *mut TowerArray) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    u8::from((*ptr).step_all())
}

/// Reseeds every tower from a new base seed.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_reset(ptr: *mut TowerArray, base_seed: u32) {
    if ptr.is_null() {
        return;
    }
    (*ptr).reset(base_seed);
}

/// Number of towers, or 0 for a null pointer.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_tower_count(ptr: *const TowerArray) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).len() as u32
}

/// 1 once every tower has converged, else 0. Null reads as converged.
///
/// # Safety
/// - `ptr` must be a valid pointer to a TowerArray, or null
#[no_mangle]
pub unsafe extern "C" fn ta_is_converged(ptr: *const TowerArray) -> u8 {
    if ptr.is_null() {
        return 1;
    }
    u8::from((*ptr).is_converged())
}
