//! Error types for configuration and reset.
//!
//! Stepping never fails; everything here is raised before any lattice is touched.

use thiserror::Error;

/// Errors raised while configuring or resetting towers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TowerError {
    /// A lattice dimension was zero or negative, or the volume is too large.
    #[error("invalid lattice dimensions {x}x{y}x{z}: axes must be positive, volume bounded")]
    InvalidDimensions {
        /// Requested X extent.
        x: i16,
        /// Requested Y (vertical) extent.
        y: i16,
        /// Requested Z extent.
        z: i16,
    },

    /// A tower grid count was zero or negative, or the grid is too large.
    #[error("invalid tower count {x}x{y}: counts must be positive, total bounded")]
    InvalidTowerCount {
        /// Towers along X.
        x: i16,
        /// Towers along Z.
        y: i16,
    },

    /// A rule set failed its bounds check.
    #[error("invalid rule set {name:?}: {reason}")]
    InvalidRule {
        /// Name of the offending rule set.
        name: String,
        /// Which bound was violated.
        reason: String,
    },

    /// No preset with this name exists in the catalog.
    #[error("unknown rule preset: {0:?}")]
    UnknownPreset(String),

    /// Configuration text could not be parsed or carries out-of-range values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for tower operations.
pub type TowerResult<T> = Result<T, TowerError>;

impl TowerError {
    /// Status code reported across the C ABI. 0 and 1 are reserved for
    /// success and null handles.
    pub fn code(&self) -> i32 {
        match self {
            TowerError::InvalidDimensions { .. } => 2,
            TowerError::InvalidTowerCount { .. } => 3,
            TowerError::InvalidRule { .. } => 4,
            TowerError::UnknownPreset(_) => 5,
            TowerError::InvalidConfig(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            TowerError::InvalidDimensions { x: 0, y: 1, z: 1 },
            TowerError::InvalidTowerCount { x: 0, y: 1 },
            TowerError::InvalidRule {
                name: "x".into(),
                reason: "y".into(),
            },
            TowerError::UnknownPreset("z".into()),
            TowerError::InvalidConfig("w".into()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(TowerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_display_mentions_preset_name() {
        let err = TowerError::UnknownPreset("Nope".into());
        assert_eq!(err.to_string(), "unknown rule preset: \"Nope\"");
    }
}
