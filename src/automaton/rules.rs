//! Birth/survival rule sets and the preset catalog.

use std::borrow::Cow;

use super::lattice::MAX_NEIGHBORS;
use crate::error::{TowerError, TowerResult};

/// Inclusive neighbor-count thresholds for birth and survival.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleSet {
    pub name: Cow<'static, str>,
    pub birth_min: u8,
    pub birth_max: u8,
    pub survive_min: u8,
    pub survive_max: u8,
}

impl RuleSet {
    /// Build a custom rule set, rejecting inverted or out-of-range bounds.
    pub fn new(
        name: impl Into<String>,
        birth: (u8, u8),
        survive: (u8, u8),
    ) -> TowerResult<Self> {
        let rules = RuleSet {
            name: Cow::Owned(name.into()),
            birth_min: birth.0,
            birth_max: birth.1,
            survive_min: survive.0,
            survive_max: survive.1,
        };
        rules.validate()?;
        Ok(rules)
    }

    const fn preset(name: &'static str, birth: (u8, u8), survive: (u8, u8)) -> Self {
        RuleSet {
            name: Cow::Borrowed(name),
            birth_min: birth.0,
            birth_max: birth.1,
            survive_min: survive.0,
            survive_max: survive.1,
        }
    }

    pub fn validate(&self) -> TowerResult<()> {
        let fail = |reason: String| {
            Err(TowerError::InvalidRule {
                name: self.name.to_string(),
                reason,
            })
        };
        if self.birth_max > MAX_NEIGHBORS || self.survive_max > MAX_NEIGHBORS {
            return fail(format!("bounds must lie within [0, {MAX_NEIGHBORS}]"));
        }
        if self.birth_min > self.birth_max {
            return fail(format!(
                "birth range [{}, {}] is inverted",
                self.birth_min, self.birth_max
            ));
        }
        if self.survive_min > self.survive_max {
            return fail(format!(
                "survive range [{}, {}] is inverted",
                self.survive_min, self.survive_max
            ));
        }
        Ok(())
    }

    /// Whether a dead cell with `n` neighbors comes alive.
    #[inline]
    pub fn births(&self, n: u8) -> bool {
        (self.birth_min..=self.birth_max).contains(&n)
    }

    /// Whether a live cell with `n` neighbors stays alive.
    #[inline]
    pub fn survives(&self, n: u8) -> bool {
        (self.survive_min..=self.survive_max).contains(&n)
    }
}

/// The fixed, ordered preset catalog.
pub static CATALOG: [RuleSet; 8] = [
    RuleSet::preset("Spine Rise", (4, 6), (3, 7)),
    RuleSet::preset("Coral Bloom", (3, 5), (2, 8)),
    RuleSet::preset("Lattice Spire", (5, 7), (4, 9)),
    RuleSet::preset("Hollow Column", (4, 4), (5, 10)),
    RuleSet::preset("Crystal Drift", (2, 3), (3, 6)),
    RuleSet::preset("Sparse Needle", (1, 2), (1, 3)),
    RuleSet::preset("Dense Monolith", (6, 12), (5, 18)),
    RuleSet::preset("Fractured Arch", (3, 4), (6, 8)),
];

/// Look up a preset by exact name.
pub fn preset_by_name(name: &str) -> TowerResult<&'static RuleSet> {
    CATALOG
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| TowerError::UnknownPreset(name.to_string()))
}

/// Look up a preset by catalog position.
pub fn preset_by_index(index: usize) -> Option<&'static RuleSet> {
    CATALOG.get(index)
}

/// Catalog position of a rule set, if it is one of the presets.
pub fn catalog_index_of(rules: &RuleSet) -> Option<usize> {
    CATALOG.iter().position(|r| r == rules)
}
