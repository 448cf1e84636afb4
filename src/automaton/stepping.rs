//! Tower stepping: birth/survival over the 3D Moore neighborhood.
//!
//! Every step reads only the pre-step lattice and writes a second buffer,
//! then swaps. Iteration order cannot leak into the result.

use tracing::{debug, info};

use super::lattice::{VoxelLattice, AGE_CAP};
use super::rules::{catalog_index_of, RuleSet};
use super::scheduler::{RuleScheduler, ScheduleConfig};
use super::seed::{seed_lattice, SeedParams, TowerRng};
use crate::error::TowerResult;

/// Compute the successor of `current` under `rules` into `next`.
///
/// Dead cells with a neighbor count inside the birth range come alive at age 1.
/// Live cells inside the survive range keep living and age by one, saturating
/// at [`AGE_CAP`]. Everything else is dead at age 0. The neighbor count read
/// from `current` is recorded on every cell.
pub fn advance_lattice(current: &VoxelLattice, rules: &RuleSet, next: &mut VoxelLattice) {
    debug_assert_eq!(current.len(), next.len());

    for z in 0..current.depth() {
        for y in 0..current.height() {
            for x in 0..current.width() {
                let neighbors = current.neighbor_count_at(x, y, z);
                let idx = current.index_of(x, y, z);

                let (alive, age) = if current.alive_at(idx) {
                    if rules.survives(neighbors) {
                        (true, current.age_at(idx).saturating_add(1).min(AGE_CAP))
                    } else {
                        (false, 0)
                    }
                } else if rules.births(neighbors) {
                    (true, 1)
                } else {
                    (false, 0)
                };

                next.store(idx, alive, neighbors, age);
            }
        }
    }
}

/// Lifecycle of one tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Freshly seeded, no step applied.
    Seeded,
    /// Growing toward the top of the lattice.
    Stepping,
    /// Reached the top; further steps are no-ops.
    Converged,
}

/// One independently evolving tower.
#[derive(Clone, Debug)]
pub struct AutomatonEngine {
    tower_index: u32,
    lattice: VoxelLattice,
    scratch: VoxelLattice,
    step_index: u32,
    rules: RuleSet,
    starting_rules: RuleSet,
    scheduler: RuleScheduler,
    seed_params: SeedParams,
    seed: u32,
    rng: TowerRng,
}

impl AutomatonEngine {
    /// Allocate and seed a tower.
    ///
    /// Fails with `InvalidDimensions` for non-positive extents and
    /// `InvalidRule` if `starting_rules` does not validate.
    pub fn new(
        tower_index: u32,
        dims: (i16, i16, i16),
        seed: u32,
        seed_params: SeedParams,
        starting_rules: RuleSet,
        schedule: ScheduleConfig,
    ) -> TowerResult<Self> {
        let lattice = VoxelLattice::new(dims.0, dims.1, dims.2)?;
        starting_rules.validate()?;
        let cursor = catalog_index_of(&starting_rules).unwrap_or(0);

        let mut engine = AutomatonEngine {
            tower_index,
            scratch: lattice.clone(),
            lattice,
            step_index: 0,
            rules: starting_rules.clone(),
            starting_rules,
            scheduler: RuleScheduler::new(schedule, cursor),
            seed_params,
            seed,
            rng: TowerRng::new(seed),
        };
        engine.reset(seed);
        Ok(engine)
    }

    /// Reseed from scratch: fresh layout, step 0, starting rule set.
    pub fn reset(&mut self, seed: u32) {
        self.seed = seed;
        self.rng = TowerRng::new(seed);
        seed_lattice(&mut self.lattice, &mut self.rng, self.seed_params);
        self.scratch.clear();
        self.step_index = 0;
        self.rules = self.starting_rules.clone();
        self.scheduler
            .set_cursor(catalog_index_of(&self.starting_rules).unwrap_or(0));
    }

    /// Reallocate at new dimensions and reseed. On error the tower is untouched.
    pub fn resize(&mut self, dims: (i16, i16, i16), seed: u32) -> TowerResult<()> {
        let lattice = VoxelLattice::new(dims.0, dims.1, dims.2)?;
        self.scratch = lattice.clone();
        self.lattice = lattice;
        self.reset(seed);
        info!(
            tower = self.tower_index,
            width = dims.0,
            height = dims.1,
            depth = dims.2,
            "tower resized"
        );
        Ok(())
    }

    /// Apply one synchronized step. Returns false (and changes nothing) once converged.
    pub fn step(&mut self) -> bool {
        if self.is_converged() {
            return false;
        }

        advance_lattice(&self.lattice, &self.rules, &mut self.scratch);
        std::mem::swap(&mut self.lattice, &mut self.scratch);
        self.step_index += 1;

        let next = self
            .scheduler
            .maybe_rotate(self.step_index, &self.rules, &mut self.rng);
        if next != self.rules {
            debug!(
                tower = self.tower_index,
                step = self.step_index,
                from = %self.rules.name,
                to = %next.name,
                "rule set rotated"
            );
            self.rules = next;
        }

        if self.is_converged() {
            debug!(
                tower = self.tower_index,
                steps = self.step_index,
                population = self.lattice.population(),
                "tower converged"
            );
        }
        true
    }

    pub fn state(&self) -> EngineState {
        if self.is_converged() {
            EngineState::Converged
        } else if self.step_index == 0 {
            EngineState::Seeded
        } else {
            EngineState::Stepping
        }
    }

    /// True once the growth front has reached the top layer.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.step_index as i64 >= self.lattice.height() as i64 - 1
    }

    #[inline]
    pub fn step_index(&self) -> u32 {
        self.step_index
    }

    #[inline]
    pub fn tower_index(&self) -> u32 {
        self.tower_index
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn lattice(&self) -> &VoxelLattice {
        &self.lattice
    }

    /// Rule set the next step will use.
    #[inline]
    pub fn active_rules(&self) -> &RuleSet {
        &self.rules
    }

    #[inline]
    pub fn starting_rules(&self) -> &RuleSet {
        &self.starting_rules
    }

    #[inline]
    pub fn scheduler(&self) -> &RuleScheduler {
        &self.scheduler
    }

    /// Swap rotation settings without reseeding.
    pub fn set_schedule(&mut self, schedule: ScheduleConfig) {
        self.scheduler.config = schedule;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::rules::{preset_by_name, CATALOG};
    use crate::automaton::scheduler::ShuffleMode;
    use crate::automaton::seed::Symmetry;

    fn params(density: f32, symmetry: Symmetry) -> SeedParams {
        SeedParams { density, symmetry }
    }

    fn generous() -> RuleSet {
        RuleSet::new("generous", (1, 26), (1, 26)).unwrap()
    }

    #[test]
    fn test_golden_step_3x3x3() {
        // Pattern: an L in the bottom layer plus one cell in the middle layer.
        let mut current = VoxelLattice::new(3, 3, 3).unwrap();
        current.set(0, 0, 0, true);
        current.set(1, 0, 0, true);
        current.set(0, 0, 1, true);
        current.set(1, 1, 1, true);

        let rules = RuleSet::new("golden", (2, 3), (2, 4)).unwrap();
        let mut next = VoxelLattice::new(3, 3, 3).unwrap();
        advance_lattice(&current, &rules, &mut next);

        // Expected value computed cell by cell against the pre-step lattice.
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    let n = current.neighbor_count_at(x, y, z);
                    let expected = if current.get(x, y, z) {
                        (2..=4).contains(&n)
                    } else {
                        (2..=3).contains(&n)
                    };
                    assert_eq!(next.get(x, y, z), expected, "cell ({x},{y},{z}) n={n}");
                    assert_eq!(next.neighbor_count(x, y, z), n);
                }
            }
        }

        // Spot checks worked by hand.
        // (0,0,0): neighbors (1,0,0) (0,0,1) (1,1,1) = 3, survives
        assert!(next.get(0, 0, 0));
        assert_eq!(next.age(0, 0, 0), 1);
        // (1,1,1): neighbors are the three bottom cells = 3, survives
        assert!(next.get(1, 1, 1));
        // (1,0,1): dead, neighbors all four = 4, not born
        assert!(!next.get(1, 0, 1));
        assert_eq!(next.neighbor_count(1, 0, 1), 4);
        // (2,2,2): dead, only (1,1,1) = 1, not born
        assert!(!next.get(2, 2, 2));
        // (0,1,0): dead, all four = 4, not born
        assert!(!next.get(0, 1, 0));
        // (2,1,2): dead, only (1,1,1) = 1
        assert!(!next.get(2, 1, 2));
        // (2,0,0): dead, (1,0,0) and (1,1,1) = 2, born
        assert!(next.get(2, 0, 0));
        assert_eq!(next.age(2, 0, 0), 1);
    }

    #[test]
    fn test_step_is_synchronized() {
        // A row of three along X: with birth/survive exactly 2 the ends die,
        // nothing in the row sees an already-updated neighbor.
        let mut current = VoxelLattice::new(5, 3, 3).unwrap();
        current.set(1, 1, 1, true);
        current.set(2, 1, 1, true);
        current.set(3, 1, 1, true);
        let rules = RuleSet::new("two", (2, 2), (2, 2)).unwrap();
        let mut next = VoxelLattice::new(5, 3, 3).unwrap();
        advance_lattice(&current, &rules, &mut next);

        assert!(!next.get(1, 1, 1));
        assert!(next.get(2, 1, 1));
        assert!(!next.get(3, 1, 1));
        // Cells beside an end see two of the row and are born; beside the middle they see three.
        assert!(next.get(1, 0, 1));
        assert!(next.get(3, 2, 1));
        assert!(!next.get(2, 0, 1));
    }

    #[test]
    fn test_age_increments_and_saturates() {
        let mut current = VoxelLattice::new(2, 2, 2).unwrap();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    let idx = current.index_of(x, y, z);
                    current.store(idx, true, 0, AGE_CAP);
                }
            }
        }
        current.store(0, true, 0, 4);
        let mut next = current.clone();
        advance_lattice(&current, &generous(), &mut next);
        assert_eq!(next.age(0, 0, 0), 5);
        assert_eq!(next.age(1, 1, 1), AGE_CAP);
    }

    #[test]
    fn test_end_to_end_single_tower() {
        let mut engine = AutomatonEngine::new(
            0,
            (4, 4, 4),
            2024,
            params(1.0, Symmetry::Asymmetric),
            generous(),
            ScheduleConfig::default(),
        )
        .unwrap();

        assert_eq!(engine.state(), EngineState::Seeded);
        assert_eq!(engine.lattice().layer_population(0), 16);
        assert_eq!(engine.lattice().population(), 16);

        assert!(engine.step());
        assert_eq!(engine.state(), EngineState::Stepping);
        assert_eq!(engine.lattice().layer_population(0), 16);
        assert_eq!(engine.lattice().layer_population(1), 16);
        assert_eq!(engine.lattice().population(), 32);
        assert_eq!(engine.lattice().age(0, 0, 0), 1);
        assert_eq!(engine.lattice().age(2, 1, 2), 1);
    }

    #[test]
    fn test_convergence_is_terminal_and_idempotent() {
        let mut engine = AutomatonEngine::new(
            3,
            (5, 4, 5),
            9,
            params(0.6, Symmetry::Mirror),
            preset_by_name("Coral Bloom").unwrap().clone(),
            ScheduleConfig::default(),
        )
        .unwrap();

        let mut last = engine.step_index();
        while engine.step() {
            assert!(engine.step_index() > last);
            last = engine.step_index();
        }
        assert_eq!(engine.step_index(), 3);
        assert_eq!(engine.state(), EngineState::Converged);

        let frozen = engine.lattice().clone();
        for _ in 0..5 {
            assert!(!engine.step());
        }
        assert_eq!(engine.lattice(), &frozen);
        assert_eq!(engine.step_index(), 3);
    }

    #[test]
    fn test_single_layer_lattice_starts_converged() {
        let mut engine = AutomatonEngine::new(
            0,
            (4, 1, 4),
            1,
            params(0.5, Symmetry::Asymmetric),
            generous(),
            ScheduleConfig::default(),
        )
        .unwrap();
        assert_eq!(engine.state(), EngineState::Converged);
        assert!(!engine.step());
    }

    #[test]
    fn test_mirror_symmetry_preserved_by_steps() {
        let width = 9i16;
        let mut engine = AutomatonEngine::new(
            0,
            (width, 12, 6),
            77,
            params(0.45, Symmetry::Mirror),
            preset_by_name("Crystal Drift").unwrap().clone(),
            ScheduleConfig::default(),
        )
        .unwrap();

        loop {
            let lattice = engine.lattice();
            for z in 0..lattice.depth() {
                for y in 0..lattice.height() {
                    for x in 0..width {
                        assert_eq!(
                            lattice.get(x, y, z),
                            lattice.get(width - 1 - x, y, z),
                            "asymmetry at ({x},{y},{z}) after step {}",
                            engine.step_index()
                        );
                    }
                }
            }
            if !engine.step() {
                break;
            }
        }
    }

    #[test]
    fn test_rule_rotation_cadence() {
        let schedule = ScheduleConfig {
            enabled: true,
            interval_steps: 5,
            mode: ShuffleMode::Cycle,
        };
        let mut engine = AutomatonEngine::new(
            0,
            (6, 20, 6),
            5,
            params(0.5, Symmetry::Asymmetric),
            CATALOG[0].clone(),
            schedule,
        )
        .unwrap();

        for step in 1..=15u32 {
            assert!(engine.step());
            let expected = (step / 5) as usize;
            assert_eq!(engine.active_rules(), &CATALOG[expected], "after step {step}");
        }
    }

    #[test]
    fn test_rotated_rules_apply_from_next_step() {
        let schedule = ScheduleConfig {
            enabled: true,
            interval_steps: 1,
            mode: ShuffleMode::Cycle,
        };
        // Full 4x4 bottom layer. Spine Rise kills the bottom interior (8 neighbors),
        // Coral Bloom keeps it, so the two presets diverge from the first step.
        let mut engine = AutomatonEngine::new(
            0,
            (4, 6, 4),
            9,
            params(1.0, Symmetry::Asymmetric),
            CATALOG[0].clone(),
            schedule,
        )
        .unwrap();
        let seeded = engine.lattice().clone();
        assert_eq!(seeded.layer_population(0), 16);

        let mut under_first = seeded.clone();
        advance_lattice(&seeded, &CATALOG[0], &mut under_first);
        let mut under_second = seeded.clone();
        advance_lattice(&seeded, &CATALOG[1], &mut under_second);
        assert_ne!(under_first, under_second);

        // Step 1 triggers the rotation but is computed with the starting rules.
        assert!(engine.step());
        assert_eq!(engine.lattice(), &under_first);
        assert_eq!(engine.active_rules(), &CATALOG[1]);

        // Step 2 uses the rotated rules.
        let after_one = engine.lattice().clone();
        let mut expected = after_one.clone();
        advance_lattice(&after_one, &CATALOG[1], &mut expected);
        let mut stale = after_one.clone();
        advance_lattice(&after_one, &CATALOG[0], &mut stale);
        // Layer-2 corners see 3 live cells below: born under Coral Bloom only.
        assert_ne!(expected, stale);

        assert!(engine.step());
        assert_eq!(engine.lattice(), &expected);
        assert_eq!(engine.active_rules(), &CATALOG[2]);
    }

    #[test]
    fn test_reset_restores_seeded_state() {
        let schedule = ScheduleConfig {
            enabled: true,
            interval_steps: 1,
            mode: ShuffleMode::Cycle,
        };
        let mut engine = AutomatonEngine::new(
            0,
            (6, 8, 6),
            31,
            params(0.5, Symmetry::FourWay),
            CATALOG[2].clone(),
            schedule,
        )
        .unwrap();
        let seeded = engine.lattice().clone();

        engine.step();
        engine.step();
        assert_ne!(engine.active_rules(), &CATALOG[2]);

        engine.reset(31);
        assert_eq!(engine.state(), EngineState::Seeded);
        assert_eq!(engine.step_index(), 0);
        assert_eq!(engine.active_rules(), &CATALOG[2]);
        assert_eq!(engine.scheduler().cursor(), 2);
        assert_eq!(engine.lattice(), &seeded);
    }

    #[test]
    fn test_resize_rejects_bad_dimensions_without_mutation() {
        let mut engine = AutomatonEngine::new(
            0,
            (4, 6, 4),
            8,
            params(0.5, Symmetry::Asymmetric),
            generous(),
            ScheduleConfig::default(),
        )
        .unwrap();
        engine.step();
        let before = engine.lattice().clone();

        assert!(engine.resize((4, 0, 4), 8).is_err());
        assert_eq!(engine.lattice(), &before);
        assert_eq!(engine.step_index(), 1);

        assert!(engine.resize((i16::MAX, i16::MAX, i16::MAX), 8).is_err());
        assert_eq!(engine.lattice(), &before);

        engine.resize((3, 3, 3), 8).unwrap();
        assert_eq!(engine.lattice().len(), 27);
        assert_eq!(engine.step_index(), 0);
    }

    #[test]
    fn test_scratch_tracks_lattice_shape() {
        let mut engine = AutomatonEngine::new(
            0,
            (4, 6, 4),
            8,
            params(0.5, Symmetry::Asymmetric),
            generous(),
            ScheduleConfig::default(),
        )
        .unwrap();
        for dims in [(6, 10, 5), (3, 4, 3)] {
            engine.resize(dims, 8).unwrap();
            while engine.step() {
                assert_eq!(engine.scratch.len(), engine.lattice().len());
                assert_eq!(
                    (engine.scratch.width(), engine.scratch.height(), engine.scratch.depth()),
                    dims
                );
            }
            assert_eq!(engine.step_index(), (dims.1 - 1) as u32);
        }
    }

    #[test]
    fn test_invalid_starting_rules_rejected() {
        let bad = RuleSet {
            name: "bad".into(),
            birth_min: 9,
            birth_max: 2,
            survive_min: 0,
            survive_max: 1,
        };
        let result = AutomatonEngine::new(
            0,
            (4, 4, 4),
            1,
            params(0.5, Symmetry::Asymmetric),
            bad,
            ScheduleConfig::default(),
        );
        assert!(result.is_err());
    }
}
