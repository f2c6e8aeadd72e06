/*!
The solver --- to which formulas and permutations are added, and within which solves take place.

Strictly, a [GenericSolver] and a [Solver].

The generic solver is designed to be generic over various parameters, though for the moment this is limited to the source of randomness.
Still, this helps distinguish generic solver methods against those intended for external use or a particular application.
In particular, [from_config](Solver::from_config) is implemented for a [Solver] to seed the default source of randomness from the configuration.

# Example

```rust
# use orbit_sat::config::Config;
# use orbit_sat::context::Solver;
# use orbit_sat::reports::Report;
let mut solver = Solver::from_config(Config::default());

let p = solver.fresh_atom();
assert!(solver.add_clause(vec![orbit_sat::structures::literal::Lit::positive(p)]).is_ok());
assert_eq!(solver.solve(), Report::Satisfiable);
assert_eq!(solver.model_value(p), Some(true));
```
*/

mod counters;
pub use counters::Counters;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rand::SeedableRng;

use crate::{
    config::Config,
    db::{atom::AtomDB, clause::ClauseDB, trail::Trail, watch::WatchDB, LevelIndex},
    generic::pcg::Pcg32,
    structures::{atom::Atom, literal::Lit},
    symmetry::SymmetryDB,
};

/// A generic solver, parameterised to a source of randomness.
///
/// Requires a source of [rng](rand::Rng) which (also) implements [Default](std::default::Default), used to appease the borrow checker when a decision is made.
pub struct GenericSolver<R: rand::Rng + std::default::Default> {
    /// The configuration of the solver.
    pub config: Config,

    /// Counters related to a solve.
    pub counters: Counters,

    /// The atom database.
    /// See [db::atom](crate::db::atom) for details.
    pub atom_db: AtomDB,

    /// The clause database, and the arena behind it.
    /// See [db::clause](crate::db::clause) for details.
    pub clause_db: ClauseDB,

    /// Watch lists for each literal.
    /// See [db::watch](crate::db::watch) for details.
    pub watch_db: WatchDB,

    /// The trail of assignments, with the propagation queue cursor.
    /// See [db::trail](crate::db::trail) for details.
    pub trail: Trail,

    /// The symmetry database.
    /// See [symmetry](crate::symmetry) for details.
    pub symmetry: SymmetryDB,

    /// False if the formula is known to be unsatisfiable without any decision.
    ///
    /// Once false, always false --- the empty-clause proof stands.
    pub ok: bool,

    /// The model found by the last successful solve, indexed by atom.
    pub model: Vec<Option<bool>>,

    /// If the last solve failed under assumptions, an inconsistent subset of those assumptions, negated.
    pub conflict: Vec<Lit>,

    /// The assumptions of the solve in progress.
    pub(crate) assumptions: Vec<Lit>,

    // Scratch space for conflict analysis.
    pub(crate) learnt_buffer: Vec<Lit>,
    pub(crate) to_clear: Vec<Lit>,
    pub(crate) minimization_stack: Vec<(usize, Lit)>,

    // Simplification bookkeeping.
    pub(crate) simp_assign_count: Option<usize>,
    pub(crate) simp_propagation_budget: i64,
    pub(crate) remove_satisfied: bool,

    // The learnt clause limit, and its adjustment schedule.
    pub(crate) max_learnts: f64,
    pub(crate) learntsize_adjust_confl: f64,
    pub(crate) learntsize_adjust_cnt: i64,

    /// A (rough) estimate of progress through the search space, updated on restarts.
    pub progress_estimate: f64,

    // Resource constraints.
    pub(crate) conflict_budget: Option<u64>,
    pub(crate) propagation_budget: Option<u64>,
    interrupt: Arc<AtomicBool>,

    /// The source of rng.
    pub rng: R,
}

/// A solver with the default source of randomness.
pub type Solver = GenericSolver<Pcg32>;

impl Solver {
    /// A solver from a config, with the source of randomness seeded from the config.
    pub fn from_config(config: Config) -> Self {
        let rng = Pcg32::from_seed(config.random_seed.value.to_le_bytes());
        GenericSolver::from_config_with_rng(config, rng)
    }
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A solver from a config and a source of randomness.
    pub fn from_config_with_rng(config: Config, rng: R) -> Self {
        GenericSolver {
            counters: Counters::default(),

            atom_db: AtomDB::new(config.variable_decay.value),
            clause_db: ClauseDB::new(&config),
            watch_db: WatchDB::default(),
            trail: Trail::default(),
            symmetry: SymmetryDB::new(&config.symmetry),

            ok: true,
            model: Vec::default(),
            conflict: Vec::default(),
            assumptions: Vec::default(),

            learnt_buffer: Vec::default(),
            to_clear: Vec::default(),
            minimization_stack: Vec::default(),

            simp_assign_count: None,
            simp_propagation_budget: 0,
            remove_satisfied: true,

            max_learnts: 0.0,
            learntsize_adjust_confl: 0.0,
            learntsize_adjust_cnt: 0,

            progress_estimate: 0.0,

            conflict_budget: None,
            propagation_budget: None,
            interrupt: Arc::new(AtomicBool::new(false)),

            rng,
            config,
        }
    }

    /// The current decision level.
    pub fn decision_level(&self) -> LevelIndex {
        self.trail.level()
    }

    /// The value of an atom on the current valuation.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.atom_db.value_of(atom)
    }

    /// The value of an atom on the model of the last successful solve.
    pub fn model_value(&self, atom: Atom) -> Option<bool> {
        self.model.get(atom as usize).copied().flatten()
    }

    /// The inconsistent subset of assumptions from the last failed solve, negated.
    pub fn failed_assumptions(&self) -> &[Lit] {
        &self.conflict
    }

    // Resource constraints.

    /// Limits the next solve to (roughly) the given number of conflicts.
    pub fn set_conflict_budget(&mut self, conflicts: Option<u64>) {
        self.conflict_budget = conflicts.map(|c| self.counters.conflicts + c);
    }

    /// Limits the next solve to (roughly) the given number of propagations.
    pub fn set_propagation_budget(&mut self, propagations: Option<u64>) {
        self.propagation_budget = propagations.map(|p| self.counters.propagations + p);
    }

    /// A handle with which to request early termination, e.g. from a signal handler.
    ///
    /// The flag is polled at restart boundaries --- the solver never yields mid-propagation.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Clears a previously raised interrupt, so the solver may be used again.
    pub fn clear_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }

    /// True so long as no interrupt has been raised and no budget has been exhausted.
    ///
    /// Exhausting a budget and an interrupt cause the same graceful return, with all partial results remaining valid.
    pub fn within_budget(&self) -> bool {
        !self.interrupt.load(Ordering::Relaxed)
            && self.conflict_budget.is_none_or(|b| self.counters.conflicts < b)
            && self
                .propagation_budget
                .is_none_or(|b| self.counters.propagations < b)
    }

    /// A (rough) estimate of progress through the search space: the fraction of atoms assigned, weighted by level.
    pub fn estimate_progress(&self) -> f64 {
        let atom_count = self.atom_db.count();
        if atom_count == 0 {
            return 0.0;
        }

        let mut progress = 0.0;
        let f = 1.0 / atom_count as f64;
        for level in 0..=self.decision_level() {
            let begin = if level == 0 {
                0
            } else {
                self.trail.level_start(level - 1)
            };
            let end = self.trail.level_start(level);
            progress += f.powi(level as i32) * (end - begin) as f64;
        }

        progress * f
    }
}
