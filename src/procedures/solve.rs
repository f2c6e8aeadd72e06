/*!
Determines the satisfiability of the formula in a solver.

# Overview

[solve](GenericSolver::solve) runs [search](crate::procedures::search) episodes under a growing conflict bound until an episode settles satisfiability or a resource limit intervenes.

The bound of the `k`-th episode is `restart_first × luby(restart_inc, k)` under the Luby schedule, and `restart_first × restart_inc^k` otherwise.

On a satisfiable episode the valuation is copied out as the model; on an unsatisfiable episode with no assumption conflict the solver is latched unsatisfiable.
Either way the trail returns to level zero, so the solver may be queried again --- with revised assumptions, further clauses, or a larger budget.

# Assumptions

Assumptions are installed by the search loop as tentative decisions at successive decision levels.
If an assumption fails, [final analysis](crate::procedures::analysis) produces an inconsistent subset of the assumptions, available as [failed_assumptions](GenericSolver::failed_assumptions) --- a structured result rather than an error.

# Resource limits

Conflict and propagation budgets, and the [interrupt flag](GenericSolver::interrupt_handle), are polled between episodes via [within_budget](GenericSolver::within_budget).
Reaching a limit returns [Unknown](Report::Unknown) with all state valid for another call.
*/

use crate::{
    context::GenericSolver,
    generic::luby::luby,
    procedures::search::{SearchResult, LEARNTSIZE_ADJUST_START},
    reports::Report,
    structures::literal::Lit,
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Determines the satisfiability of the formula in the solver.
    pub fn solve(&mut self) -> Report {
        self.solve_given(&[])
    }

    /// Determines the satisfiability of the formula in the solver, under the given assumptions.
    pub fn solve_given(&mut self, assumptions: &[Lit]) -> Report {
        self.model.clear();
        self.conflict.clear();
        if !self.ok {
            return Report::Unsatisfiable;
        }

        self.assumptions = assumptions.to_vec();
        self.counters.solves += 1;

        self.max_learnts = self.clause_db.original_count() as f64
            * self.config.learntsize_factor.value;
        if self.max_learnts < self.config.min_learnts.value as f64 {
            self.max_learnts = self.config.min_learnts.value as f64;
        }

        self.learntsize_adjust_confl = LEARNTSIZE_ADJUST_START;
        self.learntsize_adjust_cnt = self.learntsize_adjust_confl as i64;

        // Search.
        let mut restarts: u32 = 0;
        let outcome = loop {
            let base = match self.config.luby_restarts.value {
                true => luby(self.config.restart_inc.value, restarts),
                false => self.config.restart_inc.value.powi(restarts as i32),
            };
            let bound = (base * self.config.restart_first.value as f64) as u64;

            match self.search(Some(bound)) {
                SearchResult::Undetermined => {
                    if !self.within_budget() {
                        break SearchResult::Undetermined;
                    }
                    // The episode may have latched a contradiction without reporting it, e.g. from a settled symmetry unit.
                    if !self.ok {
                        break SearchResult::Unsatisfiable;
                    }
                    restarts += 1;
                }
                settled => break settled,
            }
        };

        let report = match outcome {
            SearchResult::Satisfiable => {
                // Extend and copy the model.
                self.model = (0..self.atom_db.count())
                    .map(|atom| self.atom_db.value_of(atom as u32))
                    .collect();
                Report::Satisfiable
            }

            SearchResult::Unsatisfiable => {
                if self.conflict.is_empty() {
                    self.ok = false;
                }
                Report::Unsatisfiable
            }

            SearchResult::Undetermined => Report::Unknown,
        };

        self.backjump(0);
        self.assumptions.clear();
        report
    }
}
