/*!
The conflict/decide loop.

One iteration of the loop either propagates to fixpoint, handles a conflict, or makes a decision:

- **Conflict at level zero**: the formula is unsatisfiable.
- **Conflict otherwise**: analysis produces a learnt clause and a backtrack level; the clause is stored and attached, its asserting literal enqueued with the clause as reason, and atom and clause activities decay.
- **No conflict, restart bound met**: return to level zero with an undetermined result --- the [outer driver](crate::procedures::solve) computes the next bound.
- **No conflict at level zero**: run top-level [simplification](crate::procedures::simplify).
- **No conflict, learnt budget exceeded**: reduce the learnt database.
- **Otherwise**: install the next assumption (an assumption already true opens a dummy level, one already false produces the assumption conflict), or make a [decision](crate::procedures::decision) once assumptions are exhausted. If no decision atom is unassigned, the formula is satisfiable.
*/

use crate::{
    context::GenericSolver,
    misc::log::targets::{self},
    structures::literal::Lit,
};

/// The outcome of a bounded search episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// A valuation satisfying every clause, and the assumptions, was found.
    Satisfiable,

    /// The formula is unsatisfiable, outright or under the assumptions.
    Unsatisfiable,

    /// The bound on conflicts, a budget, or an interrupt ended the episode.
    Undetermined,
}

// The schedule by which the learnt clause limit is adjusted.
pub(crate) const LEARNTSIZE_ADJUST_START: f64 = 100.0;
const LEARNTSIZE_ADJUST_INC: f64 = 1.5;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Searches for a model until the given number of conflicts is met.
    ///
    /// `None` bounds indicate no bound.
    pub(crate) fn search(&mut self, conflict_bound: Option<u64>) -> SearchResult {
        debug_assert!(self.ok);
        let mut conflicts_this_search: u64 = 0;
        self.counters.restarts += 1;

        loop {
            match self.propagate() {
                Some(conflict) => {
                    // Conflict.
                    self.counters.conflicts += 1;
                    conflicts_this_search += 1;
                    if self.decision_level() == 0 {
                        return SearchResult::Unsatisfiable;
                    }

                    let backtrack_level = self.analyze(conflict);
                    self.backjump(backtrack_level);

                    if self.learnt_buffer.len() == 1 {
                        let asserting = self.learnt_buffer[0];
                        self.unchecked_enqueue(asserting, None);
                    } else {
                        let asserting = self.learnt_buffer[0];
                        let learnt = match self.clause_db.arena.alloc(&self.learnt_buffer, true) {
                            Ok(learnt) => learnt,
                            Err(e) => panic!("! Learnt clause storage failed: {e:?}"),
                        };
                        self.clause_db.learnts.push(learnt);
                        self.clause_db.attach(learnt, &mut self.watch_db);
                        self.clause_db.bump_activity(learnt);
                        self.unchecked_enqueue(asserting, Some(learnt));
                    }

                    self.atom_db.decay_activity();
                    self.clause_db.decay_activity();

                    self.learntsize_adjust_cnt -= 1;
                    if self.learntsize_adjust_cnt == 0 {
                        self.learntsize_adjust_confl *= LEARNTSIZE_ADJUST_INC;
                        self.learntsize_adjust_cnt = self.learntsize_adjust_confl as i64;
                        self.max_learnts *= self.config.learntsize_inc.value;

                        log::info!(target: targets::REDUCTION,
                            "Conflicts: {} Learnts: {} Limit: {:.0} Progress: {:.3}%",
                            self.counters.conflicts,
                            self.clause_db.learnt_count(),
                            self.max_learnts,
                            self.progress_estimate * 100.0,
                        );
                    }
                }

                None => {
                    // No conflict.
                    let bound_met = conflict_bound.is_some_and(|b| conflicts_this_search >= b);
                    if bound_met || !self.within_budget() {
                        // Reached the bound on conflicts.
                        self.progress_estimate = self.estimate_progress();
                        self.backjump(0);
                        return SearchResult::Undetermined;
                    }

                    // Simplify the set of problem clauses.
                    if self.decision_level() == 0 && !self.simplify() {
                        return SearchResult::Unsatisfiable;
                    }

                    if self.clause_db.learnt_count() as f64 - self.trail.len() as f64
                        >= self.max_learnts
                    {
                        // Reduce the set of learnt clauses.
                        self.clause_db.reduce(&mut self.atom_db, &mut self.watch_db);
                        self.check_garbage();
                    }

                    let mut next: Option<Lit> = None;
                    while (self.decision_level() as usize) < self.assumptions.len() {
                        // Perform the next user-provided assumption.
                        let assumption = self.assumptions[self.decision_level() as usize];
                        match self.atom_db.value_of_lit(assumption) {
                            Some(true) => {
                                // Dummy decision level.
                                self.trail.new_level();
                            }
                            Some(false) => {
                                self.analyze_final(!assumption);
                                return SearchResult::Unsatisfiable;
                            }
                            None => {
                                next = Some(assumption);
                                break;
                            }
                        }
                    }

                    let next = match next {
                        Some(assumption) => assumption,
                        None => {
                            // A fresh atom decision.
                            self.counters.decisions += 1;
                            match self.pick_branch_literal() {
                                Some(decision) => decision,
                                // Every decision atom holds a value: a model has been found.
                                None => return SearchResult::Satisfiable,
                            }
                        }
                    };

                    // Increase the decision level and enqueue the choice.
                    self.trail.new_level();
                    self.unchecked_enqueue(next, None);
                }
            }
        }
    }
}
