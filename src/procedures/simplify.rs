/*!
Top-level simplification of the clause database.

At decision level zero every assignment is permanent, so:
- A clause holding a true literal is satisfied forever, and removed.
- A false literal satisfies no clause ever again, and is trimmed from the clauses still live.

Simplification also recycles released atoms: their assignments are dropped from the trail, and the atoms join the free list for reuse.

The work is skipped when nothing changed since the last pass --- no new top-level assignment, and too few propagations to matter.
*/

use crate::{
    context::GenericSolver,
    db::{arena::ClauseRef, atom::SeenTag},
    misc::log::targets::{self},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Simplifies the clause database according to the current top-level assignment.
    ///
    /// Returns false exactly when the formula is found (or was known) to be unsatisfiable.
    pub fn simplify(&mut self) -> bool {
        debug_assert_eq!(self.decision_level(), 0);

        if !self.ok || self.propagate().is_some() {
            self.ok = false;
            return false;
        }

        if self.simp_assign_count == Some(self.trail.len()) || self.simp_propagation_budget > 0 {
            return true;
        }

        log::debug!(target: targets::SIMPLIFICATION, "Simplification at {} assignments", self.trail.len());

        self.remove_satisfied_clauses(true);
        if self.remove_satisfied {
            self.remove_satisfied_clauses(false);

            // Remove released atoms from the trail.
            for position in 0..self.atom_db.released().len() {
                let atom = self.atom_db.released()[position];
                debug_assert!(!self.atom_db.seen(atom));
                self.atom_db.set_seen_tag(atom, SeenTag::Source);
            }

            {
                let atom_db = &self.atom_db;
                self.trail
                    .retain_level_zero(|literal| atom_db.seen(literal.atom()));
            }

            for position in 0..self.atom_db.released().len() {
                let atom = self.atom_db.released()[position];
                self.atom_db.set_seen_tag(atom, SeenTag::Undef);
            }

            // Released atoms are now ready for reuse.
            self.atom_db.recycle_released();
        }

        self.check_garbage();
        self.atom_db.rebuild_heap();

        self.simp_assign_count = Some(self.trail.len());
        self.simp_propagation_budget =
            (self.clause_db.original_literals + self.clause_db.learnt_literals) as i64;

        true
    }

    /// Removes satisfied clauses from the learnt or original list, trimming false literals from the clauses kept.
    fn remove_satisfied_clauses(&mut self, learnt: bool) {
        let list = match learnt {
            true => std::mem::take(&mut self.clause_db.learnts),
            false => std::mem::take(&mut self.clause_db.originals),
        };
        let mut kept_list = Vec::with_capacity(list.len());

        for clause in list {
            if self.clause_satisfied(clause) {
                self.clause_db
                    .remove(clause, &mut self.atom_db, &mut self.watch_db);
            } else {
                // Trim false literals beyond the watched positions.
                debug_assert!(
                    self.atom_db
                        .value_of_lit(self.clause_db.arena.literal(clause, 0))
                        .is_none()
                        && self
                            .atom_db
                            .value_of_lit(self.clause_db.arena.literal(clause, 1))
                            .is_none()
                );
                let mut position = 2;
                while position < self.clause_db.arena.length(clause) {
                    let literal = self.clause_db.arena.literal(clause, position);
                    if self.atom_db.value_of_lit(literal) == Some(false) {
                        let last = self.clause_db.arena.length(clause) - 1;
                        self.clause_db.arena.swap_literals(clause, position, last);
                        self.clause_db.arena.shorten(clause, last);
                    } else {
                        position += 1;
                    }
                }
                kept_list.push(clause);
            }
        }

        match learnt {
            true => self.clause_db.learnts = kept_list,
            false => self.clause_db.originals = kept_list,
        }
    }

    /// True if some literal of the clause is true on the current valuation.
    pub fn clause_satisfied(&self, clause: ClauseRef) -> bool {
        self.clause_db
            .arena
            .literals(clause)
            .iter()
            .any(|literal| self.atom_db.value_of_lit(*literal) == Some(true))
    }
}
