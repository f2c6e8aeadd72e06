/*!
Unit propagation over the watched-literal index.

# Overview

Propagation drains the queue of assignments --- the tail of the [trail](crate::db::trail) --- examining, for each assignment, the clauses watching the falsified literal.
For each such clause either:
- The cached blocker (or the other watch) is true, and the clause is skipped.
- Some other non-false literal exists, and the watch is moved to it.
- Only the other watch remains non-false, and the clause asserts it.
- Every literal is false, and the clause is the conflict returned.

Propagation is deterministic given the trail and the order of the watch lists: asserted literals join the trail FIFO, and the conflict returned is the first encountered in the scan in progress.

# Complications

Use is made of [list_unchecked](crate::db::watch::WatchDB::list_unchecked) to obtain a pointer to the watch list under iteration.
A handful of issues are avoided by doing this:
1. A mutable borrow of the watch database for the list conflicting with reads of the atom database for values.
2. A mutable borrow of the solver in the call to enqueue an asserted literal.
3. A mutable borrow of the watch database when a moved watch is pushed to the list of *another* literal.

(1) and (2) could be avoided by a more nuanced borrow checker, as these are separate structures.
This is not the case for (3), as a watch list has been borrowed and the push may mutate watch lists.
Still, the *borrowed* list will not be mutated.
For, the list examined belongs to the literal `p` being propagated, a moved watch is pushed to the list of the complement of some non-false literal, and as `p` is true its complement is false.

# Dynamic symmetry

When dynamic symmetry breaking is active, [enqueueing](GenericSolver::unchecked_enqueue) an assignment may queue symmetry-breaking clauses for synthesis.
Queued clauses are emitted between propagation rounds, when no watch list is borrowed --- a clause synthesized from the round in progress is only examined by subsequent rounds.
*/

use crate::{
    context::GenericSolver,
    db::{arena::ClauseRef, watch::Watcher},
    misc::log::targets::{self},
    structures::literal::Lit,
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Makes a literal true and places it on the trail, with the clause which forced the assignment, if any.
    ///
    /// When dynamic symmetry breaking is active the assignment is offered to the symmetry layer, which may queue chain steps for emission.
    ///
    /// # Soundness
    /// The literal must have no value on the current valuation.
    pub fn unchecked_enqueue(&mut self, literal: Lit, reason: Option<ClauseRef>) {
        debug_assert!(self.atom_db.value_of_lit(literal).is_none());

        let level = self.trail.level();
        self.atom_db.set_value(literal, level, reason);
        self.trail.push(literal);

        if self.symmetry.config.dynamic && self.symmetry.original(literal.atom()) {
            self.symmetry_on_assignment(literal.atom());
        }
    }

    /// Propagates all enqueued assignments.
    ///
    /// If a conflict arises the conflicting clause is returned, and the queue is emptied regardless.
    pub fn propagate(&mut self) -> Option<ClauseRef> {
        let mut conflict: Option<ClauseRef> = None;
        let mut propagated: u64 = 0;

        'queue: loop {
            if self.symmetry.config.dynamic {
                if self.symmetry.pending_count() > 0 {
                    self.flush_pending_sbps();
                }
                if self.decision_level() == 0 && !self.symmetry.pending_units.is_empty() {
                    self.flush_pending_units();
                }
            }

            let p = match self.trail.next_to_propagate() {
                Some(p) => p,
                None => break 'queue,
            };
            propagated += 1;
            let false_literal = !p;

            {
                let arena = &self.clause_db.arena;
                self.watch_db.clean(p, |clause| arena.is_removed(clause));
            }

            // Safety: the list is only mutated through the pointer --- see the module documentation.
            let list = unsafe { &mut *self.watch_db.list_unchecked(p) };
            let mut read = 0;
            let mut write = 0;
            let end = list.len();

            'watchers: while read < end {
                // Try to avoid inspecting the clause.
                let blocker = list[read].blocker;
                if self.atom_db.value_of_lit(blocker) == Some(true) {
                    list[write] = list[read];
                    write += 1;
                    read += 1;
                    continue 'watchers;
                }

                let clause = list[read].clause;
                read += 1;
                self.clause_db.arena.set_propagated(clause);

                // Make sure the false literal is at index 1.
                if self.clause_db.arena.literal(clause, 0) == false_literal {
                    self.clause_db.arena.swap_literals(clause, 0, 1);
                }
                debug_assert_eq!(self.clause_db.arena.literal(clause, 1), false_literal);

                // If the other watch is true, the clause is already satisfied.
                let first = self.clause_db.arena.literal(clause, 0);
                let watcher = Watcher::new(clause, first);
                if first != blocker && self.atom_db.value_of_lit(first) == Some(true) {
                    list[write] = watcher;
                    write += 1;
                    continue 'watchers;
                }

                // Look for a new watch.
                let length = self.clause_db.arena.length(clause);
                let mut moved = false;
                for index in 2..length {
                    let candidate = self.clause_db.arena.literal(clause, index);
                    if self.atom_db.value_of_lit(candidate) != Some(false) {
                        self.clause_db.arena.set_literal(clause, 1, candidate);
                        self.clause_db.arena.set_literal(clause, index, false_literal);
                        // The candidate is not false while p is true, so this is not the list under iteration.
                        self.watch_db.watch(!candidate, watcher);
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue 'watchers;
                }

                // No new watch --- the clause is unit under the assignment.
                list[write] = watcher;
                write += 1;
                if self.atom_db.value_of_lit(first) == Some(false) {
                    log::trace!(target: targets::PROPAGATION, "Conflict in {clause} on {p}");
                    conflict = Some(clause);
                    self.trail.close_queue();
                    // Copy the remaining watchers.
                    while read < end {
                        list[write] = list[read];
                        write += 1;
                        read += 1;
                    }
                } else {
                    log::trace!(target: targets::PROPAGATION, "Consequence of {clause}: {first}");
                    self.unchecked_enqueue(first, Some(clause));
                }
            }
            list.truncate(write);

            if conflict.is_some() {
                break 'queue;
            }
        }

        self.counters.propagations += propagated;
        self.simp_propagation_budget -= propagated as i64;

        conflict
    }
}
