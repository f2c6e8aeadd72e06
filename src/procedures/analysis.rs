/*!
Analysis of a clause unsatisfiable on the current valuation.

# First unique implication point

Analysis walks the trail backward from the conflict, resolving on assignments of the current decision level.
A bitmap of *seen* atoms and a count of the literals of the current level still to resolve are maintained: each resolution step removes one such literal and may introduce others, and when the count reaches one the remaining literal is the *first unique implication point* (UIP) --- every path from the decision of the level to the conflict passes through it.
The negation of the UIP becomes the asserting literal of the learnt clause; literals of lower levels collect as the remainder.

Every clause resolved on has its activity bumped (if learnt), is marked as used in resolution, and contributes activity bumps to its atoms.

# Minimization

A non-asserting literal of the learnt clause is *redundant* if every literal in its reason chain is already seen or assigned at level zero --- resolving on the chain would remove the literal without introducing anything new.

- Mode 2 proves redundancy recursively with an explicit stack, caching failed subtrees in the [seen tags](crate::db::atom::SeenTag) so re-traversal short-circuits.
- Mode 1 checks a single reason step only.
- Mode 0 skips minimization.

# Backtrack level

A unit learnt clause backtracks to level zero.
Otherwise the highest-level non-asserting literal is swapped to index 1 and its level is the backtrack level: after backjumping the clause is unit, asserting the UIP negation.

# Final analysis

[analyze_final](GenericSolver::analyze_final) serves assumption handling: starting from a falsified assumption it follows reasons down the trail and collects the negations of the seen assumption decisions, forming the assumption conflict returned to the caller.
*/

use crate::{
    context::GenericSolver,
    db::{arena::ClauseRef, atom::SeenTag, LevelIndex},
    misc::log::targets::{self},
    structures::literal::Lit,
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Analyzes a conflict and derives a learnt clause, left in the learnt buffer with the asserting literal at index 0.
    ///
    /// Returns the level to backtrack to.
    ///
    /// May only be called with a decision made, as otherwise there is no UIP to find.
    pub fn analyze(&mut self, conflict: ClauseRef) -> LevelIndex {
        log::trace!(target: targets::ANALYSIS, "Analysis of {conflict} at level {}", self.decision_level());

        let mut path_count: usize = 0;
        let mut pivot: Option<Lit> = None;
        let mut clause = conflict;

        self.learnt_buffer.clear();
        self.learnt_buffer.push(Lit::positive(0)); // Room for the asserting literal.
        let mut index = self.trail.len();

        loop {
            self.clause_db.arena.set_in_resolution(clause);
            if self.clause_db.arena.is_learnt(clause) {
                self.clause_db.bump_activity(clause);
            }

            let skip = match pivot {
                None => 0,
                Some(_) => 1,
            };
            for position in skip..self.clause_db.arena.length(clause) {
                let literal = self.clause_db.arena.literal(clause, position);
                let atom = literal.atom();

                if !self.atom_db.seen(atom) && self.atom_db.level_of(atom) > 0 {
                    self.atom_db.bump_activity(atom);
                    self.atom_db.set_seen_tag(atom, SeenTag::Source);
                    if self.atom_db.level_of(atom) >= self.decision_level() {
                        path_count += 1;
                    } else {
                        self.learnt_buffer.push(literal);
                    }
                }
            }

            // Select the next assignment to resolve on.
            loop {
                index -= 1;
                if self.atom_db.seen(self.trail.assignment(index).atom()) {
                    break;
                }
            }
            let next = self.trail.assignment(index);
            self.atom_db.set_seen_tag(next.atom(), SeenTag::Undef);
            pivot = Some(next);
            path_count -= 1;
            if path_count == 0 {
                break;
            }

            clause = match self.atom_db.reason_of(next.atom()) {
                Some(reason) => reason,
                // Every remaining path literal below the decision has a reason.
                None => unreachable!("! Resolution reached an assignment with no reason"),
            };
        }

        let uip = match pivot {
            Some(pivot) => pivot,
            None => unreachable!("! Analysis requires at least one resolution step"),
        };
        self.learnt_buffer[0] = !uip;

        // Simplify the learnt clause.
        self.to_clear.clear();
        self.to_clear.extend_from_slice(&self.learnt_buffer);
        self.counters.learnt_literals_max += self.learnt_buffer.len() as u64;

        match self.config.ccmin_mode.value {
            2 => {
                let mut kept = 1;
                for position in 1..self.learnt_buffer.len() {
                    let literal = self.learnt_buffer[position];
                    if self.atom_db.reason_of(literal.atom()).is_none()
                        || !self.literal_redundant(literal)
                    {
                        self.learnt_buffer[kept] = literal;
                        kept += 1;
                    }
                }
                self.learnt_buffer.truncate(kept);
            }

            1 => {
                let mut kept = 1;
                'literal_check: for position in 1..self.learnt_buffer.len() {
                    let literal = self.learnt_buffer[position];
                    match self.atom_db.reason_of(literal.atom()) {
                        None => {
                            self.learnt_buffer[kept] = literal;
                            kept += 1;
                        }
                        Some(reason) => {
                            self.clause_db.arena.set_in_resolution(reason);
                            for reason_position in 1..self.clause_db.arena.length(reason) {
                                let reason_literal =
                                    self.clause_db.arena.literal(reason, reason_position);
                                let atom = reason_literal.atom();
                                if !self.atom_db.seen(atom) && self.atom_db.level_of(atom) > 0 {
                                    self.learnt_buffer[kept] = literal;
                                    kept += 1;
                                    continue 'literal_check;
                                }
                            }
                        }
                    }
                }
                self.learnt_buffer.truncate(kept);
            }

            _ => {}
        }

        self.counters.learnt_literals_total += self.learnt_buffer.len() as u64;

        // Find the correct backtrack level.
        let backtrack_level = if self.learnt_buffer.len() == 1 {
            0
        } else {
            // Swap the literal assigned at the next-highest level to index 1.
            let mut max_position = 1;
            for position in 2..self.learnt_buffer.len() {
                let level = self.atom_db.level_of(self.learnt_buffer[position].atom());
                if level > self.atom_db.level_of(self.learnt_buffer[max_position].atom()) {
                    max_position = position;
                }
            }
            self.learnt_buffer.swap(1, max_position);
            self.atom_db.level_of(self.learnt_buffer[1].atom())
        };

        for position in 0..self.to_clear.len() {
            let atom = self.to_clear[position].atom();
            self.atom_db.set_seen_tag(atom, SeenTag::Undef);
        }
        self.to_clear.clear();

        log::trace!(target: targets::ANALYSIS, "Learnt clause of {} literals, backtrack to {backtrack_level}", self.learnt_buffer.len());
        backtrack_level
    }

    /// Checks whether a literal of the learnt clause is redundant, i.e. implied by the remainder of the clause and level zero.
    ///
    /// The check walks the reason chain of the literal with an explicit stack, tagging atoms [Removable](SeenTag::Removable) or [Failed](SeenTag::Failed) as subtrees settle so no subtree is walked twice.
    fn literal_redundant(&mut self, literal: Lit) -> bool {
        debug_assert!(matches!(
            self.atom_db.seen_tag(literal.atom()),
            SeenTag::Undef | SeenTag::Source
        ));

        let mut literal = literal;
        let mut clause = match self.atom_db.reason_of(literal.atom()) {
            Some(reason) => reason,
            None => unreachable!("! Redundancy check on an assignment with no reason"),
        };
        self.minimization_stack.clear();
        let mut position = 1;

        loop {
            if position < self.clause_db.arena.length(clause) {
                // Checking the parents of `literal`.
                let parent = self.clause_db.arena.literal(clause, position);
                let atom = parent.atom();

                // An atom at level zero or already settled contributes nothing new.
                if self.atom_db.level_of(atom) == 0
                    || matches!(
                        self.atom_db.seen_tag(atom),
                        SeenTag::Source | SeenTag::Removable
                    )
                {
                    position += 1;
                    continue;
                }

                // A decision parent, or one known to fail, fails the whole chain.
                if self.atom_db.reason_of(atom).is_none()
                    || self.atom_db.seen_tag(atom) == SeenTag::Failed
                {
                    self.minimization_stack.push((0, literal));
                    for stack_position in 0..self.minimization_stack.len() {
                        let (_, stacked) = self.minimization_stack[stack_position];
                        if self.atom_db.seen_tag(stacked.atom()) == SeenTag::Undef {
                            self.atom_db.set_seen_tag(stacked.atom(), SeenTag::Failed);
                            self.to_clear.push(stacked);
                        }
                    }
                    return false;
                }

                // Recursively check the parent.
                self.minimization_stack.push((position, literal));
                literal = parent;
                clause = match self.atom_db.reason_of(literal.atom()) {
                    Some(reason) => reason,
                    None => unreachable!("! The parent was checked for a reason"),
                };
                position = 1;
            } else {
                // Finished with the current literal and reason.
                if self.atom_db.seen_tag(literal.atom()) == SeenTag::Undef {
                    self.atom_db.set_seen_tag(literal.atom(), SeenTag::Removable);
                    self.to_clear.push(literal);
                }

                match self.minimization_stack.pop() {
                    // Terminate with success if the stack is empty.
                    None => return true,

                    // Continue with the top element of the stack.
                    Some((stacked_position, stacked_literal)) => {
                        position = stacked_position + 1;
                        literal = stacked_literal;
                        clause = match self.atom_db.reason_of(literal.atom()) {
                            Some(reason) => reason,
                            None => unreachable!("! Stacked literals hold reasons"),
                        };
                    }
                }
            }
        }
    }

    /// Expresses the final conflict in terms of assumptions.
    ///
    /// Calculates the (possibly empty) set of assumptions which led to the assignment complementary to `failed`, and stores the negation of each in the conflict of the solver, seeded with `failed` itself.
    pub fn analyze_final(&mut self, failed: Lit) {
        self.conflict.clear();
        self.conflict.push(failed);

        if self.decision_level() == 0 {
            return;
        }

        self.atom_db.set_seen_tag(failed.atom(), SeenTag::Source);

        for position in (self.trail.level_start(0)..self.trail.len()).rev() {
            let atom = self.trail.assignment(position).atom();
            if !self.atom_db.seen(atom) {
                continue;
            }

            match self.atom_db.reason_of(atom) {
                None => {
                    debug_assert!(self.atom_db.level_of(atom) > 0);
                    self.conflict.push(!self.trail.assignment(position));
                }
                Some(reason) => {
                    for reason_position in 1..self.clause_db.arena.length(reason) {
                        let literal = self.clause_db.arena.literal(reason, reason_position);
                        if self.atom_db.level_of(literal.atom()) > 0 {
                            self.atom_db.set_seen_tag(literal.atom(), SeenTag::Source);
                        }
                    }
                }
            }
            self.atom_db.set_seen_tag(atom, SeenTag::Undef);
        }

        self.atom_db.set_seen_tag(failed.atom(), SeenTag::Undef);
    }
}
