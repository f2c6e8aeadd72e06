/*!
Dynamic injection of symmetry-breaking predicates.

# Watched equalities

Statically, the chain of a permutation is emitted in full; dynamically, only its head.
For each permutation the database watches one equality per touched atom --- initially the head of the chain, for both of its endpoints.

Whenever an assignment touches an atom with a watched equality, the layer tests whether the equality holds on the current valuation (both sides assigned, and the value of the atom equal to the value of its image literal) and whether every predecessor equality along the permutation's chain also holds:

- If so, the chain step for the equality is queued for emission, at most once --- the step clauses for an equality are never useful twice.
- If some equality along the walk does not hold, the watch moves to that equality (both endpoints), and nothing is emitted.

# Interleaving with propagation

The test runs from inside [unchecked_enqueue](crate::context::GenericSolver::unchecked_enqueue), during a propagation round.
Emitting a clause there would grow watch lists (and possibly the atom tables) while a watch list is under iteration, so steps are only *queued*: [flush_pending_sbps](crate::context::GenericSolver::flush_pending_sbps) drains the queue between propagation rounds, when nothing is borrowed, and freshly emitted clauses are reached by subsequent rounds.
*/

use crate::{
    context::GenericSolver,
    misc::log::targets::{self},
    structures::atom::Atom,
    symmetry::{EqIndex, PermIndex},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Offers an assignment of `atom` to the dynamic symmetry layer.
    ///
    /// For each permutation watching an equality on the atom, the chain step of the equality is queued if the equality and all its predecessors hold.
    pub(crate) fn symmetry_on_assignment(&mut self, atom: Atom) {
        for perm_index in 0..self.symmetry.permutations.len() {
            if let Some(eq) = self.symmetry.watched_eq(atom, perm_index) {
                if self.predecessors_satisfied(eq, perm_index) {
                    self.queue_chain_step(eq, perm_index);
                }
            }
        }
    }

    /// True if the equality and every predecessor along the permutation's chain holds on the current valuation.
    ///
    /// Otherwise the watch is reassigned to the first equality found not to hold, for both of its endpoints, and false is returned.
    fn predecessors_satisfied(&mut self, eq: EqIndex, perm_index: PermIndex) -> bool {
        let mut current = eq;
        loop {
            if self.equality_holds(current) {
                match self.symmetry.eq(current).pred(perm_index) {
                    None => return true,
                    Some(predecessor) => current = predecessor,
                }
            } else {
                self.symmetry.watch_eq(current, perm_index);
                return false;
            }
        }
    }

    /// True if both sides of the equality are assigned, with the value of the atom equal to the value of the image literal.
    fn equality_holds(&self, eq: EqIndex) -> bool {
        let eq = self.symmetry.eq(eq);
        match (
            self.atom_db.value_of(eq.atom),
            self.atom_db.value_of_lit(eq.image),
        ) {
            (Some(atom_value), Some(image_value)) => atom_value == image_value,
            _ => false,
        }
    }

    /// Queues the chain step of the equality for emission, at most once.
    fn queue_chain_step(&mut self, eq: EqIndex, perm_index: PermIndex) {
        let entry = self.symmetry.eq_mut(eq);
        if !entry.added {
            entry.added = true;
            self.symmetry.pending.push((eq, perm_index));
        }
    }

    /// Asserts literals which arrived as settled units above level zero, now the trail is back at level zero.
    pub(crate) fn flush_pending_units(&mut self) {
        debug_assert_eq!(self.decision_level(), 0);
        while let Some(literal) = self.symmetry.pending_units.pop() {
            match self.atom_db.value_of_lit(literal) {
                None => self.unchecked_enqueue(literal, None),
                Some(true) => {}
                Some(false) => {
                    log::info!(target: targets::SYMMETRY, "A settled unit {literal} is falsified at level zero");
                    self.ok = false;
                }
            }
        }
    }

    /// Emits every queued chain step, extending each permutation's chain in the order the steps were queued.
    ///
    /// Called between propagation rounds, so no watch list is live --- see the module documentation.
    pub(crate) fn flush_pending_sbps(&mut self) {
        while !self.symmetry.pending.is_empty() {
            let queued = std::mem::take(&mut self.symmetry.pending);

            for (eq, perm_index) in queued {
                let (atom, image) = {
                    let entry = self.symmetry.eq(eq);
                    (entry.atom, entry.image)
                };

                let cursor = match self.symmetry.chain_cursor.get(perm_index) {
                    Some(Some(cursor)) => *cursor,
                    _ => {
                        log::error!(target: targets::SYMMETRY, "A chain step was queued without a chain");
                        continue;
                    }
                };

                log::info!(target: targets::SYMMETRY, "Chain step for {atom} ↔ {image}");
                match self.add_chaining_sbp(atom, image, cursor) {
                    Ok(next) => {
                        self.symmetry.chain_cursor[perm_index] = Some(next);
                        self.symmetry.dynamic_steps += 1;
                    }
                    Err(_) => {
                        // The contradiction is latched; nothing more to emit.
                        return;
                    }
                }
            }
        }
    }
}
