/*!
Compaction of the clause arena.

Freed clauses leave their words behind, accounted as waste.
Once the wasted fraction passes [garbage_fraction](crate::config::Config::garbage_fraction) every live clause is copied into a fresh region, with a forwarding reference left in the old header, and every external reference is rewritten:

- the clause of every watcher,
- the reason of every assignment --- though only when the clause is already relocated or currently locked, as it is not safe to query locked on a relocated clause, and a dangling reason for a freed clause is harmless,
- every entry of the original and learnt lists, with removed clauses dropped.

Watch lists are cleaned first, so no watcher for a removed clause survives into the new region.
*/

use crate::{
    context::GenericSolver,
    db::arena::ClauseArena,
    misc::log::targets::{self},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Compacts the arena if the wasted fraction passes the configured threshold.
    pub fn check_garbage(&mut self) {
        let wasted = self.clause_db.arena.wasted() as f64;
        if wasted > self.clause_db.arena.size() as f64 * self.config.garbage_fraction.value {
            self.garbage_collect();
        }
    }

    /// Compacts the arena, rewriting every reachable clause reference.
    pub fn garbage_collect(&mut self) {
        // Size the next region to the estimated utilisation, avoiding some unnecessary reallocation.
        let estimate = self.clause_db.arena.size() - self.clause_db.arena.wasted();
        let mut fresh = ClauseArena::with_capacity(estimate);

        self.relocate_all(&mut fresh);

        log::debug!(target: targets::GC,
            "Garbage collection: {} words => {} words",
            self.clause_db.arena.size(),
            fresh.size(),
        );
        self.clause_db.arena = fresh;
    }

    /// Rewrites every reachable clause reference into the region `fresh`.
    fn relocate_all(&mut self, fresh: &mut ClauseArena) {
        // All watchers.
        {
            let arena = &self.clause_db.arena;
            self.watch_db.clean_all(|clause| arena.is_removed(clause));
        }
        for list in self.watch_db.lists_mut() {
            for watcher in list.iter_mut() {
                self.clause_db.arena.reloc(&mut watcher.clause, fresh);
            }
        }

        // All reasons.
        for position in 0..self.trail.len() {
            let atom = self.trail.assignment(position).atom();

            // It is not safe to query locked on a relocated clause, so dangling reasons for freed clauses are kept as they are.
            if let Some(reason) = self.atom_db.reason_of(atom) {
                if self.clause_db.arena.is_reloced(reason)
                    || self.clause_db.locked(reason, &self.atom_db)
                {
                    debug_assert!(!self.clause_db.arena.is_removed(reason));
                    if let Some(slot) = self.atom_db.reason_mut(atom).as_mut() {
                        self.clause_db.arena.reloc(slot, fresh);
                    }
                }
            }
        }

        // All learnt, and all original.
        self.clause_db.relocate_lists(fresh);
    }
}
