/*!
A record of which clauses are watching a literal.

# Theory

A core part of a solve is unit propagation: the observation that some literal in a clause must be true due to all other literals in the clause being false.
Rather than inspecting every clause on every assignment, each clause nominates two *watched* literals, and is only inspected when one of those is falsified --- for so long as both watches are non-false, the clause can neither assert nor conflict.

A clause watching literals `c[0]` and `c[1]` appears in the lists of `¬c[0]` and `¬c[1]`, so that the list of a literal collects exactly the clauses which may react when that literal becomes true.

Each watcher carries a *blocker*: some literal of the clause cached at the time the watch was made.
If the blocker is already true the clause is satisfied, and propagation may skip the clause without touching the arena.

# Removal

Detaching a clause eagerly requires a scan of two lists.
As most detachments happen in bulk (database reduction, simplification), lists are instead marked *dirty* and filtered on demand --- [clean](WatchDB::clean) for one list, [clean_all](WatchDB::clean_all) for every dirty list --- using a caller-supplied test for removed clauses.
*/

use crate::{
    db::arena::ClauseRef,
    structures::{atom::Atom, literal::Lit},
};

/// A clause on watch, together with a cached literal of the clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watcher {
    /// The watching clause.
    pub clause: ClauseRef,

    /// Some literal of the clause, used for a fast satisfaction check.
    pub blocker: Lit,
}

impl Watcher {
    pub fn new(clause: ClauseRef, blocker: Lit) -> Self {
        Watcher { clause, blocker }
    }
}

/// Watch lists for each literal, indexed by the packed literal encoding.
#[derive(Default)]
pub struct WatchDB {
    lists: Vec<Vec<Watcher>>,
    dirty: Vec<bool>,
    dirties: Vec<Lit>,
}

impl WatchDB {
    /// Extends the database with (empty) lists for both literals of a fresh atom.
    pub fn ensure_atom(&mut self, atom: Atom) {
        let required = Lit::negative(atom).index() + 1;
        while self.lists.len() < required {
            self.lists.push(Vec::default());
            self.dirty.push(false);
        }
    }

    /// Adds a watcher to the list of `literal`.
    pub fn watch(&mut self, literal: Lit, watcher: Watcher) {
        self.lists[literal.index()].push(watcher);
    }

    /// Removes the watcher for `clause` from the list of `literal`, eagerly.
    pub fn unwatch(&mut self, literal: Lit, clause: ClauseRef) {
        let list = &mut self.lists[literal.index()];
        if let Some(position) = list.iter().position(|w| w.clause == clause) {
            list.remove(position);
        }
    }

    /// Marks the list of `literal` as holding watchers for removed clauses.
    pub fn smudge(&mut self, literal: Lit) {
        if !self.dirty[literal.index()] {
            self.dirty[literal.index()] = true;
            self.dirties.push(literal);
        }
    }

    /// Filters watchers of removed clauses from the list of `literal`, if the list is dirty.
    pub fn clean(&mut self, literal: Lit, removed: impl Fn(ClauseRef) -> bool) {
        if self.dirty[literal.index()] {
            self.lists[literal.index()].retain(|w| !removed(w.clause));
            self.dirty[literal.index()] = false;
        }
    }

    /// Filters watchers of removed clauses from every dirty list.
    pub fn clean_all(&mut self, removed: impl Fn(ClauseRef) -> bool) {
        for literal in std::mem::take(&mut self.dirties) {
            if self.dirty[literal.index()] {
                self.lists[literal.index()].retain(|w| !removed(w.clause));
                self.dirty[literal.index()] = false;
            }
        }
    }

    /// The list of `literal`, as a pointer.
    ///
    /// A pointer (rather than a slice) to help simplify [propagation](crate::procedures::propagate), which examines the list of the literal being propagated while updating the lists of *other* literals.
    /// As such, care should be taken to avoid creating aliases.
    ///
    /// # Safety
    /// No check is made on whether a list exists for the literal.
    pub unsafe fn list_unchecked(&mut self, literal: Lit) -> *mut Vec<Watcher> {
        self.lists.get_unchecked_mut(literal.index())
    }

    /// The list of `literal`.
    pub fn list(&self, literal: Lit) -> &[Watcher] {
        &self.lists[literal.index()]
    }

    /// Mutable access to every list, e.g. for reference rewriting during garbage collection.
    pub fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<Watcher>> {
        self.lists.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::arena::ClauseArena;

    #[test]
    fn smudge_and_clean() {
        let mut arena = ClauseArena::default();
        let watched = arena
            .alloc(&[Lit::positive(0), Lit::positive(1)], false)
            .unwrap();
        let removed = arena
            .alloc(&[Lit::negative(0), Lit::positive(1)], false)
            .unwrap();
        arena.mark_removed(removed);

        let mut watches = WatchDB::default();
        watches.ensure_atom(0);
        watches.ensure_atom(1);

        let p = Lit::positive(0);
        watches.watch(p, Watcher::new(watched, Lit::positive(1)));
        watches.watch(p, Watcher::new(removed, Lit::positive(1)));

        watches.smudge(p);
        watches.clean_all(|c| arena.is_removed(c));

        assert_eq!(watches.list(p).len(), 1);
        assert_eq!(watches.list(p)[0].clause, watched);
    }
}
