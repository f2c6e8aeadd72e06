/*!
A database of 'atom related' things, accessed via fields on an [AtomDB] struct.

Things include:
- A current (often partial) valuation, and the previous value of each atom (for phase saving).
- The reason and decision level of each assignment.
- An [IndexHeap] recording the activity of atoms, where any unassigned decision atom is (typically) active on the heap.
- The [seen tags](SeenTag) consulted during conflict analysis.
- Free and released atom lists, so released atoms may be reused.

The database stores facts about atoms; the order of assignments belongs to the [trail](crate::db::trail) and watch lists to the [watch database](crate::db::watch).
*/

use crate::{
    config::Activity,
    db::{arena::ClauseRef, LevelIndex},
    generic::index_heap::IndexHeap,
    misc::log::targets::{self},
    structures::{
        atom::{Atom, ATOM_MAX},
        literal::Lit,
    },
    types::err::AtomDBError,
};

/// The state of an atom with respect to conflict analysis.
///
/// During the derivation of a learnt clause the tags distinguish seen ([Source]) from unseen ([Undef]) atoms.
/// During minimization of the learnt clause the remaining tags cache the outcome of redundancy checks, so a failed or settled subtree is never traversed twice.
///
/// [Source]: SeenTag::Source
/// [Undef]: SeenTag::Undef
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeenTag {
    /// Not seen.
    Undef,

    /// Seen, as part of the conflict or a reason (or, during minimization, as a literal of the learnt clause).
    Source,

    /// Established as redundant in the learnt clause.
    Removable,

    /// Established as *not* redundant in the learnt clause.
    Failed,
}

/// The atom database.
pub struct AtomDB {
    /// A current (often partial) valuation.
    valuation: Vec<Option<bool>>,

    /// The value last held by each atom, consulted when phase saving.
    previous_value: Vec<bool>,

    /// A user-requested polarity for each atom, taking precedence over the previous value.
    user_value: Vec<Option<bool>>,

    /// Whether each atom may be used as a decision.
    decision: Vec<bool>,

    /// The clause which forced each assignment, if any.
    reason: Vec<Option<ClauseRef>>,

    /// The decision level of each assignment.
    ///
    /// Stale for unassigned atoms.
    level: Vec<LevelIndex>,

    /// Conflict analysis tags.
    seen: Vec<SeenTag>,

    /// An [IndexHeap] recording the activity of atoms.
    activity_heap: IndexHeap<Activity>,

    /// Atoms ready for reuse.
    free: Vec<Atom>,

    /// Atoms released while unassigned, pending recycling by simplification.
    released: Vec<Atom>,

    /// The activity added to an atom when bumped, dynamically adjusted.
    bump: Activity,

    /// The factor by which the bump grows each conflict.
    decay: Activity,
}

/// The activity at which all activities are rescaled.
const RESCALE_LIMIT: Activity = 1e100;

impl AtomDB {
    pub fn new(variable_decay: Activity) -> Self {
        AtomDB {
            valuation: Vec::default(),
            previous_value: Vec::default(),
            user_value: Vec::default(),
            decision: Vec::default(),
            reason: Vec::default(),
            level: Vec::default(),
            seen: Vec::default(),
            activity_heap: IndexHeap::default(),
            free: Vec::default(),
            released: Vec::default(),
            bump: 1.0,
            decay: variable_decay,
        }
    }

    /// A count of atoms in the database, including freed atoms.
    pub fn count(&self) -> usize {
        self.valuation.len()
    }

    /// A fresh atom --- on Ok the atom is part of the language of the solver.
    ///
    /// Freed atoms are reused before the database is extended, with all per-atom facts reset either way.
    pub fn fresh_atom(
        &mut self,
        initial_activity: Activity,
        user_value: Option<bool>,
        decision: bool,
    ) -> Result<Atom, AtomDBError> {
        let atom = match self.free.pop() {
            Some(atom) => {
                self.valuation[atom as usize] = None;
                self.previous_value[atom as usize] = false;
                self.user_value[atom as usize] = user_value;
                self.decision[atom as usize] = decision;
                self.reason[atom as usize] = None;
                self.level[atom as usize] = 0;
                self.seen[atom as usize] = SeenTag::Undef;
                atom
            }

            None => {
                let atom = match self.valuation.len().try_into() {
                    Ok(atom) if atom <= ATOM_MAX => atom,
                    _ => return Err(AtomDBError::AtomsExhausted),
                };

                self.valuation.push(None);
                self.previous_value.push(false);
                self.user_value.push(user_value);
                self.decision.push(decision);
                self.reason.push(None);
                self.level.push(0);
                self.seen.push(SeenTag::Undef);
                atom
            }
        };

        self.activity_heap.add(atom as usize, initial_activity);
        if decision {
            self.activity_heap.activate(atom as usize);
        }

        Ok(atom)
    }

    /// Queues an atom for reuse, once simplification has removed it from the trail.
    pub fn note_released(&mut self, atom: Atom) {
        self.released.push(atom);
    }

    /// The atoms released since the last recycling.
    pub fn released(&self) -> &[Atom] {
        &self.released
    }

    /// Moves released atoms to the free list, for reuse by fresh_atom.
    pub fn recycle_released(&mut self) {
        self.free.append(&mut self.released);
    }

    // Values

    /// The value of an atom on the current valuation.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.valuation[atom as usize]
    }

    /// The value of a literal on the current valuation.
    ///
    /// `Some(true)` if the atom holds the polarity of the literal, `Some(false)` if the complement, and `None` otherwise.
    pub fn value_of_lit(&self, literal: Lit) -> Option<bool> {
        self.valuation[literal.atom() as usize].map(|value| value == literal.polarity())
    }

    /// Makes a literal true, with a note of the level of and reason for the assignment.
    ///
    /// # Soundness
    /// Requires the atom to have no value --- assigning an already-assigned atom breaks the trail invariants.
    pub fn set_value(&mut self, literal: Lit, level: LevelIndex, reason: Option<ClauseRef>) {
        let atom = literal.atom() as usize;
        debug_assert!(self.valuation[atom].is_none());
        self.valuation[atom] = Some(literal.polarity());
        self.level[atom] = level;
        self.reason[atom] = reason;
    }

    /// Clears the value of an atom, without touching the activity heap.
    pub fn clear_value(&mut self, atom: Atom) {
        log::trace!(target: targets::VALUATION, "Cleared atom: {atom}");
        self.valuation[atom as usize] = None;
    }

    /// The value last held by the atom, `false` for a fresh atom.
    pub fn previous_value(&self, atom: Atom) -> bool {
        self.previous_value[atom as usize]
    }

    /// Saves the value of an atom for a future decision.
    pub fn save_phase(&mut self, atom: Atom, value: bool) {
        self.previous_value[atom as usize] = value;
    }

    /// The user-requested polarity of the atom, if any.
    pub fn user_value(&self, atom: Atom) -> Option<bool> {
        self.user_value[atom as usize]
    }

    // Assignment details

    /// The reason for the assignment of an atom, if the assignment was forced.
    ///
    /// Stale for unassigned atoms, unless cleared.
    pub fn reason_of(&self, atom: Atom) -> Option<ClauseRef> {
        self.reason[atom as usize]
    }

    /// Mutable access to the reason slot of an atom, for reference rewriting during garbage collection.
    pub fn reason_mut(&mut self, atom: Atom) -> &mut Option<ClauseRef> {
        &mut self.reason[atom as usize]
    }

    /// Forgets the reason for the assignment of an atom, e.g. as the reason clause is to be removed.
    pub fn clear_reason(&mut self, atom: Atom) {
        self.reason[atom as usize] = None;
    }

    /// The decision level on which the atom was assigned.
    ///
    /// Stale for unassigned atoms.
    pub fn level_of(&self, atom: Atom) -> LevelIndex {
        self.level[atom as usize]
    }

    // Decisions

    /// Whether the atom may be used as a decision.
    pub fn is_decision(&self, atom: Atom) -> bool {
        self.decision[atom as usize]
    }

    /// Sets whether the atom may be used as a decision, adjusting the activity heap to match.
    pub fn set_decision(&mut self, atom: Atom, decision: bool) {
        self.decision[atom as usize] = decision;
        if decision {
            self.heap_insert(atom);
        } else {
            self.activity_heap.remove(atom as usize);
        }
    }

    // Seen tags

    /// The conflict analysis tag of the atom.
    pub fn seen_tag(&self, atom: Atom) -> SeenTag {
        self.seen[atom as usize]
    }

    /// Sets the conflict analysis tag of the atom.
    pub fn set_seen_tag(&mut self, atom: Atom, tag: SeenTag) {
        self.seen[atom as usize] = tag;
    }

    /// True if the atom has a tag other than [SeenTag::Undef].
    pub fn seen(&self, atom: Atom) -> bool {
        self.seen[atom as usize] != SeenTag::Undef
    }

    // Activity

    /// Bumps the activity of an atom, rescoring the activity of all atoms if the limit is met.
    pub fn bump_activity(&mut self, atom: Atom) {
        let bumped = self.activity_heap.value_at(atom as usize) + self.bump;
        self.activity_heap.revalue(atom as usize, bumped);

        if bumped > RESCALE_LIMIT {
            self.activity_heap.apply_to_all(|activity| activity * 1e-100);
            self.bump *= 1e-100;
        }

        self.activity_heap.heapify_if_active(atom as usize);
    }

    /// Increases the activity added by future bumps, in effect decaying the activity of all atoms.
    pub fn decay_activity(&mut self) {
        self.bump *= 1.0 / self.decay;
    }

    // The heap

    /// Activates the atom on the heap, if the atom is a decision atom.
    pub fn heap_insert(&mut self, atom: Atom) {
        if self.decision[atom as usize] {
            self.activity_heap.activate(atom as usize);
        }
    }

    /// Pops the most active atom off the heap.
    ///
    /// The atom may have a value --- filtering is left to the caller.
    pub fn heap_pop_most_active(&mut self) -> Option<Atom> {
        self.activity_heap.pop_max().map(|index| index as Atom)
    }

    /// An active heap atom chosen by position, in no particular order.
    pub fn heap_nth(&self, n: usize) -> Option<Atom> {
        self.activity_heap.active_nth(n).map(|index| index as Atom)
    }

    /// A count of atoms active on the heap.
    pub fn heap_active_count(&self) -> usize {
        self.activity_heap.active_count()
    }

    /// Rebuilds the heap from exactly the unassigned decision atoms.
    pub fn rebuild_heap(&mut self) {
        self.activity_heap.clear_active();
        for atom in 0..self.count() as Atom {
            if self.decision[atom as usize] && self.value_of(atom).is_none() {
                self.activity_heap.activate(atom as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_and_recycled_atoms() {
        let mut db = AtomDB::new(0.95);
        let a = db.fresh_atom(0.0, None, true).unwrap();
        let b = db.fresh_atom(0.0, None, true).unwrap();
        assert_eq!((a, b), (0, 1));

        db.note_released(a);
        db.recycle_released();
        let again = db.fresh_atom(0.0, None, true).unwrap();
        assert_eq!(again, a);
        assert_eq!(db.count(), 2);
    }

    #[test]
    fn literal_values() {
        let mut db = AtomDB::new(0.95);
        let a = db.fresh_atom(0.0, None, true).unwrap();

        assert_eq!(db.value_of_lit(Lit::positive(a)), None);
        db.set_value(Lit::negative(a), 1, None);
        assert_eq!(db.value_of(a), Some(false));
        assert_eq!(db.value_of_lit(Lit::negative(a)), Some(true));
        assert_eq!(db.value_of_lit(Lit::positive(a)), Some(false));
        assert_eq!(db.level_of(a), 1);
    }

    #[test]
    fn activity_orders_the_heap() {
        let mut db = AtomDB::new(0.95);
        let a = db.fresh_atom(0.0, None, true).unwrap();
        let b = db.fresh_atom(0.0, None, true).unwrap();

        db.bump_activity(b);
        assert_eq!(db.heap_pop_most_active(), Some(b));
        assert_eq!(db.heap_pop_most_active(), Some(a));
        assert_eq!(db.heap_pop_most_active(), None);

        db.rebuild_heap();
        assert_eq!(db.heap_active_count(), 2);
    }
}
