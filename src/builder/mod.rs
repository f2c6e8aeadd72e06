/*!
Methods to build a solver: fresh atoms, clause addition, and related conveniences.

Clause addition simplifies against the current valuation: satisfied clauses and tautologies are skipped, false and duplicate literals are dropped.
A clause empty after simplification latches the solver unsatisfiable; a unit clause is placed on the trail and propagated.

Symmetry-breaking predicates go through the same path at level zero.
Above level zero --- as when synthesized dynamically --- they take a variant path which simplifies against settled values only and selects watches against the current valuation, so nothing undone by a backjump is baked into the stored clause.
*/

pub mod dimacs;

use crate::{
    context::GenericSolver,
    db::LevelIndex,
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::CClause,
        literal::Lit,
    },
    types::err::{self, ErrorKind},
};

/// Possible 'Ok' results from adding a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was stored, or enqueued if unit.
    Added,

    /// The clause was satisfied or tautological, and so contributes nothing.
    Skipped,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A fresh decision atom with no preferred polarity.
    ///
    /// Panics if the atom limit has been reached --- for fallible creation see [new_atom](GenericSolver::new_atom).
    pub fn fresh_atom(&mut self) -> Atom {
        match self.new_atom(None, true) {
            Ok(atom) => atom,
            Err(_) => panic!("! The atom limit has been reached"),
        }
    }

    /// A fresh atom, with an optional user polarity and a choice of whether the atom may be decided on.
    pub fn new_atom(
        &mut self,
        user_value: Option<bool>,
        decision: bool,
    ) -> Result<Atom, err::AtomDBError> {
        let initial_activity = match self.config.random_initial_activity.value {
            true => self.rng.random::<f64>() * 0.00001,
            false => 0.0,
        };

        let atom = self.atom_db.fresh_atom(initial_activity, user_value, decision)?;
        self.watch_db.ensure_atom(atom);
        Ok(atom)
    }

    /// Extends the language of the solver to (at least) `count` atoms.
    pub fn ensure_atoms(&mut self, count: Atom) {
        while self.atom_db.count() < count as usize {
            self.fresh_atom();
        }
    }

    /// Asserts the literal and queues its atom for reuse.
    ///
    /// Only unassigned atoms are released, to avoid releasing the same atom twice.
    /// The atom becomes available once simplification has removed it from the trail.
    pub fn release_atom(&mut self, literal: Lit) {
        if self.atom_db.value_of_lit(literal).is_none() {
            let _ = self.add_clause(vec![literal]);
            self.atom_db.note_released(literal.atom());
        }
    }

    /// Adds a clause to the solver.
    ///
    /// An `Err` is returned exactly when the formula has become (or already was) unsatisfiable, with the observation latched either way.
    pub fn add_clause(&mut self, clause: impl Into<CClause>) -> Result<ClauseOk, ErrorKind> {
        let clause = clause.into();
        assert!(
            self.decision_level() == 0,
            "! Clause addition above decision level zero"
        );
        self.add_clause_inner(clause, false)
    }

    /// Adds a clause, with `sbp` distinguishing symmetry-breaking predicates.
    ///
    /// SBPs may arrive above decision level zero, in which case addition takes the [during-search path](GenericSolver::add_sbp_clause_during_search).
    pub(crate) fn add_clause_inner(
        &mut self,
        mut clause: CClause,
        sbp: bool,
    ) -> Result<ClauseOk, ErrorKind> {
        if !self.ok {
            return Err(ErrorKind::FundamentalConflict);
        }

        if sbp && self.decision_level() > 0 {
            return self.add_sbp_clause_during_search(clause);
        }

        // Check if the clause is satisfied, and remove false and duplicate literals.
        clause.sort_unstable();
        let mut kept = 0;
        let mut previous: Option<Lit> = None;
        for index in 0..clause.len() {
            let literal = clause[index];
            if self.atom_db.value_of_lit(literal) == Some(true) || previous == Some(!literal) {
                return Ok(ClauseOk::Skipped);
            }
            if self.atom_db.value_of_lit(literal) != Some(false) && previous != Some(literal) {
                clause[kept] = literal;
                kept += 1;
                previous = Some(literal);
            }
        }
        clause.truncate(kept);

        match clause.len() {
            0 => {
                log::info!(target: targets::CLAUSE_DB, "Addition of an empty clause");
                self.ok = false;
                Err(ErrorKind::FundamentalConflict)
            }

            1 => {
                self.unchecked_enqueue(clause[0], None);
                match self.propagate() {
                    None => Ok(ClauseOk::Added),
                    Some(_) => {
                        self.ok = false;
                        Err(ErrorKind::FundamentalConflict)
                    }
                }
            }

            _ => {
                let clause_ref = match self.clause_db.arena.alloc(&clause, false) {
                    Ok(clause_ref) => clause_ref,
                    Err(e) => return Err(ErrorKind::from(e)),
                };
                self.clause_db.arena.set_sbp(clause_ref, sbp);
                self.clause_db.originals.push(clause_ref);
                self.clause_db.attach(clause_ref, &mut self.watch_db);
                Ok(ClauseOk::Added)
            }
        }
    }

    /// Adds a symmetry-breaking predicate above decision level zero.
    ///
    /// Assignments above level zero may be undone, so the clause is only simplified against settled (level-zero) values --- a literal merely false on the current branch stays in the stored clause.
    /// Watches are chosen to respect the current valuation: a non-false literal where possible, otherwise a false literal from the highest level, so the watch invariant is restored by any backjump.
    /// A clause unit under the current assignment asserts its literal with the clause as reason; a clause reduced to a single literal outright is queued for assertion at level zero.
    fn add_sbp_clause_during_search(&mut self, mut clause: CClause) -> Result<ClauseOk, ErrorKind> {
        debug_assert!(self.decision_level() > 0);

        let settled = |value: Option<bool>, level: LevelIndex| -> Option<bool> {
            match value {
                Some(v) if level == 0 => Some(v),
                _ => None,
            }
        };

        // As in the level-zero path, though only settled values simplify.
        clause.sort_unstable();
        let mut kept = 0;
        let mut previous: Option<Lit> = None;
        for index in 0..clause.len() {
            let literal = clause[index];
            let settled_value = settled(
                self.atom_db.value_of_lit(literal),
                self.atom_db.level_of(literal.atom()),
            );
            if settled_value == Some(true) || previous == Some(!literal) {
                return Ok(ClauseOk::Skipped);
            }
            if settled_value != Some(false) && previous != Some(literal) {
                clause[kept] = literal;
                kept += 1;
                previous = Some(literal);
            }
        }
        clause.truncate(kept);

        match clause.len() {
            0 => {
                log::info!(target: targets::CLAUSE_DB, "Addition of a settled-empty clause");
                self.ok = false;
                Err(ErrorKind::FundamentalConflict)
            }

            1 => {
                // A unit regardless of any decision: asserted once the trail returns to level zero.
                self.symmetry.pending_units.push(clause[0]);
                Ok(ClauseOk::Added)
            }

            _ => {
                // Watch a non-false literal if one exists, otherwise the most recently falsified.
                match clause
                    .iter()
                    .position(|l| self.atom_db.value_of_lit(*l) != Some(false))
                {
                    Some(position) => clause.swap(0, position),
                    None => {
                        let mut deepest = 0;
                        for position in 1..clause.len() {
                            if self.atom_db.level_of(clause[position].atom())
                                > self.atom_db.level_of(clause[deepest].atom())
                            {
                                deepest = position;
                            }
                        }
                        clause.swap(0, deepest);
                    }
                }

                // For the other watch, prefer a non-false literal, otherwise the false literal of the highest level.
                let mut watch = 1;
                for position in 1..clause.len() {
                    let literal = clause[position];
                    if self.atom_db.value_of_lit(literal) != Some(false) {
                        watch = position;
                        break;
                    }
                    if self.atom_db.level_of(literal.atom())
                        > self.atom_db.level_of(clause[watch].atom())
                    {
                        watch = position;
                    }
                }
                clause.swap(1, watch);

                let clause_ref = match self.clause_db.arena.alloc(&clause, false) {
                    Ok(clause_ref) => clause_ref,
                    Err(e) => return Err(ErrorKind::from(e)),
                };
                self.clause_db.arena.set_sbp(clause_ref, true);
                self.clause_db.originals.push(clause_ref);
                self.clause_db.attach(clause_ref, &mut self.watch_db);

                match (
                    self.atom_db.value_of_lit(clause[0]),
                    self.atom_db.value_of_lit(clause[1]),
                ) {
                    (None, Some(false)) => {
                        // Unit under the current assignment.
                        self.unchecked_enqueue(clause[0], Some(clause_ref));
                    }
                    (Some(false), _) => {
                        // Unsatisfiable on the current branch; noticed by propagation once a backjump frees a watch.
                        log::warn!(target: targets::CLAUSE_DB, "A symmetry-breaking predicate arrived falsified");
                    }
                    _ => {}
                }

                Ok(ClauseOk::Added)
            }
        }
    }

    /// The consequences, by propagation alone, of the given assumptions over the current formula.
    ///
    /// `None` if the assumptions are inconsistent with the formula; otherwise the literals forced, in propagation order.
    /// The solver is returned to level zero either way.
    pub fn implies(&mut self, assumptions: &[Lit]) -> Option<Vec<Lit>> {
        assert!(self.decision_level() == 0, "! Implication probe above level zero");

        self.trail.new_level();
        for assumption in assumptions {
            match self.atom_db.value_of_lit(*assumption) {
                Some(false) => {
                    self.backjump(0);
                    return None;
                }
                None => self.unchecked_enqueue(*assumption, None),
                Some(true) => {}
            }
        }

        let before = self.trail.len();
        let consequences = match self.propagate() {
            None => Some(self.trail.assignments()[before..].to_vec()),
            Some(_) => None,
        };

        self.backjump(0);
        consequences
    }
}
