/*!
A database of clause related things.

Non-unit clauses live in the [arena](crate::db::arena), with the database keeping references to original and learnt clauses apart --- learnt clauses carry an activity and may be forgotten, original clauses may not.
Unit clauses are not stored: their literal is placed on the trail at level zero, which records the same information.

The database also owns the clause activity parameters, and the reduction procedure which discards unhelpful learnt clauses.

Attachment to [watch lists](crate::db::watch) and removal require access to sibling databases, which are passed to the relevant methods.
*/

use crate::{
    config::{Activity, Config},
    db::{
        arena::{ClauseArena, ClauseRef},
        atom::AtomDB,
        watch::{WatchDB, Watcher},
    },
    misc::log::targets::{self},
};

/// The clause activity at which all activities are rescaled.
const RESCALE_LIMIT: f32 = 1e20;

/// A database of clause related things.
pub struct ClauseDB {
    /// The arena holding every stored clause.
    pub arena: ClauseArena,

    /// References to clauses of the original formula, symmetry-breaking predicates included.
    pub originals: Vec<ClauseRef>,

    /// References to learnt clauses.
    pub learnts: Vec<ClauseRef>,

    /// The activity added to a clause when bumped, dynamically adjusted.
    bump: Activity,

    /// The factor by which the bump grows each conflict.
    decay: Activity,

    /// A count of literals across attached original clauses.
    pub original_literals: usize,

    /// A count of literals across attached learnt clauses.
    pub learnt_literals: usize,
}

impl ClauseDB {
    pub fn new(config: &Config) -> Self {
        ClauseDB {
            arena: ClauseArena::default(),
            originals: Vec::default(),
            learnts: Vec::default(),
            bump: 1.0,
            decay: config.clause_decay.value,
            original_literals: 0,
            learnt_literals: 0,
        }
    }

    /// A count of attached original clauses.
    pub fn original_count(&self) -> usize {
        self.originals.len()
    }

    /// A count of attached learnt clauses.
    pub fn learnt_count(&self) -> usize {
        self.learnts.len()
    }

    /// Places the clause on the watch lists of its first two literals.
    pub fn attach(&mut self, clause: ClauseRef, watch_db: &mut WatchDB) {
        let length = self.arena.length(clause);
        debug_assert!(length > 1);

        let zero = self.arena.literal(clause, 0);
        let one = self.arena.literal(clause, 1);
        watch_db.watch(!zero, Watcher::new(clause, one));
        watch_db.watch(!one, Watcher::new(clause, zero));

        if self.arena.is_learnt(clause) {
            self.learnt_literals += length;
        } else {
            self.original_literals += length;
        }
    }

    /// Removes the clause from the watch lists of its first two literals.
    ///
    /// Lazy (default) detachment marks the lists for filtering on demand; strict detachment scans immediately.
    pub fn detach(&mut self, clause: ClauseRef, strict: bool, watch_db: &mut WatchDB) {
        let length = self.arena.length(clause);
        debug_assert!(length > 1);

        let zero = self.arena.literal(clause, 0);
        let one = self.arena.literal(clause, 1);
        if strict {
            watch_db.unwatch(!zero, clause);
            watch_db.unwatch(!one, clause);
        } else {
            watch_db.smudge(!zero);
            watch_db.smudge(!one);
        }

        if self.arena.is_learnt(clause) {
            self.learnt_literals -= length;
        } else {
            self.original_literals -= length;
        }
    }

    /// True if the clause is the reason for the assignment of its first literal.
    ///
    /// Locked clauses must not be removed, and must survive garbage collection.
    pub fn locked(&self, clause: ClauseRef, atom_db: &AtomDB) -> bool {
        let zero = self.arena.literal(clause, 0);
        atom_db.value_of_lit(zero) == Some(true)
            && atom_db.reason_of(zero.atom()) == Some(clause)
    }

    /// Detaches the clause, frees its arena space, and forgets any reason pointing at it.
    pub fn remove(&mut self, clause: ClauseRef, atom_db: &mut AtomDB, watch_db: &mut WatchDB) {
        self.detach(clause, false, watch_db);
        // Don't leave reasons pointing at freed memory.
        if self.locked(clause, atom_db) {
            atom_db.clear_reason(self.arena.literal(clause, 0).atom());
        }
        self.arena.mark_removed(clause);
        self.arena.free(clause);
    }

    /// Bumps the activity of a learnt clause, rescoring the activity of all learnt clauses if the limit is met.
    pub fn bump_activity(&mut self, clause: ClauseRef) {
        let bumped = self.arena.activity(clause) + self.bump as f32;
        self.arena.set_activity(clause, bumped);

        if bumped > RESCALE_LIMIT {
            for learnt in &self.learnts {
                let scaled = self.arena.activity(*learnt) * 1e-20;
                self.arena.set_activity(*learnt, scaled);
            }
            self.bump *= 1e-20;
        }
    }

    /// Increases the activity added by future bumps, in effect decaying the activity of all learnt clauses.
    pub fn decay_activity(&mut self) {
        self.bump *= 1.0 / self.decay;
    }

    /// Removes roughly half of the learnt clauses, sparing those locked by the current assignment and all binary clauses.
    ///
    /// Learnt clauses are ordered so binary and high-activity clauses sort last, the lower half is discarded, and remaining clauses with activity below `bump / learnt count` are discarded also.
    pub fn reduce(&mut self, atom_db: &mut AtomDB, watch_db: &mut WatchDB) {
        let learnts = std::mem::take(&mut self.learnts);
        if learnts.is_empty() {
            return;
        }

        // Any clause below this activity is a candidate regardless of position.
        let extra_limit = (self.bump / learnts.len() as Activity) as f32;

        let mut ordered = learnts;
        {
            let arena = &self.arena;
            let precedes = |x: ClauseRef, y: ClauseRef| {
                arena.length(x) > 2 && (arena.length(y) == 2 || arena.activity(x) < arena.activity(y))
            };
            ordered.sort_by(|x, y| {
                if precedes(*x, *y) {
                    std::cmp::Ordering::Less
                } else if precedes(*y, *x) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            });
        }

        let half = ordered.len() / 2;
        let mut kept = Vec::with_capacity(ordered.len() - half);

        for (position, clause) in ordered.iter().enumerate() {
            let clause = *clause;
            if self.arena.length(clause) > 2
                && !self.locked(clause, atom_db)
                && (position < half || self.arena.activity(clause) < extra_limit)
            {
                self.remove(clause, atom_db, watch_db);
            } else {
                kept.push(clause);
            }
        }

        log::info!(target: targets::REDUCTION, "Learnt clauses reduced to: {}", kept.len());
        self.learnts = kept;
    }

    /// Moves every live original and learnt clause into the region `fresh`, dropping removed clauses from the lists.
    pub fn relocate_lists(&mut self, fresh: &mut ClauseArena) {
        let mut learnts = std::mem::take(&mut self.learnts);
        learnts.retain(|clause| !self.arena.is_removed(*clause));
        for clause in learnts.iter_mut() {
            self.arena.reloc(clause, fresh);
        }
        self.learnts = learnts;

        let mut originals = std::mem::take(&mut self.originals);
        originals.retain(|clause| !self.arena.is_removed(*clause));
        for clause in originals.iter_mut() {
            self.arena.reloc(clause, fresh);
        }
        self.originals = originals;
    }
}
