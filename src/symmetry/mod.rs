/*!
The symmetry layer: permutations of atoms, and the structures behind symmetry-breaking predicates.

# Theory

A permutation of the atoms of a formula which maps the formula to itself (up to reordering) partitions assignments into orbits: if some assignment satisfies the formula, so does its image under the permutation.
It follows search may be restricted to one representative per orbit, conventionally the *lexicographic leader*, without affecting satisfiability.

Symmetry-breaking predicates (SBPs) are clauses which reject some non-leaders.
Given a permutation with support x₁ < x₂ < … < xₙ and image f, the lex-leader constraint is a chain: at each position, if every earlier position agrees with its image, then xᵢ ≤ f(xᵢ).
The chain is encoded with fresh auxiliary atoms, one per position, in one of two shapes:

- The [Shatter encoding](crate::symmetry::sbp), following the Shatter tool, with four clauses per step.
- A simpler [implication chaining encoding](crate::symmetry::sbp), with three clauses per step.

Either encoding may route through auxiliary *equality* atoms which define xᵢ ↔ f(xᵢ) once, and are then shared between steps.

# Static and dynamic breaking

Statically, the full chain for every permutation is emitted before solving.
Most of those clauses never matter: a chain step is only of interest once every earlier equality holds on the current assignment.

Dynamically, only the head of each chain is emitted up front.
The database then watches, for each permutation, the first equality not known to hold.
Whenever an assignment touches a watched equality the [dynamic procedures](crate::symmetry::dynamic) test whether the equality and all its predecessors now hold, and if so queue the next chain step for emission --- amortizing away most of the static bulk.

# Structures

- [Permutation]: an image for each atom together with the *support*, the atoms actually moved.
- [Eq]: a single equality x ↔ f(x), with per-permutation chain links and lazily-added auxiliary atoms.
- [SymmetryDB]: the permutations, the equality table, the watched equalities, and the queue of chain steps awaiting emission.
*/

pub mod dynamic;
pub mod parse;
pub mod permutation;
pub mod sbp;

pub use permutation::Permutation;

use crate::{
    config::SymmetryConfig,
    structures::{atom::Atom, literal::Lit},
};

/// An index into the permutations of a [SymmetryDB].
pub type PermIndex = usize;

/// An index into the equality table of a [SymmetryDB].
pub type EqIndex = usize;

/// A single equality `atom ↔ image`, shared between the permutations whose chains pass through it.
pub struct Eq {
    /// The atom of the equality.
    pub atom: Atom,

    /// The image literal of the equality.
    pub image: Lit,

    /// True once the chain step for this equality has been emitted (or queued for emission).
    pub added: bool,

    /// True once the defining clauses of the auxiliary atoms have been emitted.
    pub def_added: bool,

    /// The auxiliary atom pair encoding the equality, if defined: the equality atom and its weak-ordering companion.
    pub aux: Option<(Atom, Atom)>,

    /// The equality which follows this one, per permutation.
    succ: Vec<Option<EqIndex>>,

    /// The equality which precedes this one, per permutation.
    pred: Vec<Option<EqIndex>>,
}

impl Eq {
    fn new(atom: Atom, image: Lit) -> Self {
        Eq {
            atom,
            image,
            added: false,
            def_added: false,
            aux: None,
            succ: Vec::default(),
            pred: Vec::default(),
        }
    }

    /// The equality which follows this one along `permutation`, if any.
    pub fn succ(&self, permutation: PermIndex) -> Option<EqIndex> {
        self.succ.get(permutation).copied().flatten()
    }

    /// The equality which precedes this one along `permutation`, if any.
    pub fn pred(&self, permutation: PermIndex) -> Option<EqIndex> {
        self.pred.get(permutation).copied().flatten()
    }

    fn set_succ(&mut self, permutation: PermIndex, eq: EqIndex) {
        if self.succ.len() <= permutation {
            self.succ.resize(permutation + 1, None);
        }
        self.succ[permutation] = Some(eq);
    }

    fn set_pred(&mut self, permutation: PermIndex, eq: EqIndex) {
        if self.pred.len() <= permutation {
            self.pred.resize(permutation + 1, None);
        }
        self.pred[permutation] = Some(eq);
    }
}

/// The symmetry database.
pub struct SymmetryDB {
    /// A copy of the symmetry switches of the solver configuration.
    pub config: SymmetryConfig,

    /// The installed permutations.
    pub permutations: Vec<Permutation>,

    /// The atoms subject to symmetry: those present when the first generator was installed.
    ///
    /// Auxiliary atoms introduced by the encodings are always above this bound.
    pub original_atoms: Atom,

    /// The equality table.
    eqs: Vec<Eq>,

    /// The equalities involving each (original) atom, as either endpoint.
    eqs_of: Vec<Vec<EqIndex>>,

    /// For each (original) atom and permutation, the equality currently under watch.
    ///
    /// Allocated exactly when dynamic breaking is configured.
    watched: Vec<Vec<Option<EqIndex>>>,

    /// Per permutation, the auxiliary atom at the current end of the emitted chain.
    pub chain_cursor: Vec<Option<Atom>>,

    /// Chain steps awaiting emission, in the order their antecedents were observed.
    ///
    /// Filled during assignment, drained between propagation rounds.
    pub pending: Vec<(EqIndex, PermIndex)>,

    /// Literals implied by settled values alone which surfaced above level zero, asserted once the trail returns to level zero.
    pub pending_units: Vec<Lit>,

    /// A count of mappings offered to the equality table, duplicates included.
    pub naive_equality_count: usize,

    /// A count of distinct equalities in the table.
    pub equality_count: usize,

    /// A count of chain steps emitted dynamically.
    pub dynamic_steps: usize,
}

impl SymmetryDB {
    pub fn new(config: &SymmetryConfig) -> Self {
        SymmetryDB {
            config: *config,
            permutations: Vec::default(),
            original_atoms: 0,
            eqs: Vec::default(),
            eqs_of: Vec::default(),
            watched: Vec::default(),
            chain_cursor: Vec::default(),
            pending: Vec::default(),
            pending_units: Vec::default(),
            naive_equality_count: 0,
            equality_count: 0,
            dynamic_steps: 0,
        }
    }

    /// True if at least one permutation is installed.
    pub fn active(&self) -> bool {
        !self.permutations.is_empty()
    }

    /// Fixes the set of atoms subject to symmetry and sizes the per-atom tables.
    ///
    /// Called once, when the first generator is installed.
    pub fn fix_original_atoms(&mut self, atoms: Atom) {
        if self.original_atoms != 0 {
            return;
        }
        self.original_atoms = atoms;
        self.eqs_of = vec![Vec::default(); atoms as usize];
        if self.config.dynamic {
            self.watched = vec![Vec::default(); atoms as usize];
        }
    }

    /// True if `atom` is subject to symmetry.
    pub fn original(&self, atom: Atom) -> bool {
        atom < self.original_atoms
    }

    /// The equality table entry at `index`.
    pub fn eq(&self, index: EqIndex) -> &Eq {
        &self.eqs[index]
    }

    /// Mutable access to the equality table entry at `index`.
    pub fn eq_mut(&mut self, index: EqIndex) -> &mut Eq {
        &mut self.eqs[index]
    }

    /// The equality for `atom ↔ image`, creating a table entry on first sight.
    ///
    /// The equality is registered with both of its endpoints.
    pub fn ensure_eq(&mut self, atom: Atom, image: Lit) -> EqIndex {
        self.naive_equality_count += 1;

        for index in &self.eqs_of[atom as usize] {
            let eq = &self.eqs[*index];
            if eq.atom == atom && eq.image == image {
                return *index;
            }
        }

        let index = self.eqs.len();
        self.eqs.push(Eq::new(atom, image));
        self.eqs_of[atom as usize].push(index);
        if image.atom() != atom {
            self.eqs_of[image.atom() as usize].push(index);
        }
        self.equality_count += 1;
        index
    }

    /// The equality for `atom ↔ image`, if present in the table.
    pub fn find_eq(&self, atom: Atom, image: Lit) -> Option<EqIndex> {
        self.eqs_of[atom as usize]
            .iter()
            .copied()
            .find(|index| self.eqs[*index].atom == atom && self.eqs[*index].image == image)
    }

    /// Links `prev` to `next` along `permutation`.
    pub fn chain(&mut self, permutation: PermIndex, prev: EqIndex, next: EqIndex) {
        self.eqs[prev].set_succ(permutation, next);
        self.eqs[next].set_pred(permutation, prev);
    }

    /// The equality watched for `atom` along `permutation`, if any.
    pub fn watched_eq(&self, atom: Atom, permutation: PermIndex) -> Option<EqIndex> {
        self.watched
            .get(atom as usize)
            .and_then(|by_perm| by_perm.get(permutation))
            .copied()
            .flatten()
    }

    /// Sets the watch for both endpoints of the equality at `index` along `permutation`.
    pub fn watch_eq(&mut self, index: EqIndex, permutation: PermIndex) {
        let (atom, image_atom) = {
            let eq = &self.eqs[index];
            (eq.atom, eq.image.atom())
        };
        self.set_watch_entry(atom, permutation, index);
        self.set_watch_entry(image_atom, permutation, index);
    }

    fn set_watch_entry(&mut self, atom: Atom, permutation: PermIndex, index: EqIndex) {
        let by_perm = &mut self.watched[atom as usize];
        if by_perm.len() <= permutation {
            by_perm.resize(permutation + 1, None);
        }
        by_perm[permutation] = Some(index);
    }

    /// A count of symmetry-breaking clause steps queued but not yet emitted.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
