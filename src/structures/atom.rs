//! Atoms, the variables of a formula.
//!
//! An atom is an index, and most per-atom information is kept in vectors indexed by atom.
//! In particular there is no atom *structure* --- the value, level, reason, and activity of an atom all live in the [atom database](crate::db::atom).

/// An atom, in the form of an index.
pub type Atom = u32;

/// The upper limit on atoms, slightly less than the limit of the representation as an atom is paired with a polarity in a [literal](crate::structures::literal::Lit).
pub const ATOM_MAX: Atom = (u32::MAX >> 1) - 1;
