//! The algorithm for determining satisfiability, factored into a collection of procedures.
//!
//! - [propagate]: unit propagation over the watched-literal index.
//! - [analysis]: derivation of an asserting clause from a conflict.
//! - [backjump]: recovery from a conflict, or a restart.
//! - [decision]: choice of a branch literal.
//! - [search]: the conflict/decide loop, with restarts, reduction, and assumption handling.
//! - [solve]: the outer driver, managing restarts and extracting results.
//! - [simplify]: top-level simplification of the clause database.
//! - [gc]: compaction of the clause arena, with reference rewriting.

pub mod analysis;
pub mod backjump;
pub mod decision;
pub mod gc;
pub mod propagate;
pub mod search;
pub mod simplify;
pub mod solve;
