//! A library for determining the satisfiability of boolean formulas written in conjunctive normal form, with support for symmetry breaking over permutation generators.
//!
//! orbit_sat is a conflict-driven clause-learning (CDCL) solver in the MiniSAT family, extended with symmetry-breaking predicates (SBPs).
//! Given a formula and a collection of permutations which map variables to variables while preserving satisfiability, the solver restricts search to lexicographic leaders of the orbits induced by those permutations --- either by emitting symmetry-breaking clauses up front, or by synthesizing them lazily as the search makes their antecedents true.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [solver](crate::context::GenericSolver).
//!
//! Internally, and at a high level, a solve is viewed in terms of the manipulation of, and relationships between, a handful of databases:
//! - A formula is stored in a [clause database](crate::db::clause), backed by a compacting [arena](crate::db::arena).
//! - A valuation, together with the reason and level of each assignment, is stored in an [atom database](crate::db::atom).
//! - The order in which assignments were made is stored on a [trail](crate::db::trail), which doubles as the propagation queue.
//! - Clauses interested in an assignment are indexed by a [watch database](crate::db::watch).
//! - Permutations, equalities, and their watches are stored in a [symmetry database](crate::symmetry).
//!
//! Useful starting points, then, may be:
//! - The high-level [solve procedure](crate::procedures::solve) to inspect the dynamics of a solve.
//! - The [propagator](crate::procedures::propagate) and [conflict analysis](crate::procedures::analysis) for the core loop.
//! - The [symmetry module](crate::symmetry) for the details of static and dynamic symmetry breaking.
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Example
//!
//! ```rust
//! # use orbit_sat::config::Config;
//! # use orbit_sat::context::Solver;
//! # use orbit_sat::reports::Report;
//! # use orbit_sat::structures::literal::Lit;
//! let mut solver = Solver::from_config(Config::default());
//!
//! let p = solver.fresh_atom();
//! let q = solver.fresh_atom();
//!
//! let not_p_or_q = vec![Lit::negative(p), Lit::positive(q)];
//! let p_or_not_q = vec![Lit::positive(p), Lit::negative(q)];
//! assert!(solver.add_clause(not_p_or_q).is_ok());
//! assert!(solver.add_clause(p_or_not_q).is_ok());
//!
//! assert_eq!(solver.solve(), Report::Satisfiable);
//! ```
//!
//! # Logs
//!
//! To help diagnose issues, (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//! No log implementation is installed by the library --- see [misc::log] for the targets.
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to propagation can be filtered with `RUST_LOG=propagation …`
//! - Logs of symmetry-breaking clause synthesis can be found with `RUST_LOG=symmetry=info …`

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;

pub mod builder;
pub mod procedures;

pub mod symmetry;

pub mod misc;
pub mod reports;
