//! `walksat`: an incomplete, stochastic local-search SAT solver implementing
//! Knuth's Algorithm W (WalkSAT).
//!
//! The crate is split into the three layers the algorithm naturally has:
//! an immutable [`Formula`] store, the [`Solver`] that owns all mutable
//! incremental state, and the [`Assignment`] a successful search returns.
//! Everything that touches a file, argv, or a terminal — DIMACS parsing, CLI
//! argument handling, logging configuration, run statistics, the assignment
//! printer — is an ambient concern that lives outside this crate, in the
//! companion `walksat-cli` binary.
//!
//! This solver never proves unsatisfiability beyond the trivial case of an
//! empty clause, rejected at [`FormulaBuilder`] construction time. On an
//! unsatisfiable formula with no empty clause, [`Solver::solve`] runs
//! forever; callers that need a bounded search drive [`Solver::step`] and
//! [`Solver::is_solved`] themselves.

pub mod assignment;
pub mod formula;
mod rng;
pub mod solver;
mod state;

pub use assignment::Assignment;
pub use formula::{EmptyClauseError, Formula, FormulaBuilder, Lit};
pub use solver::{Config, Solver};
