//! Solver-level scope.
//!
//! [`SolverScope`] carries everything a run shares across constructives,
//! improvers and the VNS loop: the seeded random source, the clock and step
//! counter the terminations read, the best solution seen so far and the
//! statistics.

mod solver;

pub use solver::{SolverRng, SolverScope, DEFAULT_SEED};
