//! Termination conditions for a solver run.
//!
//! Terminations are queried between whole local-search steps and between VNS
//! iterations, never inside a single move evaluation.

mod composite;
mod step_count;
mod time;

use std::fmt::Debug;

use crate::scope::SolverScope;

pub use composite::OrTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool;
}

#[cfg(test)]
mod tests;
