//! Solver phases.
//!
//! - [`construction`]: builds an initial solution from an empty one
//! - [`localsearch`]: improves a solution with one neighborhood
//! - [`SerialImprover`] and [`VndImprover`]: chain several improvers
//! - [`vns`]: shake and escalate around an improver

pub mod construction;
pub mod localsearch;
pub mod vns;

mod serial;
mod vnd;

use std::fmt::Debug;

use lotforge_core::{Result, Solution};

use crate::scope::SolverScope;

pub use serial::SerialImprover;
pub use vnd::VndImprover;

/// Improves a solution in place.
pub trait Improver: Send + Debug {
    /// Runs until no further improvement is found or the scope terminates.
    /// Returns whether the solution's score went down.
    ///
    /// # Errors
    ///
    /// Faults raised while committing moves or re-deriving timing.
    fn improve(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<bool>;

    /// Returns the name of this improver type.
    fn improver_type_name(&self) -> &'static str;
}

impl<I: Improver + ?Sized> Improver for Box<I> {
    fn improve(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<bool> {
        (**self).improve(solution, solver_scope)
    }

    fn improver_type_name(&self) -> &'static str {
        (**self).improver_type_name()
    }
}

#[cfg(test)]
mod tests;
