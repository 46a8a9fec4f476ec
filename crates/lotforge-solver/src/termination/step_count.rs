//! Improvement step budget of one solver iteration.

use super::Termination;
use crate::scope::SolverScope;

/// Fires after `limit` committed improvement steps in the current iteration.
///
/// Only moves a local search commits count; slots placed by a constructive
/// and VNS shakes do not. The counter restarts with every iteration.
///
/// ```
/// use lotforge_solver::{SolverScope, StepCountTermination, Termination};
///
/// let budget = StepCountTermination::new(2);
/// let mut scope = SolverScope::new();
/// scope.start_solving();
/// scope.increment_step_count();
/// assert!(!budget.is_terminated(&scope));
/// scope.increment_step_count();
/// assert!(budget.is_terminated(&scope));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        solver_scope.total_step_count() >= self.limit
    }
}
