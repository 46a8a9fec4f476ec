//! Wall-clock budget of one solver iteration.

use std::time::Duration;

use super::Termination;
use crate::scope::SolverScope;

/// Fires once the current iteration has run for `limit`.
///
/// The clock is the one [`SolverScope::start_solving`] restarts at the top of
/// every iteration, so with several iterations configured each gets the full
/// budget. Before the first `start_solving` it never fires.
///
/// ```
/// use std::time::Duration;
/// use lotforge_solver::{SolverScope, Termination, TimeTermination};
///
/// let budget = TimeTermination::new(Duration::ZERO);
/// let mut scope = SolverScope::new();
/// assert!(!budget.is_terminated(&scope));
///
/// scope.start_solving();
/// assert!(budget.is_terminated(&scope));
/// assert_eq!(TimeTermination::seconds(90).limit(), Duration::from_secs(90));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        solver_scope
            .elapsed()
            .is_some_and(|elapsed| elapsed >= self.limit)
    }
}
