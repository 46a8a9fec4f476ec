use lotforge_core::{Result, Solution};
use tracing::trace;

use super::Improver;
use crate::scope::SolverScope;

/// Variable Neighborhood Descent over a list of improvers.
///
/// Runs improver `k`, restarting from the first whenever it improves and
/// moving on to the next otherwise; stops once the last one fails.
#[derive(Debug)]
pub struct VndImprover {
    improvers: Vec<Box<dyn Improver>>,
}

impl VndImprover {
    pub fn new(improvers: Vec<Box<dyn Improver>>) -> Self {
        Self { improvers }
    }
}

impl Improver for VndImprover {
    fn improve(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<bool> {
        let count = self.improvers.len();
        let mut improved = false;
        let mut k = 0usize;

        while k < count {
            if solver_scope.should_terminate() {
                break;
            }
            if self.improvers[k].improve(solution, solver_scope)? {
                improved = true;
                trace!(event = "vnd_restart", from = k, score = solution.score());
                k = 0; // Restart from first improver
            } else {
                k += 1; // Try next improver
            }
        }
        Ok(improved)
    }

    fn improver_type_name(&self) -> &'static str {
        "VariableNeighborhoodDescent"
    }
}
