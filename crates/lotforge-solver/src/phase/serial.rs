use lotforge_core::{Result, Solution};

use super::Improver;
use crate::scope::SolverScope;

/// Runs each improver once, in order.
#[derive(Debug)]
pub struct SerialImprover {
    improvers: Vec<Box<dyn Improver>>,
}

impl SerialImprover {
    pub fn new(improvers: Vec<Box<dyn Improver>>) -> Self {
        Self { improvers }
    }
}

impl Improver for SerialImprover {
    fn improve(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<bool> {
        let mut improved = false;
        for improver in &mut self.improvers {
            if solver_scope.should_terminate() {
                break;
            }
            improved |= improver.improve(solution, solver_scope)?;
        }
        Ok(improved)
    }

    fn improver_type_name(&self) -> &'static str {
        "Serial"
    }
}
