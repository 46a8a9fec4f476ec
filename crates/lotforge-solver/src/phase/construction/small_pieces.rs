use lotforge_core::{Result, Solution};
use rand::seq::SliceRandom;

use super::{random_machine_with_room, Constructive};
use crate::scope::SolverScope;

/// Shuffles the unassigned pool and appends each slot to a random capable
/// machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallPiecesConstructive;

impl SmallPiecesConstructive {
    pub fn new() -> Self {
        Self
    }
}

impl Constructive for SmallPiecesConstructive {
    fn construct(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()> {
        let mut pieces = solution.unassigned().to_vec();
        pieces.shuffle(solver_scope.rng());

        for slot in pieces {
            let machine = random_machine_with_room(solution, slot.part(), solver_scope.rng())?;
            solution.add_work_slot(machine, slot)?;
        }

        solution.set_unassigned(Vec::new());
        solution.accumulate_production_and_score(true);
        Ok(())
    }

    fn constructive_type_name(&self) -> &'static str {
        "SmallPiecesConstructive"
    }
}
