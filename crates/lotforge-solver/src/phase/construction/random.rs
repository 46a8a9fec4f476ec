use lotforge_core::{Result, Solution, WorkSlot};
use rand::Rng;

use super::{random_machine_with_room, Constructive};
use crate::scope::SolverScope;

/// Places random batches until no part has demand left.
///
/// A batch covers a uniformly drawn share of the part's pending demand. When
/// that share is below what a minimum-workload slot produces, or when a
/// minimum-workload slot already covers the rest, a minimum-workload slot is
/// placed instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomConstructive;

impl RandomConstructive {
    pub fn new() -> Self {
        Self
    }
}

impl Constructive for RandomConstructive {
    fn construct(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()> {
        let instance = solution.instance().clone();
        let minimum_workload = instance.minimum_workload();
        let mut pending: Vec<(usize, i64)> = (0..instance.num_parts())
            .map(|part| (part, instance.final_demand(part)))
            .filter(|&(_, demand)| demand > 0)
            .collect();

        while !pending.is_empty() {
            let rng = solver_scope.rng();
            let index = rng.random_range(0..pending.len());
            let (part, demand) = pending[index];
            let machine = random_machine_with_room(solution, part, rng)?;

            let rate = instance.production_rate(part, machine);
            let minimum_units = minimum_workload * rate as f64;
            let drawn = (rng.random::<f64>() * demand as f64) as i64;
            let (duration, units) = if minimum_units >= demand as f64 || (drawn as f64) < minimum_units {
                (minimum_workload, minimum_units as i64)
            } else {
                (drawn as f64 / rate as f64, drawn)
            };

            solution.add_work_slot(machine, WorkSlot::new(part, duration))?;

            let remaining = demand - units;
            if remaining <= 0 {
                pending.swap_remove(index);
            } else {
                pending[index].1 = remaining;
            }
        }

        solution.accumulate_production_and_score(true);
        Ok(())
    }

    fn constructive_type_name(&self) -> &'static str {
        "RandomConstructive"
    }
}
