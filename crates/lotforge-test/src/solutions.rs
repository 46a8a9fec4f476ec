//! Solution builders.

use std::sync::Arc;

use lotforge_core::{Instance, Solution, WorkSlot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds a solution whose machine `m` holds `layout[m]` as `(part, duration)` pairs.
pub fn solution_with(instance: &Arc<Instance>, layout: &[&[(usize, f64)]]) -> Solution {
    let mut solution = Solution::new(Arc::clone(instance));
    for (machine, slots) in layout.iter().enumerate() {
        for &(part, duration) in slots.iter() {
            solution
                .add_work_slot(machine, WorkSlot::new(part, duration))
                .expect("layout fits the work slot budget");
        }
    }
    solution.accumulate_production_and_score(true);
    solution
}

/// Places `slots` random slots on random capable machines with room.
///
/// Durations are drawn between half and twice the minimum workload, so slots
/// of different lengths mix and often cross period boundaries.
pub fn random_solution(instance: &Arc<Instance>, seed: u64, slots: usize) -> Solution {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut solution = Solution::new(Arc::clone(instance));
    let minimum = instance.minimum_workload();

    for _ in 0..slots {
        let part = rng.random_range(0..instance.num_parts());
        let machines: Vec<usize> = instance
            .capable_machines(part)
            .filter(|&m| solution.has_room(m))
            .collect();
        if machines.is_empty() {
            continue;
        }
        let machine = machines[rng.random_range(0..machines.len())];
        let duration = (rng.random_range(minimum * 0.5..minimum * 2.0) * 4.0).round() / 4.0;
        solution
            .add_work_slot(machine, WorkSlot::new(part, duration))
            .expect("machine has room");
    }
    solution.accumulate_production_and_score(true);
    solution
}
