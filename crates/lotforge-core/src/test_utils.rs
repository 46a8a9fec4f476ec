//! Test utilities for lotforge-core
//!
//! Small hand-checkable instances and helpers that lay out machine
//! sequences through the regular placement path.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::instance::{Instance, InstanceData};
use crate::solution::Solution;
use crate::work_slot::WorkSlot;

/// Two parts, two machines, two periods of 100 time units.
///
/// Machine 0 produces both parts at rate 1, machine 1 only part 0.
/// Changeover is 5 in both directions and each part is short 20 units
/// at the end of the horizon.
pub fn two_by_two_data() -> InstanceData {
    InstanceData {
        name: "two-by-two".into(),
        num_parts: 2,
        num_machines: 2,
        num_periods: 2,
        production_rate: vec![vec![1, 1], vec![1, 0]],
        changeover_time: vec![vec![0, 5], vec![5, 0]],
        inventory: vec![vec![0, -20], vec![0, -20]],
        capacity: vec![vec![100, 100], vec![100, 100]],
        priority: vec![vec![1, 2], vec![1, 0]],
    }
}

pub fn two_by_two() -> Arc<Instance> {
    Arc::new(Instance::new(two_by_two_data()).expect("fixture instance is valid"))
}

/// Three periods of 10 time units, so slots routinely cross period boundaries.
///
/// Part 0 runs at rate 2 on machine 0 and rate 3 on machine 1; part 1 only
/// on machine 0 at rate 1; part 2 on both at rate 1. Changeovers are
/// asymmetric.
pub fn tight_periods_data() -> InstanceData {
    InstanceData {
        name: "tight-periods".into(),
        num_parts: 3,
        num_machines: 2,
        num_periods: 3,
        production_rate: vec![vec![2, 3], vec![1, 0], vec![1, 1]],
        changeover_time: vec![vec![0, 2, 3], vec![1, 0, 2], vec![4, 1, 0]],
        inventory: vec![vec![-5, -20, -40], vec![0, -8, -15], vec![-3, -6, -12]],
        capacity: vec![vec![10, 10, 10], vec![10, 10, 10]],
        priority: vec![vec![1, 2], vec![1, 0], vec![2, 1]],
    }
}

pub fn tight_periods() -> Arc<Instance> {
    Arc::new(Instance::new(tight_periods_data()).expect("fixture instance is valid"))
}

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

/// Places `slots` seeded random slots on random capable machines.
///
/// Durations are quarter multiples between half and twice the minimum
/// workload, so most are fractional and cross period boundaries.
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
