//! Fixture instances.

use std::sync::Arc;

use lotforge_core::{Instance, InstanceData};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn build(data: InstanceData) -> Arc<Instance> {
    Arc::new(Instance::new(data).expect("fixture instance is valid"))
}

/// Two parts, two machines, two periods of 100 time units.
///
/// Machine 0 produces both parts at rate 1, machine 1 only part 0.
/// Changeover is 5 in both directions and each part is short 20 units at the
/// end of the horizon. Part 0 on machine 1 is non-preferred (priority 2).
pub fn two_by_two() -> Arc<Instance> {
    build(InstanceData {
        name: "two-by-two".into(),
        num_parts: 2,
        num_machines: 2,
        num_periods: 2,
        production_rate: vec![vec![1, 1], vec![1, 0]],
        changeover_time: vec![vec![0, 5], vec![5, 0]],
        inventory: vec![vec![0, -20], vec![0, -20]],
        capacity: vec![vec![100, 100], vec![100, 100]],
        priority: vec![vec![1, 2], vec![1, 0]],
    })
}

/// Three periods of 10 time units, so slots routinely cross period boundaries.
pub fn tight_periods() -> Arc<Instance> {
    build(InstanceData {
        name: "tight-periods".into(),
        num_parts: 3,
        num_machines: 2,
        num_periods: 3,
        production_rate: vec![vec![2, 3], vec![1, 0], vec![1, 1]],
        changeover_time: vec![vec![0, 2, 3], vec![1, 0, 2], vec![4, 1, 0]],
        inventory: vec![vec![-5, -20, -40], vec![0, -8, -15], vec![-3, -6, -12]],
        capacity: vec![vec![10, 10, 10], vec![10, 10, 10]],
        priority: vec![vec![1, 2], vec![1, 0], vec![2, 1]],
    })
}

/// One machine, two parts, changeover 7 both ways.
pub fn single_machine() -> Arc<Instance> {
    build(InstanceData {
        name: "single-machine".into(),
        num_parts: 2,
        num_machines: 1,
        num_periods: 2,
        production_rate: vec![vec![1], vec![1]],
        changeover_time: vec![vec![0, 7], vec![7, 0]],
        inventory: vec![vec![0, -30], vec![0, -30]],
        capacity: vec![vec![100, 100]],
        priority: vec![vec![1], vec![1]],
    })
}

/// Seeded random instance.
///
/// Every part gets at least one capable machine, changeovers are positive off
/// the diagonal and inventory only falls over the horizon.
pub fn generated(seed: u64, parts: usize, machines: usize, periods: usize) -> Arc<Instance> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut production_rate = vec![vec![0i64; machines]; parts];
    let mut priority = vec![vec![0i64; machines]; parts];
    for part in 0..parts {
        for machine in 0..machines {
            if rng.random_bool(0.6) {
                production_rate[part][machine] = rng.random_range(1..=4);
            }
        }
        if production_rate[part].iter().all(|&r| r == 0) {
            let machine = rng.random_range(0..machines);
            production_rate[part][machine] = rng.random_range(1..=4);
        }
        for machine in 0..machines {
            if production_rate[part][machine] > 0 {
                priority[part][machine] = rng.random_range(1..=3);
            }
        }
    }

    let changeover_time = (0..parts)
        .map(|from| {
            (0..parts)
                .map(|to| if from == to { 0 } else { rng.random_range(1..=6) })
                .collect()
        })
        .collect();

    let inventory = (0..parts)
        .map(|_| {
            let mut level: i64 = rng.random_range(0..=10);
            (0..periods)
                .map(|_| {
                    level -= rng.random_range(0..=30);
                    level
                })
                .collect()
        })
        .collect();

    let capacity = (0..machines)
        .map(|_| (0..periods).map(|_| rng.random_range(20..=40)).collect())
        .collect();

    build(InstanceData {
        name: format!("generated-{seed}"),
        num_parts: parts,
        num_machines: machines,
        num_periods: periods,
        production_rate,
        changeover_time,
        inventory,
        capacity,
        priority,
    })
}
