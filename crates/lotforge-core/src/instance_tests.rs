//! Tests for instance construction and derived constants.

use std::sync::Arc;

use super::*;
use crate::solution::Solution;
use crate::test_utils::{tight_periods_data, two_by_two_data};

#[test]
fn test_derived_constants() {
    let instance = Instance::new(two_by_two_data()).unwrap();

    assert_eq!(instance.minimum_workload(), 5.0);
    assert_eq!(instance.maximum_shortage(), -40);
    assert_eq!(instance.maximum_work_slots(), 8);

    let slots = instance.no_shortage_slots();
    assert_eq!(slots.len(), 8);
    assert!(slots.iter().all(|s| s.duration() == 5.0 && !s.is_placed()));
    assert_eq!(slots.iter().filter(|s| s.part() == 1).count(), 4);
}

#[test]
fn test_no_shortage_remainder_folds_into_last_slot() {
    let mut data = two_by_two_data();
    data.inventory = vec![vec![0, -17], vec![0, -3]];
    let instance = Instance::new(data).unwrap();

    let part0: Vec<f64> = instance
        .no_shortage_slots()
        .iter()
        .filter(|s| s.part() == 0)
        .map(|s| s.duration())
        .collect();
    assert_eq!(part0, vec![5.0, 5.0, 7.0]);

    // Below one minimum workload the single slot keeps the full minimum.
    let part1: Vec<f64> = instance
        .no_shortage_slots()
        .iter()
        .filter(|s| s.part() == 1)
        .map(|s| s.duration())
        .collect();
    assert_eq!(part1, vec![5.0]);
}

#[test]
fn test_no_shortage_uses_slowest_capable_rate() {
    let instance = Instance::new(tight_periods_data()).unwrap();

    // Part 0 needs 40 units, slowest capable rate is 2: 20 hours with a
    // minimum workload of 4 gives five slots of 4.
    let part0: Vec<f64> = instance
        .no_shortage_slots()
        .iter()
        .filter(|s| s.part() == 0)
        .map(|s| s.duration())
        .collect();
    assert_eq!(part0, vec![4.0; 5]);
}

#[test]
fn test_surplus_part_needs_no_slots() {
    let mut data = two_by_two_data();
    data.inventory = vec![vec![0, 10], vec![0, -20]];
    let instance = Instance::new(data).unwrap();

    assert_eq!(instance.maximum_shortage(), -20);
    assert_eq!(instance.final_demand(0), 0);
    assert!(instance.no_shortage_slots().iter().all(|s| s.part() == 1));
}

#[test]
fn test_part_without_machine_is_infeasible() {
    let mut data = two_by_two_data();
    data.production_rate = vec![vec![1, 1], vec![0, 0]];

    let err = Instance::new(data).unwrap_err();
    assert!(matches!(err, LotForgeError::InfeasibleInstance(_)));
    assert!(err.to_string().contains("No machine can produce part 1"));
}

#[test]
fn test_shape_mismatch_is_invalid() {
    let mut data = two_by_two_data();
    data.inventory = vec![vec![0, -20, 0], vec![0, -20]];

    let err = Instance::new(data).unwrap_err();
    assert!(matches!(err, LotForgeError::InvalidInstance(_)));
    assert!(err.to_string().contains("inventory row 0"));
}

#[test]
fn test_zero_changeover_matrix_is_infeasible() {
    let mut data = two_by_two_data();
    data.changeover_time = vec![vec![0, 0], vec![0, 0]];

    assert!(matches!(
        Instance::new(data),
        Err(LotForgeError::InfeasibleInstance(_))
    ));
}

#[test]
fn test_machine_down_in_final_period_is_accepted() {
    let mut data = two_by_two_data();
    data.capacity = vec![vec![100, 100], vec![100, 0]];
    let instance = Arc::new(Instance::new(data).unwrap());
    assert_eq!(instance.machine_capacity(1, 1), 0.0);

    let mut solution = Solution::new(Arc::clone(&instance));
    solution.place_work_slot(1, WorkSlot::new(0, 60.0)).unwrap();
    // Fills period 0, skips the idle period and parks past the horizon.
    solution.place_work_slot(1, WorkSlot::new(0, 60.0)).unwrap();

    let timing = solution.sequence(1)[1].timing().unwrap();
    assert_eq!((timing.ini_period, timing.ini_time), (0, 60.0));
    assert_eq!((timing.end_period, timing.end_time), (2, 20.0));
    assert_eq!(solution.total_production().to_rows(), vec![vec![100, 0], vec![100, 0]]);
    assert_eq!(solution.shortage(), 20.0);
    assert_eq!(solution.score(), solution.recalculate_score());
    assert!(solution.validate().is_valid());
}

#[test]
fn test_accessors() {
    let instance = Instance::new(tight_periods_data()).unwrap();

    assert_eq!(instance.capable_machines(0).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(instance.capable_machines(1).collect::<Vec<_>>(), vec![0]);
    assert!(!instance.can_produce(1, 1));
    assert_eq!(instance.transition_cost(2, 2), 0.0);
    assert_eq!(instance.transition_cost(2, 0), 4.0);
    assert_eq!(instance.transition_cost(0, 2), 3.0);
    assert_eq!(instance.machine_capacity(1, 7), 10.0);
}
