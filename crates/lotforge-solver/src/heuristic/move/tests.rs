//! Tests for move evaluation and commit.

use super::*;
use lotforge_core::Solution;
use lotforge_test::{generated, random_solution, solution_with, tight_periods};

const TOLERANCE: f64 = 1e-6;

fn tight_solution() -> Solution {
    let instance = tight_periods();
    solution_with(
        &instance,
        &[
            &[(0, 6.0), (2, 7.5), (1, 9.0), (0, 4.0)],
            &[(2, 5.0), (0, 8.0), (2, 3.5)],
        ],
    )
}

fn assert_commits_cleanly(solution: &Solution, m: Move) {
    let mut after = solution.clone();
    let expected = solution.score() + m.move_value();
    let predicted_changeover = m.delta().changeover;
    let predicted_shortage = m.delta().shortage;
    m.apply(&mut after).unwrap();

    assert_eq!(after.score(), expected);
    assert!((after.score() - after.recalculate_score()).abs() < TOLERANCE);
    assert!((after.changeover() - after.full_changeover()).abs() < TOLERANCE);
    assert_eq!(after.shortage(), after.full_shortage());
    assert_eq!(predicted_changeover, after.changeover());
    assert_eq!(predicted_shortage, after.shortage());
}

#[test]
fn test_insert_across_machines() {
    let solution = tight_solution();
    let m = evaluate_insert(&solution, Coordinate::new(1, 1, 0, 2)).unwrap();
    assert_eq!(m.kind(), MoveKind::Insert);
    assert_eq!(m.delta().production.len(), 2);
    assert_commits_cleanly(&solution, m);
}

#[test]
fn test_insert_within_machine_to_adjacent_positions() {
    let solution = tight_solution();
    for (from, to) in [(1, 2), (2, 1), (0, 3), (3, 0)] {
        let m = evaluate_insert(&solution, Coordinate::new(0, from, 0, to)).unwrap();
        assert_eq!(m.delta().production.len(), 1);
        assert_commits_cleanly(&solution, m);
    }
}

#[test]
fn test_insert_rejects_no_ops_and_incapable_machines() {
    let solution = tight_solution();
    // Same position.
    assert!(evaluate_insert(&solution, Coordinate::new(0, 1, 0, 1)).is_none());
    // Past the end of its own machine.
    assert!(evaluate_insert(&solution, Coordinate::new(0, 1, 0, 4)).is_none());
    // Part 1 cannot run on machine 1.
    assert!(evaluate_insert(&solution, Coordinate::new(0, 2, 1, 0)).is_none());
    // Missing slot or machine.
    assert!(evaluate_insert(&solution, Coordinate::new(1, 3, 0, 0)).is_none());
    assert!(evaluate_insert(&solution, Coordinate::new(2, 0, 0, 0)).is_none());
    // Appending to another machine is allowed.
    assert!(evaluate_insert(&solution, Coordinate::new(0, 0, 1, 3)).is_some());
}

#[test]
fn test_exchange_within_and_across_machines() {
    let solution = tight_solution();
    for c in [
        Coordinate::new(0, 0, 0, 1),
        Coordinate::new(0, 3, 0, 1),
        Coordinate::new(1, 2, 0, 3),
        Coordinate::new(0, 0, 1, 0),
    ] {
        let m = evaluate_exchange(&solution, c).unwrap();
        assert_eq!(m.kind(), MoveKind::Exchange);
        assert_commits_cleanly(&solution, m);
    }
}

#[test]
fn test_exchange_rejects_identical_work_and_one_way_capability() {
    let instance = tight_periods();
    let solution = solution_with(&instance, &[&[(2, 5.0), (1, 4.0)], &[(2, 5.0), (0, 3.0)]]);

    // Same part and duration on both ends.
    assert!(evaluate_exchange(&solution, Coordinate::new(0, 0, 1, 0)).is_none());
    // Part 1 would arrive on machine 1.
    assert!(evaluate_exchange(&solution, Coordinate::new(0, 1, 1, 1)).is_none());
    assert!(evaluate_exchange(&solution, Coordinate::new(0, 0, 0, 0)).is_none());
    assert!(evaluate_exchange(&solution, Coordinate::new(0, 0, 1, 2)).is_none());
}

#[test]
fn test_swap_kind_commits_as_relocation() {
    let solution = tight_solution();
    let insert = evaluate_insert(&solution, Coordinate::new(0, 0, 0, 2)).unwrap();
    let swap = Move::new(
        MoveKind::Swap,
        insert.coordinate(),
        insert.move_value(),
        insert.delta().clone(),
    );
    assert_eq!(swap.edit(), insert.edit());

    let mut a = solution.clone();
    let mut b = solution.clone();
    insert.apply(&mut a).unwrap();
    swap.apply(&mut b).unwrap();
    assert_eq!(a.sequences(), b.sequences());
    assert_eq!(a.score(), b.score());
}

#[test]
fn test_every_candidate_matches_recalculation() {
    for seed in 0..4 {
        let instance = generated(seed, 4, 3, 4);
        let solution = random_solution(&instance, seed + 100, 9);

        for mi in 0..solution.num_machines() {
            for pi in 0..solution.sequence(mi).len() {
                for me in 0..solution.num_machines() {
                    for pe in 0..=solution.sequence(me).len() {
                        let c = Coordinate::new(mi, pi, me, pe);
                        if let Some(m) = evaluate_insert(&solution, c) {
                            assert_commits_cleanly(&solution, m);
                        }
                        if let Some(m) = evaluate_exchange(&solution, c) {
                            assert_commits_cleanly(&solution, m);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_improving_and_priority_flags() {
    let solution = tight_solution();
    let m = evaluate_insert(&solution, Coordinate::new(1, 1, 0, 2)).unwrap();
    assert_eq!(m.priority_improvement(), 0.0);
    let m = m.with_priority_improvement(-8.0);
    assert_eq!(m.priority_improvement(), -8.0);
    assert_eq!(m.is_improving(), m.move_value() < -IMPROVEMENT_EPSILON);
    assert_eq!(m.is_non_worsening(), m.move_value() <= IMPROVEMENT_EPSILON);
}
