//! Tests for the constructives.

use lotforge_config::AlphaConfig;
use lotforge_core::{LotForgeError, Solution};
use lotforge_test::{tight_periods, two_by_two};

use super::*;

const TOLERANCE: f64 = 1e-6;

fn assert_feasible(solution: &Solution) {
    let instance = solution.instance();
    for (machine, slots) in solution.sequences().iter().enumerate() {
        for slot in slots {
            assert!(instance.can_produce(slot.part(), machine));
        }
    }
    assert!((solution.score() - solution.recalculate_score()).abs() < TOLERANCE);
    assert!(solution.validate().is_valid());
}

#[test]
fn test_random_constructive_covers_demand() {
    let instance = two_by_two();
    for seed in 0..8 {
        let mut solution = Solution::new(instance.clone());
        let mut scope = SolverScope::with_seed(seed);
        RandomConstructive::new().construct(&mut solution, &mut scope).unwrap();

        assert!(!solution.is_empty());
        assert_eq!(solution.shortage(), 0.0);
        assert_eq!(solution.score(), solution.changeover());
        assert_feasible(&solution);
    }
}

#[test]
fn test_random_constructive_with_period_crossings() {
    let instance = tight_periods();
    for seed in 0..6 {
        let mut solution = Solution::new(instance.clone());
        let mut scope = SolverScope::with_seed(seed);
        RandomConstructive::new().construct(&mut solution, &mut scope).unwrap();
        assert_feasible(&solution);
    }
}

#[test]
fn test_small_pieces_places_the_whole_pool() {
    let instance = tight_periods();
    let mut solution = Solution::new(instance.clone());
    let mut scope = SolverScope::with_seed(3);
    SmallPiecesConstructive::new().construct(&mut solution, &mut scope).unwrap();

    assert!(!solution.has_unassigned());
    assert_eq!(solution.total_work_slots(), instance.no_shortage_slots().len());
    assert_feasible(&solution);
}

#[test]
fn test_grasp_candidates_cover_every_capable_machine() {
    let instance = two_by_two();
    let solution = Solution::new(instance.clone());
    let candidates = GraspConstructive::candidates(&solution).unwrap();

    let expected: usize = solution
        .unassigned()
        .iter()
        .map(|slot| instance.capable_machines(slot.part()).count())
        .sum();
    assert_eq!(candidates.len(), expected);

    for candidate in &candidates {
        let mut trial = solution.clone();
        trial
            .place_work_slot(candidate.machine, solution.unassigned()[candidate.unassigned_index])
            .unwrap();
        assert_eq!(candidate.cost, trial.recalculate_score() - solution.score());
    }
}

#[test]
fn test_greedy_selection_with_zero_alpha() {
    let candidates = [
        GraspCandidate { unassigned_index: 0, machine: 0, cost: 3.0 },
        GraspCandidate { unassigned_index: 1, machine: 1, cost: -2.0 },
        GraspCandidate { unassigned_index: 2, machine: 0, cost: 7.5 },
    ];
    let mut scope = SolverScope::with_seed(11);
    for strategy in [GraspStrategy::GreedyRandom, GraspStrategy::RandomGreedy] {
        for _ in 0..10 {
            let chosen = GraspConstructive::select(strategy, &candidates, 0.0, scope.rng()).unwrap();
            assert_eq!(chosen.unassigned_index, 1);
        }
    }
    assert!(GraspConstructive::select(GraspStrategy::GreedyRandom, &[], 0.5, scope.rng()).is_none());
}

#[test]
fn test_random_selection_reaches_every_candidate() {
    let candidates: Vec<GraspCandidate> = (0..4)
        .map(|i| GraspCandidate { unassigned_index: i, machine: 0, cost: i as f64 })
        .collect();
    let mut scope = SolverScope::with_seed(2);
    for strategy in [GraspStrategy::GreedyRandom, GraspStrategy::RandomGreedy] {
        let mut seen = [false; 4];
        for _ in 0..200 {
            let chosen = GraspConstructive::select(strategy, &candidates, 1.0, scope.rng()).unwrap();
            seen[chosen.unassigned_index] = true;
        }
        assert!(seen.iter().all(|&s| s), "{strategy:?} never picked some candidate");
    }
}

#[test]
fn test_grasp_construction_is_reproducible() {
    let instance = tight_periods();
    let build = |seed| {
        let mut solution = Solution::new(instance.clone());
        let mut scope = SolverScope::with_seed(seed);
        let mut grasp = GraspConstructive::new(GraspStrategy::GreedyRandom, AlphaConfig::Random);
        grasp.construct(&mut solution, &mut scope).unwrap();
        solution
    };

    let a = build(21);
    let b = build(21);
    assert!(!a.has_unassigned());
    assert_eq!(a.total_work_slots(), instance.no_shortage_slots().len());
    assert_eq!(a.sequences(), b.sequences());
    assert_eq!(a.score(), b.score());
    assert_feasible(&a);
}

#[test]
fn test_random_greedy_construction() {
    let mut solution = Solution::new(tight_periods());
    let mut scope = SolverScope::with_seed(5);
    let mut grasp = GraspConstructive::new(GraspStrategy::RandomGreedy, AlphaConfig::Fixed { value: 0.3 });
    grasp.construct(&mut solution, &mut scope).unwrap();

    assert!(!solution.has_unassigned());
    assert!(scope.stats().score_calculations > 0);
    assert_feasible(&solution);
}

#[test]
fn test_grasp_without_alpha_is_a_config_error() {
    let mut solution = Solution::new(two_by_two());
    let mut scope = SolverScope::new();
    let mut grasp = GraspConstructive::new(GraspStrategy::GreedyRandom, AlphaConfig::None);
    let err = grasp.construct(&mut solution, &mut scope).unwrap_err();
    assert!(matches!(err, LotForgeError::Config(_)));
    assert!(solution.is_empty());
}
