//! Tests for improver chains.

use std::sync::{Arc, Mutex};

use lotforge_core::Solution;
use lotforge_test::{generated, random_solution, two_by_two};

use super::*;
use crate::heuristic::neighborhood::{InsertNeighborhood, Neighborhood};
use crate::phase::localsearch::LocalSearch;
use crate::termination::StepCountTermination;

type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// Reports an improvement for its first `improvements` calls.
#[derive(Debug)]
struct ScriptedImprover {
    name: &'static str,
    improvements: usize,
    log: CallLog,
}

impl ScriptedImprover {
    fn boxed(name: &'static str, improvements: usize, log: &CallLog) -> Box<dyn Improver> {
        Box::new(Self {
            name,
            improvements,
            log: Arc::clone(log),
        })
    }
}

impl Improver for ScriptedImprover {
    fn improve(&mut self, _solution: &mut Solution, _solver_scope: &mut SolverScope) -> Result<bool> {
        self.log.lock().unwrap().push(self.name);
        if self.improvements > 0 {
            self.improvements -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn improver_type_name(&self) -> &'static str {
        self.name
    }
}

fn calls(log: &CallLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

#[test]
fn test_serial_runs_each_improver_once() {
    let log = CallLog::default();
    let mut serial = SerialImprover::new(vec![
        ScriptedImprover::boxed("a", 5, &log),
        ScriptedImprover::boxed("b", 0, &log),
    ]);
    let mut solution = Solution::new(two_by_two());
    let mut scope = SolverScope::new();

    assert!(serial.improve(&mut solution, &mut scope).unwrap());
    assert_eq!(calls(&log), ["a", "b"]);
}

#[test]
fn test_serial_reports_no_improvement() {
    let log = CallLog::default();
    let mut serial = SerialImprover::new(vec![
        ScriptedImprover::boxed("a", 0, &log),
        ScriptedImprover::boxed("b", 0, &log),
    ]);
    let mut solution = Solution::new(two_by_two());
    assert!(!serial.improve(&mut solution, &mut SolverScope::new()).unwrap());
}

#[test]
fn test_vnd_restarts_from_first_on_improvement() {
    let log = CallLog::default();
    let mut vnd = VndImprover::new(vec![
        ScriptedImprover::boxed("a", 1, &log),
        ScriptedImprover::boxed("b", 1, &log),
    ]);
    let mut solution = Solution::new(two_by_two());
    let mut scope = SolverScope::new();

    assert!(vnd.improve(&mut solution, &mut scope).unwrap());
    assert_eq!(calls(&log), ["a", "a", "b", "a", "b"]);
}

#[test]
fn test_chains_stop_when_terminated() {
    let log = CallLog::default();
    let mut scope = SolverScope::new().with_termination(Box::new(StepCountTermination::new(0)));
    scope.start_solving();
    let mut solution = Solution::new(two_by_two());

    let mut vnd = VndImprover::new(vec![ScriptedImprover::boxed("a", 3, &log)]);
    assert!(!vnd.improve(&mut solution, &mut scope).unwrap());
    let mut serial = SerialImprover::new(vec![ScriptedImprover::boxed("b", 3, &log)]);
    assert!(!serial.improve(&mut solution, &mut scope).unwrap());
    assert!(calls(&log).is_empty());
}

#[test]
fn test_vnd_over_collapsing_and_plain_search_ends_insert_optimal() {
    for seed in 0..3 {
        let instance = generated(seed, 4, 3, 4);
        let mut solution = random_solution(&instance, seed + 50, 12);
        let before = solution.score();
        let mut scope = SolverScope::with_seed(seed);

        let improvers: Vec<Box<dyn Improver>> = vec![
            Box::new(LocalSearch::best_improvement(InsertNeighborhood::improving()).collapsing()),
            Box::new(LocalSearch::best_improvement(InsertNeighborhood::improving())),
        ];
        let mut vnd = VndImprover::new(improvers);
        vnd.improve(&mut solution, &mut scope).unwrap();

        assert!(solution.score() <= before);
        assert!(InsertNeighborhood::improving().moves(&solution).unwrap().is_empty());
        assert!(solution.validate().is_valid());
    }
}
