//! Tests for termination conditions.

use std::time::Duration;

use super::*;
use crate::scope::SolverScope;

#[test]
fn test_step_count_termination() {
    let mut scope = SolverScope::new();
    let term = StepCountTermination::new(3);

    assert!(!term.is_terminated(&scope));
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(!term.is_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_time_termination_needs_a_started_clock() {
    let mut scope = SolverScope::new();
    let term = TimeTermination::new(Duration::ZERO);

    assert!(!term.is_terminated(&scope));
    scope.start_solving();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_time_termination_not_reached() {
    let mut scope = SolverScope::new();
    scope.start_solving();
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_or_termination_fires_on_any_child() {
    let mut scope = SolverScope::new();
    scope.start_solving();
    let term = OrTermination::new((TimeTermination::seconds(3600), StepCountTermination::new(1)));

    assert!(!term.is_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_scope_consults_its_termination() {
    let mut scope = SolverScope::new().with_termination(Box::new(StepCountTermination::new(2)));
    scope.start_solving();

    assert!(!scope.should_terminate());
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(scope.should_terminate());

    // Restarting the run resets the step counter.
    scope.start_solving();
    assert!(!scope.should_terminate());
}
