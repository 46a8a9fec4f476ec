//! Local search phase implementation.

use std::fmt::Debug;

use lotforge_core::{LotForgeError, Result, Solution};
use tracing::{debug, trace};

use crate::heuristic::neighborhood::Neighborhood;
use crate::heuristic::r#move::IMPROVEMENT_EPSILON;
use crate::phase::localsearch::{BestImprovementForager, FirstImprovementForager, LocalSearchForager};
use crate::phase::Improver;
use crate::scope::SolverScope;
use crate::stats::PhaseStats;

/// Local search that improves an existing solution.
///
/// Each step:
/// 1. Asks the neighborhood for every kept move
/// 2. Offers them to the forager until it quits early
/// 3. Commits the picked move, or stops when nothing was picked
///
/// A collapsing local search merges adjacent same-part slots before each
/// step and splits them again afterwards. A step whose round trip does not
/// lower the score, or whose split would exceed a machine's slot budget, is
/// rolled back and ends the search.
///
/// # Type Parameters
/// * `N` - The neighborhood explorer
/// * `F` - The forager
pub struct LocalSearch<N, F>
where
    N: Neighborhood,
    F: LocalSearchForager,
{
    neighborhood: N,
    forager: F,
    collapsing: bool,
    step_limit: Option<u64>,
}

impl<N: Neighborhood> LocalSearch<N, BestImprovementForager> {
    /// Best-improvement descent over `neighborhood`.
    pub fn best_improvement(neighborhood: N) -> Self {
        Self::new(neighborhood, BestImprovementForager::new())
    }
}

impl<N: Neighborhood> LocalSearch<N, FirstImprovementForager> {
    /// First-improvement descent over `neighborhood`.
    pub fn first_improvement(neighborhood: N) -> Self {
        Self::new(neighborhood, FirstImprovementForager::new())
    }
}

impl<N, F> LocalSearch<N, F>
where
    N: Neighborhood,
    F: LocalSearchForager,
{
    pub fn new(neighborhood: N, forager: F) -> Self {
        Self {
            neighborhood,
            forager,
            collapsing: false,
            step_limit: None,
        }
    }

    /// Runs every step on the collapsed solution.
    pub fn collapsing(mut self) -> Self {
        self.collapsing = true;
        self
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn is_collapsing(&self) -> bool {
        self.collapsing
    }

    /// Commits one picked move. Returns false when the forager picked none.
    fn step(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope, phase_stats: &mut PhaseStats) -> Result<bool> {
        self.forager.step_started();
        let moves = self.neighborhood.moves(solution)?;
        let mut evaluated = 0usize;
        for m in moves {
            evaluated += 1;
            self.forager.add_move(m);
            if self.forager.is_quit_early() {
                break;
            }
        }
        solver_scope.stats_mut().record_evaluations(evaluated);
        phase_stats.record_evaluations(evaluated);

        match self.forager.pick_move() {
            Some(m) => {
                m.apply(solution)?;
                solver_scope.stats_mut().record_accepted();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn collapsing_step(
        &mut self,
        solution: &mut Solution,
        solver_scope: &mut SolverScope,
        phase_stats: &mut PhaseStats,
    ) -> Result<bool> {
        let snapshot = solution.clone();
        solution.collapse()?;
        let moved = self.step(solution, solver_scope, phase_stats)?;
        match solution.uncollapse() {
            Ok(()) => {}
            // Splitting would overrun a machine's slot budget.
            Err(LotForgeError::Capacity { .. }) => {
                *solution = snapshot;
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
        if moved && solution.score() < snapshot.score() - IMPROVEMENT_EPSILON {
            return Ok(true);
        }
        *solution = snapshot;
        Ok(false)
    }
}

impl<N, F> Debug for LocalSearch<N, F>
where
    N: Neighborhood,
    F: LocalSearchForager,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearch")
            .field("neighborhood", &self.neighborhood)
            .field("forager", &self.forager)
            .field("collapsing", &self.collapsing)
            .field("step_limit", &self.step_limit)
            .finish()
    }
}

impl<N, F> Improver for LocalSearch<N, F>
where
    N: Neighborhood,
    F: LocalSearchForager,
{
    fn improve(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<bool> {
        let mut phase_stats = PhaseStats::new(self.improver_type_name());
        let initial_score = solution.score();

        debug!(
            event = "phase_start",
            phase = self.improver_type_name(),
            neighborhood = self.neighborhood.neighborhood_name(),
            collapsing = self.collapsing,
            score = initial_score,
        );

        loop {
            if solver_scope.should_terminate() {
                break;
            }
            if let Some(limit) = self.step_limit {
                if phase_stats.step_count >= limit {
                    break;
                }
            }

            let moved = if self.collapsing {
                self.collapsing_step(solution, solver_scope, &mut phase_stats)?
            } else {
                self.step(solution, solver_scope, &mut phase_stats)?
            };
            if !moved {
                break;
            }

            phase_stats.record_step();
            let step = solver_scope.increment_step_count();
            trace!(event = "step", step = step, score = solution.score());
        }

        debug!(
            event = "phase_end",
            phase = self.improver_type_name(),
            duration_ms = phase_stats.elapsed_ms(),
            steps = phase_stats.step_count,
            speed = phase_stats.moves_per_second(),
            score = solution.score(),
        );

        Ok(solution.score() < initial_score - IMPROVEMENT_EPSILON)
    }

    fn improver_type_name(&self) -> &'static str {
        if self.collapsing {
            "CollapsingLocalSearch"
        } else {
            "LocalSearch"
        }
    }
}
