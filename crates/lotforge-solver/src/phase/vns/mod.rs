//! Variable Neighborhood Search.
//!
//! The best solution found so far is perturbed with `k` random moves and
//! handed to an improver. An improvement resets `k` to zero, anything else
//! escalates it. Escalation stops once `k` reaches a configurable fraction
//! of the instance's part count.

mod shake;

use lotforge_core::{Result, Solution};
use tracing::{debug, info};

use crate::heuristic::r#move::IMPROVEMENT_EPSILON;
use crate::phase::Improver;
use crate::scope::SolverScope;
use crate::stats::PhaseStats;

pub use shake::RandomMoveShake;

/// Outcome of escalating the neighborhood index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Shake with this `k`.
    Continue(usize),
    /// The search is done.
    Stop,
}

/// Maps `k` to the index to shake with, stopping at `max_k_pct * num_parts`.
pub fn escalate(solution: &Solution, k: usize, max_k_pct: f64) -> Escalation {
    let limit = max_k_pct * solution.instance().num_parts() as f64;
    if k as f64 >= limit {
        Escalation::Stop
    } else {
        Escalation::Continue(k)
    }
}

/// Basic or general VNS, depending on the improver it is given.
#[derive(Debug)]
pub struct Vns {
    shake: RandomMoveShake,
    improver: Box<dyn Improver>,
    max_k_pct: f64,
}

impl Vns {
    pub fn new(shake: RandomMoveShake, improver: Box<dyn Improver>, max_k_pct: f64) -> Self {
        Self {
            shake,
            improver,
            max_k_pct,
        }
    }

    /// Improves `solution` and then searches around it until escalation
    /// stops or the scope terminates. Leaves the best solution found in
    /// `solution`.
    ///
    /// # Errors
    ///
    /// Faults raised while shaking or improving.
    pub fn run(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()> {
        let mut phase_stats = PhaseStats::new("VariableNeighborhoodSearch");
        info!(
            event = "phase_start",
            phase = phase_stats.phase_type,
            improver = self.improver.improver_type_name(),
            score = solution.score(),
        );

        self.improver.improve(solution, solver_scope)?;

        let mut k = 0usize;
        loop {
            if solver_scope.should_terminate() {
                break;
            }
            let Escalation::Continue(shake_k) = escalate(solution, k, self.max_k_pct) else {
                break;
            };

            let mut candidate = solution.clone();
            self.shake.shake(&mut candidate, shake_k, solver_scope)?;
            self.improver.improve(&mut candidate, solver_scope)?;
            phase_stats.record_step();

            let improved = candidate.score() < solution.score() - IMPROVEMENT_EPSILON;
            debug!(
                event = "step",
                step = phase_stats.step_count,
                k = shake_k,
                candidate_score = candidate.score(),
                score = solution.score(),
                improved = improved,
            );
            if improved {
                *solution = candidate;
                k = 0;
            } else {
                k += 1;
            }
        }

        info!(
            event = "phase_end",
            phase = phase_stats.phase_type,
            duration_ms = phase_stats.elapsed_ms(),
            steps = phase_stats.step_count,
            speed = phase_stats.moves_per_second(),
            score = solution.score(),
        );
        Ok(())
    }
}
