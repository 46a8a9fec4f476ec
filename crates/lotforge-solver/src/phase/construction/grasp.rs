//! GRASP construction.
//!
//! Every step evaluates each (unassigned slot, capable machine) pair by
//! placing the slot on a private clone and recalculating its score from
//! scratch. The candidates are independent, so they are evaluated in
//! parallel; the collected list keeps enumeration order, which keeps a
//! seeded run reproducible.

use lotforge_config::AlphaConfig;
use lotforge_core::{LotForgeError, Result, Solution};
use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use tracing::trace;

use super::{no_room_for, random_machine_with_room, Constructive};
use crate::scope::{SolverRng, SolverScope};

/// How a candidate is chosen from the evaluated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspStrategy {
    /// Uniform pick among candidates within `alpha` of the best cost.
    GreedyRandom,
    /// Best candidate of a uniform sample of `ceil((1 - alpha) n)`.
    RandomGreedy,
}

/// Placing unassigned slot `unassigned_index` at the end of `machine`
/// changes the score by `cost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspCandidate {
    pub unassigned_index: usize,
    pub machine: usize,
    pub cost: f64,
}

/// GRASP constructive over the solution's unassigned pool.
///
/// `alpha` runs from 0 (purely greedy) to 1 (purely random). With
/// [`AlphaConfig::Random`] it is drawn once per construction.
#[derive(Debug, Clone, Copy)]
pub struct GraspConstructive {
    strategy: GraspStrategy,
    alpha: AlphaConfig,
}

impl GraspConstructive {
    pub fn new(strategy: GraspStrategy, alpha: AlphaConfig) -> Self {
        Self { strategy, alpha }
    }

    pub fn strategy(&self) -> GraspStrategy {
        self.strategy
    }

    fn resolve_alpha(&self, rng: &mut SolverRng) -> Result<f64> {
        match self.alpha {
            AlphaConfig::Fixed { value } => Ok(value),
            AlphaConfig::Random => Ok(rng.random::<f64>()),
            AlphaConfig::None => Err(LotForgeError::Config(
                "GRASP construction needs an alpha policy".to_string(),
            )),
        }
    }

    /// Evaluates every placement of an unassigned slot onto a capable
    /// machine with room.
    pub fn candidates(solution: &Solution) -> Result<Vec<GraspCandidate>> {
        let instance = solution.instance();
        let mut pairs = Vec::new();
        for (index, slot) in solution.unassigned().iter().enumerate() {
            for machine in instance.capable_machines(slot.part()) {
                if solution.has_room(machine) {
                    pairs.push((index, machine));
                }
            }
        }

        pairs
            .into_par_iter()
            .map(|(unassigned_index, machine)| -> Result<GraspCandidate> {
                let mut trial = solution.clone();
                trial.place_work_slot(machine, solution.unassigned()[unassigned_index])?;
                Ok(GraspCandidate {
                    unassigned_index,
                    machine,
                    cost: trial.recalculate_score() - solution.score(),
                })
            })
            .collect()
    }

    /// Picks one candidate according to `strategy`. `None` for an empty list.
    pub fn select(
        strategy: GraspStrategy,
        candidates: &[GraspCandidate],
        alpha: f64,
        rng: &mut SolverRng,
    ) -> Option<GraspCandidate> {
        if candidates.is_empty() {
            return None;
        }
        match strategy {
            GraspStrategy::GreedyRandom => {
                let (min, max) = candidates
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                        (lo.min(c.cost), hi.max(c.cost))
                    });
                let threshold = min + alpha * (max - min);
                let restricted: Vec<&GraspCandidate> =
                    candidates.iter().filter(|c| c.cost <= threshold).collect();
                Some(*restricted[rng.random_range(0..restricted.len())])
            }
            GraspStrategy::RandomGreedy => {
                let n = candidates.len();
                let size = (((1.0 - alpha) * n as f64).ceil() as usize).clamp(1, n);
                index::sample(rng, n, size)
                    .into_iter()
                    .map(|i| candidates[i])
                    .min_by(|a, b| a.cost.total_cmp(&b.cost))
            }
        }
    }
}

impl Constructive for GraspConstructive {
    fn construct(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()> {
        let alpha = self.resolve_alpha(solver_scope.rng())?;

        if solution.is_empty() && solution.has_unassigned() {
            let rng = solver_scope.rng();
            let index = rng.random_range(0..solution.unassigned().len());
            let part = solution.unassigned()[index].part();
            let machine = random_machine_with_room(solution, part, rng)?;
            if let Some(slot) = solution.take_unassigned(index) {
                solution.place_work_slot(machine, slot)?;
            }
        }

        while solution.has_unassigned() {
            let candidates = Self::candidates(solution)?;
            solver_scope.stats_mut().record_score_calculations(candidates.len());

            let Some(chosen) = Self::select(self.strategy, &candidates, alpha, solver_scope.rng()) else {
                let part = solution.unassigned()[0].part();
                return Err(no_room_for(solution, part));
            };
            let slot = solution.take_unassigned(chosen.unassigned_index).ok_or_else(|| {
                LotForgeError::Fault(format!(
                    "GRASP candidate refers to missing unassigned slot {}",
                    chosen.unassigned_index
                ))
            })?;
            solution.place_work_slot(chosen.machine, slot)?;
            trace!(
                event = "grasp_pick",
                placed = solution.total_work_slots(),
                candidates = candidates.len(),
                machine = chosen.machine,
                cost = chosen.cost,
            );
        }
        Ok(())
    }

    fn constructive_type_name(&self) -> &'static str {
        match self.strategy {
            GraspStrategy::GreedyRandom => "GraspGreedyRandom",
            GraspStrategy::RandomGreedy => "GraspRandomGreedy",
        }
    }
}
