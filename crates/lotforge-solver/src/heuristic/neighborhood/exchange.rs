use lotforge_core::{Coordinate, Result, Solution};
use rayon::prelude::*;

use super::{sample_kept, MoveFilter, Neighborhood};
use crate::heuristic::r#move::{evaluate_exchange, Move};
use crate::scope::SolverRng;

/// Swaps two slots, on one machine or across two.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeNeighborhood {
    filter: MoveFilter,
}

impl ExchangeNeighborhood {
    pub fn new(filter: MoveFilter) -> Self {
        Self { filter }
    }

    pub fn improving() -> Self {
        Self::new(MoveFilter::Improving)
    }

    pub fn filter(&self) -> MoveFilter {
        self.filter
    }

    /// Every feasible unordered pair of slots.
    ///
    /// Pairs with the same part and duration are skipped, as are pairs where
    /// either machine cannot produce the part it would receive.
    pub fn coordinates(solution: &Solution) -> Vec<Coordinate> {
        let instance = solution.instance();
        let machines = solution.num_machines();
        let mut coordinates = Vec::new();
        for machine_ini in 0..machines {
            for (position_ini, first) in solution.sequence(machine_ini).iter().enumerate() {
                for machine_end in machine_ini..machines {
                    if !instance.can_produce(first.part(), machine_end) {
                        continue;
                    }
                    let start = if machine_end == machine_ini { position_ini + 1 } else { 0 };
                    let sequence = solution.sequence(machine_end);
                    for (position_end, second) in sequence.iter().enumerate().skip(start) {
                        if first.same_work(second) || !instance.can_produce(second.part(), machine_ini) {
                            continue;
                        }
                        coordinates.push(Coordinate::new(machine_ini, position_ini, machine_end, position_end));
                    }
                }
            }
        }
        coordinates
    }
}

impl Neighborhood for ExchangeNeighborhood {
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>> {
        let filter = self.filter;
        Ok(Self::coordinates(solution)
            .into_par_iter()
            .filter_map(|c| evaluate_exchange(solution, c))
            .filter(|m| filter.keeps(m))
            .collect())
    }

    fn random_move(&self, solution: &Solution, rng: &mut SolverRng) -> Result<Option<Move>> {
        Ok(sample_kept(Self::coordinates(solution), rng, self.filter, |c| {
            evaluate_exchange(solution, c)
        }))
    }

    fn neighborhood_name(&self) -> &'static str {
        "Exchange"
    }
}
