use lotforge_core::{Coordinate, Result, Solution};
use rayon::prelude::*;

use super::{sample_kept, MoveFilter, Neighborhood};
use crate::heuristic::r#move::{evaluate_insert, Move};
use crate::scope::SolverRng;

/// Relocates any slot to any position of any machine that can produce it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertNeighborhood {
    filter: MoveFilter,
}

impl InsertNeighborhood {
    pub fn new(filter: MoveFilter) -> Self {
        Self { filter }
    }

    /// Keeps only strictly improving relocations.
    pub fn improving() -> Self {
        Self::new(MoveFilter::Improving)
    }

    pub fn filter(&self) -> MoveFilter {
        self.filter
    }

    /// Every feasible relocation of `solution`.
    ///
    /// Within a machine the slot may go to any other index of the shortened
    /// sequence; on another machine with room it may also be appended.
    pub fn coordinates(solution: &Solution) -> Vec<Coordinate> {
        let instance = solution.instance();
        let machines = solution.num_machines();
        let mut coordinates = Vec::new();
        for machine_ini in 0..machines {
            for (position_ini, slot) in solution.sequence(machine_ini).iter().enumerate() {
                for machine_end in instance.capable_machines(slot.part()) {
                    let len = solution.sequence(machine_end).len();
                    if machine_end == machine_ini {
                        coordinates.extend(
                            (0..len)
                                .filter(|&p| p != position_ini)
                                .map(|p| Coordinate::new(machine_ini, position_ini, machine_end, p)),
                        );
                    } else if solution.has_room(machine_end) {
                        coordinates.extend(
                            (0..=len).map(|p| Coordinate::new(machine_ini, position_ini, machine_end, p)),
                        );
                    }
                }
            }
        }
        coordinates
    }
}

impl Neighborhood for InsertNeighborhood {
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>> {
        let filter = self.filter;
        Ok(Self::coordinates(solution)
            .into_par_iter()
            .filter_map(|c| evaluate_insert(solution, c))
            .filter(|m| filter.keeps(m))
            .collect())
    }

    fn random_move(&self, solution: &Solution, rng: &mut SolverRng) -> Result<Option<Move>> {
        Ok(sample_kept(Self::coordinates(solution), rng, self.filter, |c| {
            evaluate_insert(solution, c)
        }))
    }

    fn neighborhood_name(&self) -> &'static str {
        "Insert"
    }
}
