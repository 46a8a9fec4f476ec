use lotforge_core::{Coordinate, Result, Solution};

use super::{sample_kept, ExchangeNeighborhood, InsertNeighborhood, MoveFilter, Neighborhood};
use crate::heuristic::r#move::{evaluate_exchange, evaluate_insert, Move, MoveKind};
use crate::scope::SolverRng;

/// Union of the Insert and Exchange neighborhoods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedNeighborhood {
    insert: InsertNeighborhood,
    exchange: ExchangeNeighborhood,
}

impl ExtendedNeighborhood {
    pub fn new(filter: MoveFilter) -> Self {
        Self {
            insert: InsertNeighborhood::new(filter),
            exchange: ExchangeNeighborhood::new(filter),
        }
    }

    pub fn improving() -> Self {
        Self::new(MoveFilter::Improving)
    }
}

impl Neighborhood for ExtendedNeighborhood {
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>> {
        let mut moves = self.insert.moves(solution)?;
        moves.extend(self.exchange.moves(solution)?);
        Ok(moves)
    }

    fn random_move(&self, solution: &Solution, rng: &mut SolverRng) -> Result<Option<Move>> {
        let candidates: Vec<(MoveKind, Coordinate)> = InsertNeighborhood::coordinates(solution)
            .into_iter()
            .map(|c| (MoveKind::Insert, c))
            .chain(
                ExchangeNeighborhood::coordinates(solution)
                    .into_iter()
                    .map(|c| (MoveKind::Exchange, c)),
            )
            .collect();
        Ok(sample_kept(candidates, rng, self.insert.filter(), |(kind, c)| match kind {
            MoveKind::Exchange => evaluate_exchange(solution, c),
            MoveKind::Insert | MoveKind::Swap => evaluate_insert(solution, c),
        }))
    }

    fn neighborhood_name(&self) -> &'static str {
        "Extended"
    }
}
