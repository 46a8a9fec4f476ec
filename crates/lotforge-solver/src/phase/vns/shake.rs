use lotforge_core::{Result, Solution};
use tracing::trace;

use crate::heuristic::neighborhood::{ExchangeNeighborhood, Neighborhood};
use crate::scope::SolverScope;

/// Applies `k * moves_per_k` random exchange moves regardless of their value.
#[derive(Debug, Clone, Copy)]
pub struct RandomMoveShake {
    neighborhood: ExchangeNeighborhood,
    moves_per_k: usize,
}

impl Default for RandomMoveShake {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomMoveShake {
    pub fn new(moves_per_k: usize) -> Self {
        Self {
            neighborhood: ExchangeNeighborhood::default(),
            moves_per_k,
        }
    }

    /// Returns the number of moves actually applied, fewer than requested
    /// only when the solution has no exchange left to make.
    pub fn shake(&self, solution: &mut Solution, k: usize, solver_scope: &mut SolverScope) -> Result<usize> {
        let wanted = k * self.moves_per_k;
        for applied in 0..wanted {
            let Some(m) = self.neighborhood.random_move(solution, solver_scope.rng())? else {
                return Ok(applied);
            };
            trace!(event = "shake_move", coordinate = ?m.coordinate(), value = m.move_value());
            m.apply(solution)?;
        }
        Ok(wanted)
    }
}
