//! Neighborhood explorers.
//!
//! An explorer enumerates the candidate moves of a solution. Insert and
//! Exchange evaluate every feasible coordinate independently (in parallel),
//! the swap-chain explorer reaches the same relocations by walking slots one
//! adjacent swap at a time, and the priority explorer re-ranks relocations by
//! machine preference.

mod exchange;
mod extended;
mod insert;
mod priority;
mod swap_chain;

use std::fmt::Debug;

use lotforge_core::{Result, Solution};
use rand::Rng;

use crate::heuristic::r#move::Move;
use crate::scope::SolverRng;

pub use exchange::ExchangeNeighborhood;
pub use extended::ExtendedNeighborhood;
pub use insert::InsertNeighborhood;
pub use priority::PriorityInsertNeighborhood;
pub use swap_chain::SwapChainNeighborhood;

/// Which evaluated moves an explorer keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveFilter {
    /// Every feasible move regardless of sign.
    #[default]
    All,
    /// Strictly improving moves only.
    Improving,
    /// Improving or neutral moves.
    NonWorsening,
}

impl MoveFilter {
    pub fn keeps(&self, m: &Move) -> bool {
        match self {
            MoveFilter::All => true,
            MoveFilter::Improving => m.is_improving(),
            MoveFilter::NonWorsening => m.is_non_worsening(),
        }
    }
}

/// Source of candidate moves for a solution.
pub trait Neighborhood: Send + Sync + Debug {
    /// Every kept move of the current solution.
    ///
    /// # Errors
    ///
    /// A fault when incremental bookkeeping detects inconsistent production.
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>>;

    /// One kept move drawn uniformly, or `None` when there is none.
    fn random_move(&self, solution: &Solution, rng: &mut SolverRng) -> Result<Option<Move>> {
        let mut moves = self.moves(solution)?;
        if moves.is_empty() {
            return Ok(None);
        }
        let index = rng.random_range(0..moves.len());
        Ok(Some(moves.swap_remove(index)))
    }

    fn neighborhood_name(&self) -> &'static str;
}

/// Draws candidates without replacement until one evaluates to a kept move.
///
/// Uniform over the kept moves while only the drawn candidates are evaluated.
pub(crate) fn sample_kept<T>(
    mut candidates: Vec<T>,
    rng: &mut SolverRng,
    filter: MoveFilter,
    mut evaluate: impl FnMut(T) -> Option<Move>,
) -> Option<Move> {
    while !candidates.is_empty() {
        let index = rng.random_range(0..candidates.len());
        let candidate = candidates.swap_remove(index);
        if let Some(m) = evaluate(candidate) {
            if filter.keeps(&m) {
                return Some(m);
            }
        }
    }
    None
}
