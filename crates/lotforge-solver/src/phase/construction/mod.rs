//! Construction heuristics.
//!
//! Each constructive fills an empty solution until every part's demand is
//! covered:
//! - [`RandomConstructive`]: random batch sizes on random capable machines
//! - [`SmallPiecesConstructive`]: the instance's no-shortage slots, shuffled
//! - [`GraspConstructive`]: greedy-random or random-greedy choice from a
//!   fully evaluated candidate list

mod grasp;
mod random;
mod small_pieces;

use std::fmt::Debug;

use lotforge_core::{LotForgeError, Result, Solution};
use rand::Rng;

use crate::scope::{SolverRng, SolverScope};

pub use grasp::{GraspCandidate, GraspConstructive, GraspStrategy};
pub use random::RandomConstructive;
pub use small_pieces::SmallPiecesConstructive;

/// Builds an initial solution in place.
pub trait Constructive: Send + Debug {
    /// Fills `solution`, which is expected to be freshly created.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Capacity`] when no capable machine has room left for
    /// a slot that still has to be placed.
    fn construct(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()>;

    fn constructive_type_name(&self) -> &'static str;
}

impl<C: Constructive + ?Sized> Constructive for Box<C> {
    fn construct(&mut self, solution: &mut Solution, solver_scope: &mut SolverScope) -> Result<()> {
        (**self).construct(solution, solver_scope)
    }

    fn constructive_type_name(&self) -> &'static str {
        (**self).constructive_type_name()
    }
}

/// Capacity fault for a `part` none of whose capable machines has room.
fn no_room_for(solution: &Solution, part: usize) -> LotForgeError {
    let instance = solution.instance();
    LotForgeError::Capacity {
        machine: instance.capable_machines(part).next().unwrap_or(0),
        limit: instance.maximum_work_slots(),
    }
}

/// A uniformly drawn capable machine of `part` that is still below its budget.
fn random_machine_with_room(solution: &Solution, part: usize, rng: &mut SolverRng) -> Result<usize> {
    let machines: Vec<usize> = solution
        .instance()
        .capable_machines(part)
        .filter(|&m| solution.has_room(m))
        .collect();
    if machines.is_empty() {
        return Err(no_room_for(solution, part));
    }
    Ok(machines[rng.random_range(0..machines.len())])
}

#[cfg(test)]
mod tests;
