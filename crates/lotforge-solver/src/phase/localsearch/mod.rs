//! Local search.
//!
//! [`LocalSearch`] repeatedly asks its neighborhood for moves, lets a
//! forager pick one and commits it, until the forager picks nothing. In
//! collapsing mode every step runs on the collapsed solution and splits it
//! back afterwards.

mod forager;
mod phase;

pub use forager::{BestImprovementForager, FirstImprovementForager, LocalSearchForager, PriorityForager};
pub use phase::LocalSearch;
