//! LotForge Core - Instance and solution model
//!
//! This crate provides the state model of the capacitated lot-sizing problem:
//! - [`Instance`]: immutable problem data plus derived constants
//! - [`WorkSlot`]: a block of one part's production
//! - [`Solution`]: machine sequences, production counters and cached score
//! - [`MachineClock`]: the placement rule shared by every bookkeeping path
//! - [`ValidationResult`]: post-hoc validation outcome
//! - Error types

pub mod clock;
pub mod error;
pub mod instance;
pub mod production;
pub mod solution;
pub mod validation;
pub mod work_slot;

#[cfg(test)]
pub(crate) mod test_utils;

pub use clock::MachineClock;
pub use error::{LotForgeError, Result};
pub use instance::{Instance, InstanceData};
pub use production::ProductionTable;
pub use solution::{Coordinate, MachineReport, MoveDelta, SequenceEdit, Solution, SolutionReport};
pub use validation::ValidationResult;
pub use work_slot::{SlotTiming, WorkSlot};
