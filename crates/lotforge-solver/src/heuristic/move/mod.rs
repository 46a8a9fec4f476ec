//! Move types for local search and shaking.
//!
//! A [`Move`] is a single tagged value: its [`MoveKind`], the coordinate it
//! relocates or swaps, the score delta it was evaluated with and the owned
//! production buffers of every machine it changes. Evaluation never writes to
//! the solution; [`Move::apply`] hands the buffers over on commit.

mod evaluate;

use lotforge_core::{Coordinate, MoveDelta, Result, SequenceEdit, Solution};

pub use evaluate::{evaluate_exchange, evaluate_insert};

/// Moves whose value is below `-IMPROVEMENT_EPSILON` count as improving.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Relocate one slot.
    Insert,
    /// Swap two slots in place.
    Exchange,
    /// A relocation reached by a chain of adjacent swaps.
    Swap,
}

#[derive(Debug, Clone)]
pub struct Move {
    kind: MoveKind,
    coordinate: Coordinate,
    move_value: f64,
    priority_improvement: f64,
    delta: MoveDelta,
}

impl Move {
    pub fn new(kind: MoveKind, coordinate: Coordinate, move_value: f64, delta: MoveDelta) -> Self {
        Self {
            kind,
            coordinate,
            move_value,
            priority_improvement: 0.0,
            delta,
        }
    }

    pub fn with_priority_improvement(mut self, priority_improvement: f64) -> Self {
        self.priority_improvement = priority_improvement;
        self
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Score change the move causes; negative is better.
    pub fn move_value(&self) -> f64 {
        self.move_value
    }

    /// Preference change of the moved slot, `(new - old) * duration`.
    /// Zero unless a priority-aware explorer set it.
    pub fn priority_improvement(&self) -> f64 {
        self.priority_improvement
    }

    pub fn delta(&self) -> &MoveDelta {
        &self.delta
    }

    pub fn is_improving(&self) -> bool {
        self.move_value < -IMPROVEMENT_EPSILON
    }

    pub fn is_non_worsening(&self) -> bool {
        self.move_value <= IMPROVEMENT_EPSILON
    }

    /// The structural edit. Swap chains end where a plain relocation would.
    pub fn edit(&self) -> SequenceEdit {
        match self.kind {
            MoveKind::Insert | MoveKind::Swap => SequenceEdit::Insert(self.coordinate),
            MoveKind::Exchange => SequenceEdit::Exchange(self.coordinate),
        }
    }

    /// Commits the move to the solution it was evaluated against.
    ///
    /// # Errors
    ///
    /// A fault from [`Solution::commit`] when the solution changed since the
    /// move was evaluated.
    pub fn apply(self, solution: &mut Solution) -> Result<()> {
        let edit = self.edit();
        solution.commit(edit, self.delta, self.move_value)
    }
}

#[cfg(test)]
mod tests;
