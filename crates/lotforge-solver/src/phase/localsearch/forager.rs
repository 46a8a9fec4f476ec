//! Foragers for local search move selection
//!
//! Foragers collect the moves of a step and select the one to apply.

use std::fmt::Debug;

use crate::heuristic::r#move::Move;

/// Trait for collecting and selecting moves in local search.
///
/// Foragers are responsible for:
/// - Collecting candidate moves during a step
/// - Deciding when to quit evaluating early
/// - Selecting the move to apply
pub trait LocalSearchForager: Send + Debug {
    /// Called at the start of each step to reset state.
    fn step_started(&mut self);

    /// Offers a move to the forager.
    fn add_move(&mut self, m: Move);

    /// Returns true if the forager wants to stop looking at more moves.
    fn is_quit_early(&self) -> bool;

    /// Picks the move to apply. Returns None if nothing qualified.
    fn pick_move(&mut self) -> Option<Move>;
}

/// Keeps the improving move with the lowest value. Ties keep the first.
#[derive(Debug, Default)]
pub struct BestImprovementForager {
    best: Option<Move>,
}

impl BestImprovementForager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchForager for BestImprovementForager {
    fn step_started(&mut self) {
        self.best = None;
    }

    fn add_move(&mut self, m: Move) {
        if !m.is_improving() {
            return;
        }
        let better = match &self.best {
            None => true,
            Some(best) => m.move_value() < best.move_value(),
        };
        if better {
            self.best = Some(m);
        }
    }

    fn is_quit_early(&self) -> bool {
        false
    }

    fn pick_move(&mut self) -> Option<Move> {
        self.best.take()
    }
}

/// Takes the first improving move offered.
#[derive(Debug, Default)]
pub struct FirstImprovementForager {
    first: Option<Move>,
}

impl FirstImprovementForager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchForager for FirstImprovementForager {
    fn step_started(&mut self) {
        self.first = None;
    }

    fn add_move(&mut self, m: Move) {
        if self.first.is_none() && m.is_improving() {
            self.first = Some(m);
        }
    }

    fn is_quit_early(&self) -> bool {
        self.first.is_some()
    }

    fn pick_move(&mut self) -> Option<Move> {
        self.first.take()
    }
}

/// Keeps the non-worsening move with the best (most negative) priority
/// improvement; the move value breaks ties.
#[derive(Debug, Default)]
pub struct PriorityForager {
    best: Option<Move>,
}

impl PriorityForager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchForager for PriorityForager {
    fn step_started(&mut self) {
        self.best = None;
    }

    fn add_move(&mut self, m: Move) {
        if !m.is_non_worsening() || m.priority_improvement() >= 0.0 {
            return;
        }
        let better = match &self.best {
            None => true,
            Some(best) => {
                (m.priority_improvement(), m.move_value()) < (best.priority_improvement(), best.move_value())
            }
        };
        if better {
            self.best = Some(m);
        }
    }

    fn is_quit_early(&self) -> bool {
        false
    }

    fn pick_move(&mut self) -> Option<Move> {
        self.best.take()
    }
}
