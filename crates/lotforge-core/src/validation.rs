//! Post-hoc solution validation.

use std::fmt;

use crate::solution::Solution;

const SCORE_TOLERANCE: f64 = 1e-6;

/// Outcome of [`Solution::validate`]. A failed validation is a result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Failed { reason: String },
}

impl ValidationResult {
    pub fn failed(reason: impl Into<String>) -> Self {
        ValidationResult::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Failed { reason } => Some(reason),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::Valid => write!(f, "valid"),
            ValidationResult::Failed { reason } => write!(f, "invalid: {reason}"),
        }
    }
}

impl Solution {
    /// Checks machine capability and score consistency.
    pub fn validate(&self) -> ValidationResult {
        if self.score() < self.changeover() - SCORE_TOLERANCE {
            return ValidationResult::failed(format!(
                "score lower than changeover time: {} < {}",
                self.score(),
                self.changeover()
            ));
        }

        let instance = self.instance();
        for (machine, slots) in self.sequences().iter().enumerate() {
            if let Some(slot) = slots.iter().find(|s| !instance.can_produce(s.part(), machine)) {
                return ValidationResult::failed(format!(
                    "part {} is assigned to machine {machine} which has zero production rate for it",
                    slot.part()
                ));
            }
        }

        let recalculated = self.recalculate_score();
        if (self.score() - recalculated).abs() > SCORE_TOLERANCE {
            return ValidationResult::failed(format!(
                "cached score {} differs from recalculated score {recalculated}",
                self.score()
            ));
        }
        ValidationResult::Valid
    }
}
