//! Work slots: the atomic unit of schedulable production.

use serde::{Deserialize, Serialize};

/// Placement of a work slot on its machine clock.
///
/// Times are relative to the start of the period they refer to, not global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotTiming {
    pub ini_time: f64,
    pub ini_period: usize,
    pub end_time: f64,
    pub end_period: usize,
}

/// A contiguous block of one part's production.
///
/// A slot carries its identity (`part`, `duration`) and, once placed in a
/// machine sequence, the derived timing. Unplaced slots (for example those in
/// the unassigned pool) have no timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkSlot {
    part: usize,
    duration: f64,
    timing: Option<SlotTiming>,
}

impl WorkSlot {
    /// Creates an unplaced work slot.
    pub fn new(part: usize, duration: f64) -> Self {
        Self {
            part,
            duration,
            timing: None,
        }
    }

    pub fn part(&self) -> usize {
        self.part
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn timing(&self) -> Option<SlotTiming> {
        self.timing
    }

    pub fn is_placed(&self) -> bool {
        self.timing.is_some()
    }

    pub(crate) fn set_timing(&mut self, timing: SlotTiming) {
        self.timing = Some(timing);
    }

    /// Returns a copy of this slot with its placement cleared.
    pub fn unplaced(&self) -> Self {
        Self::new(self.part, self.duration)
    }

    /// Returns true if both slots describe the same work: same part and same duration.
    ///
    /// Exchanging two such slots leaves the solution unchanged.
    pub fn same_work(&self, other: &WorkSlot) -> bool {
        self.part == other.part && self.duration == other.duration
    }

    /// Merges `next` into this slot when both produce the same part.
    ///
    /// Durations are summed and the end marker is taken from `next`.
    /// Returns false (leaving `self` untouched) for different parts.
    pub fn collapse(&mut self, next: &WorkSlot) -> bool {
        if self.part != next.part {
            return false;
        }
        self.duration += next.duration;
        if let (Some(timing), Some(next_timing)) = (self.timing.as_mut(), next.timing) {
            timing.end_time = next_timing.end_time;
            timing.end_period = next_timing.end_period;
        }
        true
    }

    /// Splits this slot into pieces of exactly `minimum_workload` plus one
    /// remainder piece. A slot no longer than the minimum workload is
    /// returned whole.
    ///
    /// # Example
    ///
    /// ```
    /// use lotforge_core::WorkSlot;
    ///
    /// let pieces = WorkSlot::new(0, 15.0).split(7.0);
    /// let durations: Vec<f64> = pieces.iter().map(|s| s.duration()).collect();
    /// assert_eq!(durations, vec![7.0, 7.0, 1.0]);
    /// ```
    pub fn split(&self, minimum_workload: f64) -> Vec<WorkSlot> {
        let mut pieces = Vec::new();
        let mut remaining = self.duration;
        if minimum_workload > 0.0 {
            while remaining > minimum_workload {
                pieces.push(WorkSlot::new(self.part, minimum_workload));
                remaining -= minimum_workload;
            }
        }
        if remaining > 0.0 || pieces.is_empty() {
            pieces.push(WorkSlot::new(self.part, remaining));
        }
        pieces
    }
}
