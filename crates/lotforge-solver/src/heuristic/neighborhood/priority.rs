use lotforge_core::{Result, Solution};

use super::{InsertNeighborhood, MoveFilter, Neighborhood};
use crate::heuristic::r#move::Move;

/// Non-worsening relocations that move a slot off a non-preferred machine
/// onto a strictly more preferred one.
///
/// Each kept move carries `(priority(new) - priority(old)) * duration` as its
/// priority improvement; lower priority values are preferred, so improving
/// moves carry a negative figure.
#[derive(Debug, Clone, Copy)]
pub struct PriorityInsertNeighborhood {
    inner: InsertNeighborhood,
}

impl PriorityInsertNeighborhood {
    pub fn new() -> Self {
        Self {
            inner: InsertNeighborhood::new(MoveFilter::NonWorsening),
        }
    }
}

impl Default for PriorityInsertNeighborhood {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighborhood for PriorityInsertNeighborhood {
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>> {
        let instance = solution.instance();
        Ok(self
            .inner
            .moves(solution)?
            .into_iter()
            .filter_map(|m| {
                let c = m.coordinate();
                if c.same_machine() {
                    return None;
                }
                let slot = solution.sequence(c.machine_ini)[c.position_ini];
                let current = instance.priority(slot.part(), c.machine_ini);
                let proposed = instance.priority(slot.part(), c.machine_end);
                if current <= 1 || proposed == 0 || proposed >= current {
                    return None;
                }
                let improvement = (proposed - current) as f64 * slot.duration();
                Some(m.with_priority_improvement(improvement))
            })
            .collect())
    }

    fn neighborhood_name(&self) -> &'static str {
        "PriorityInsert"
    }
}
