use smallvec::SmallVec;

use crate::clock::retime;
use crate::error::{LotForgeError, Result};
use crate::production::ProductionTable;

use super::Solution;

/// Source and destination of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub machine_ini: usize,
    pub position_ini: usize,
    pub machine_end: usize,
    pub position_end: usize,
}

impl Coordinate {
    pub fn new(machine_ini: usize, position_ini: usize, machine_end: usize, position_end: usize) -> Self {
        Self {
            machine_ini,
            position_ini,
            machine_end,
            position_end,
        }
    }

    pub fn same_machine(&self) -> bool {
        self.machine_ini == self.machine_end
    }

    pub fn is_identity(&self) -> bool {
        self.same_machine() && self.position_ini == self.position_end
    }
}

/// Structural change a move makes to the machine sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEdit {
    /// Remove the slot at the source and insert it at the destination index
    /// of the shortened sequence.
    Insert(Coordinate),
    /// Swap the slots at source and destination.
    Exchange(Coordinate),
}

impl SequenceEdit {
    pub fn coordinate(&self) -> Coordinate {
        match *self {
            SequenceEdit::Insert(c) | SequenceEdit::Exchange(c) => c,
        }
    }
}

/// Precomputed result of a move, owned by the move until it is committed.
#[derive(Debug, Clone, Default)]
pub struct MoveDelta {
    /// Total changeover after the move.
    pub changeover: f64,
    /// Total shortage after the move.
    pub shortage: f64,
    /// New cumulative production of every machine whose sequence changes.
    pub production: SmallVec<[(usize, ProductionTable); 2]>,
}

impl Solution {
    /// Applies a move evaluated against this solution.
    ///
    /// The sequences are edited, timing is re-derived from the first changed
    /// position, the production buffers in `delta` are moved in and the
    /// aggregate is adjusted by their difference. The cached score is advanced
    /// by `move_value` rather than recomputed.
    ///
    /// # Errors
    ///
    /// - [`LotForgeError::Capacity`] when an insert would land on a machine
    ///   already at its work slot budget. Nothing is changed.
    /// - [`LotForgeError::Fault`] when the coordinate does not fit the current
    ///   sequences or re-derived timing overruns a period.
    pub fn commit(&mut self, edit: SequenceEdit, delta: MoveDelta, move_value: f64) -> Result<()> {
        let c = edit.coordinate();
        self.check_coordinate(edit)?;
        if matches!(edit, SequenceEdit::Insert(_)) && !c.same_machine() && !self.has_room(c.machine_end) {
            return Err(LotForgeError::Capacity {
                machine: c.machine_end,
                limit: self.instance.maximum_work_slots(),
            });
        }
        for (machine, _) in &delta.production {
            if *machine >= self.machines.len() {
                return Err(LotForgeError::Fault(format!(
                    "production buffer for unknown machine {machine}"
                )));
            }
        }

        match edit {
            SequenceEdit::Insert(_) => {
                let slot = self.machines[c.machine_ini].remove(c.position_ini);
                self.machines[c.machine_end].insert(c.position_end, slot);
            }
            SequenceEdit::Exchange(_) if c.same_machine() => {
                self.machines[c.machine_ini].swap(c.position_ini, c.position_end);
            }
            SequenceEdit::Exchange(_) => {
                let (low, high) = if c.machine_ini < c.machine_end {
                    (c.machine_ini, c.machine_end)
                } else {
                    (c.machine_end, c.machine_ini)
                };
                let (left, right) = self.machines.split_at_mut(high);
                let (low_pos, high_pos) = if low == c.machine_ini {
                    (c.position_ini, c.position_end)
                } else {
                    (c.position_end, c.position_ini)
                };
                std::mem::swap(&mut left[low][low_pos], &mut right[0][high_pos]);
            }
        }

        if c.same_machine() {
            self.retime_machine(c.machine_ini, c.position_ini.min(c.position_end))?;
        } else {
            self.retime_machine(c.machine_ini, c.position_ini)?;
            self.retime_machine(c.machine_end, c.position_end)?;
        }

        for (machine, table) in delta.production {
            self.total_production.release(&self.production[machine]);
            self.total_production.absorb(&table);
            self.production[machine] = table;
        }

        self.changeover = delta.changeover;
        self.shortage = delta.shortage;
        self.score += move_value;
        Ok(())
    }

    fn check_coordinate(&self, edit: SequenceEdit) -> Result<()> {
        let c = edit.coordinate();
        let machines = self.machines.len();
        if c.machine_ini >= machines || c.machine_end >= machines {
            return Err(LotForgeError::Fault(format!("{edit:?} names a missing machine")));
        }
        let len_ini = self.machines[c.machine_ini].len();
        let len_end = self.machines[c.machine_end].len();
        let fits = match edit {
            SequenceEdit::Insert(_) => {
                let len_after_removal = if c.same_machine() { len_end.saturating_sub(1) } else { len_end };
                c.position_ini < len_ini && c.position_end <= len_after_removal
            }
            SequenceEdit::Exchange(_) => c.position_ini < len_ini && c.position_end < len_end,
        };
        if fits {
            Ok(())
        } else {
            Err(LotForgeError::Fault(format!("{edit:?} is out of range")))
        }
    }

    pub(crate) fn retime_machine(&mut self, machine: usize, from: usize) -> Result<()> {
        retime(&self.instance, machine, &mut self.machines[machine], from)
    }
}
