use crate::clock::machine_production;
use crate::error::{LotForgeError, Result};
use crate::work_slot::WorkSlot;

use super::{shortage_of, Solution};

impl Solution {
    /// Merges every run of adjacent same-part slots into one slot.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Fault`] when re-derived timing overruns a period.
    pub fn collapse(&mut self) -> Result<()> {
        for sequence in &mut self.machines {
            let mut merged: Vec<WorkSlot> = Vec::with_capacity(sequence.len());
            for slot in sequence.drain(..) {
                if let Some(last) = merged.last_mut() {
                    if last.collapse(&slot) {
                        continue;
                    }
                }
                merged.push(slot);
            }
            *sequence = merged;
        }
        self.rebuild()
    }

    /// Splits every slot into minimum-workload pieces plus one remainder.
    ///
    /// # Errors
    ///
    /// - [`LotForgeError::Capacity`] when a machine would end up holding more
    ///   pieces than its work slot budget. The solution is left untouched.
    /// - [`LotForgeError::Fault`] when re-derived timing overruns a period.
    pub fn uncollapse(&mut self) -> Result<()> {
        let minimum_workload = self.instance.minimum_workload();
        let limit = self.instance.maximum_work_slots();
        let split: Vec<Vec<WorkSlot>> = self
            .machines
            .iter()
            .map(|sequence| {
                sequence
                    .iter()
                    .flat_map(|slot| slot.split(minimum_workload))
                    .collect()
            })
            .collect();
        if let Some(machine) = split.iter().position(|pieces| pieces.len() > limit) {
            return Err(LotForgeError::Capacity { machine, limit });
        }
        self.machines = split;
        self.rebuild()
    }

    /// Re-derives timing from position 0 and refreshes every cached value
    /// from the sequences.
    pub fn rebuild(&mut self) -> Result<()> {
        for machine in 0..self.machines.len() {
            self.retime_machine(machine, 0)?;
            self.production[machine] = machine_production(&self.instance, machine, &self.machines[machine]);
        }
        self.changeover = self.full_changeover();
        self.total_production.clear();
        for table in &self.production {
            self.total_production.absorb(table);
        }
        self.shortage = shortage_of(&self.instance, &self.total_production);
        self.score = self.changeover + self.shortage;
        Ok(())
    }
}
