use crate::clock::MachineClock;
use crate::error::{LotForgeError, Result};
use crate::work_slot::WorkSlot;

use super::{shortage_of, Solution};

impl Solution {
    fn check_budget(&self, machine: usize) -> Result<()> {
        if machine >= self.machines.len() {
            return Err(LotForgeError::Fault(format!("machine {machine} does not exist")));
        }
        if !self.has_room(machine) {
            return Err(LotForgeError::Capacity {
                machine,
                limit: self.instance.maximum_work_slots(),
            });
        }
        Ok(())
    }

    /// Appends `slot` to `machine` during bulk construction.
    ///
    /// Timing is derived from the previous slot's end. The produced units are
    /// written to the periods they fall in only, and the changeover total is
    /// increased. Shortage and score stay stale until
    /// [`accumulate_production_and_score`](Self::accumulate_production_and_score)
    /// runs.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Capacity`] when the machine already holds its
    /// work slot budget.
    pub fn add_work_slot(&mut self, machine: usize, mut slot: WorkSlot) -> Result<()> {
        self.check_budget(machine)?;

        let instance = &*self.instance;
        let sequence = &mut self.machines[machine];
        let previous = sequence.last();
        let previous_part = previous.map(WorkSlot::part);
        let mut clock = MachineClock::after(instance, machine, previous);

        let part = slot.part();
        let table = &mut self.production[machine];
        let cost = clock.place(previous_part, &mut slot, |period, units| {
            table.add(period, part, units)
        })?;

        sequence.push(slot);
        self.changeover += cost;
        Ok(())
    }

    /// Refreshes aggregate production, shortage and score.
    ///
    /// With `accumulate` the per-machine tables are first turned from
    /// per-period into cumulative counts, which is what a batch of
    /// [`add_work_slot`](Self::add_work_slot) calls needs.
    pub fn accumulate_production_and_score(&mut self, accumulate: bool) {
        self.total_production.clear();
        for table in &mut self.production {
            if accumulate {
                table.accumulate();
            }
            self.total_production.absorb(table);
        }
        self.shortage = shortage_of(&self.instance, &self.total_production);
        self.score = self.changeover + self.shortage;
    }

    /// Appends `slot` to `machine` and keeps every cached value current.
    ///
    /// # Errors
    ///
    /// [`LotForgeError::Capacity`] when the machine already holds its
    /// work slot budget.
    pub fn place_work_slot(&mut self, machine: usize, mut slot: WorkSlot) -> Result<()> {
        self.check_budget(machine)?;

        let instance = &*self.instance;
        let sequence = &mut self.machines[machine];
        let previous = sequence.last();
        let previous_part = previous.map(WorkSlot::part);
        let mut clock = MachineClock::after(instance, machine, previous);

        let part = slot.part();
        let table = &mut self.production[machine];
        let total = &mut self.total_production;
        let cost = clock.place(previous_part, &mut slot, |period, units| {
            table.add_from(period, part, units);
            total.add_from(period, part, units);
        })?;

        sequence.push(slot);
        self.changeover += cost;
        self.shortage = shortage_of(instance, &self.total_production);
        self.score = self.changeover + self.shortage;
        Ok(())
    }

    /// Removes and returns the unassigned slot at `index`.
    pub fn take_unassigned(&mut self, index: usize) -> Option<WorkSlot> {
        (index < self.unassigned.len()).then(|| self.unassigned.remove(index))
    }

    /// Replaces the unassigned pool.
    pub fn set_unassigned(&mut self, slots: Vec<WorkSlot>) {
        self.unassigned = slots;
    }
}
