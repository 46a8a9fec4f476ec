//! Insert-by-swap explorer.
//!
//! Each slot is walked left and then right through its own machine one
//! adjacent swap at a time. After the right walk it sits last, so it is lifted
//! off and appended to every other capable machine with room, then walked
//! left there.
//! Each swap only touches the changeover of the moving boundary and re-derives
//! timing and production from that boundary onward, so every relocation
//! reachable by the Insert explorer is evaluated at a fraction of the cost.
//! Swaps between two slots with the same part and duration change nothing and
//! emit no move.

use lotforge_core::clock::{retime, slot_contributions};
use lotforge_core::{Coordinate, Instance, MoveDelta, ProductionTable, Result, Solution, WorkSlot};
use smallvec::SmallVec;

use super::{MoveFilter, Neighborhood};
use crate::heuristic::r#move::{Move, MoveKind};

#[inline]
fn deficit(produced: i64, inventory: i64) -> i64 {
    (-(produced + inventory)).max(0)
}

/// One machine's sequence being walked, with the solution-wide totals it
/// implies.
#[derive(Clone)]
struct Walk<'a> {
    instance: &'a Instance,
    machine: usize,
    slots: Vec<WorkSlot>,
    production: ProductionTable,
    total: ProductionTable,
    changeover: f64,
    shortage: i64,
}

impl<'a> Walk<'a> {
    fn new(solution: &'a Solution, machine: usize) -> Self {
        Self {
            instance: solution.instance().as_ref(),
            machine,
            slots: solution.sequence(machine).to_vec(),
            production: solution.machine_production(machine).clone(),
            total: solution.total_production().clone(),
            changeover: solution.changeover(),
            shortage: solution.shortage() as i64,
        }
    }

    /// Walk of another machine of `solution` on top of the totals reached by `from`.
    fn continue_on(solution: &'a Solution, machine: usize, from: &Walk<'a>) -> Self {
        Self {
            instance: from.instance,
            machine,
            slots: solution.sequence(machine).to_vec(),
            production: solution.machine_production(machine).clone(),
            total: from.total.clone(),
            changeover: from.changeover,
            shortage: from.shortage,
        }
    }

    fn score(&self) -> f64 {
        self.changeover + self.shortage as f64
    }

    fn cost(&self, from: Option<usize>, to: Option<usize>) -> f64 {
        match (from, to) {
            (Some(a), Some(b)) => self.instance.transition_cost(a, b),
            _ => 0.0,
        }
    }

    /// Shifts the aggregate of `part` from `period` onward and tracks shortage.
    fn shift_total(&mut self, period: usize, part: usize, units: i64) {
        for p in period..self.total.periods() {
            let before = self.total.get(p, part);
            let inventory = self.instance.inventory(part, p);
            self.total.add(p, part, units);
            self.shortage += deficit(before + units, inventory) - deficit(before, inventory);
        }
    }

    /// Subtracts the per-period output of `slots[from..]` from `diff`, or adds it.
    fn tally(&self, from: usize, sign: i64, diff: &mut ProductionTable) {
        for slot in &self.slots[from..] {
            let part = slot.part();
            slot_contributions(self.instance, self.machine, slot, |period, units| {
                diff.add(period, part, sign * units)
            });
        }
    }

    /// Swaps positions `r - 1` and `r`.
    ///
    /// Returns `false` without touching anything when the two slots do the
    /// same work: the slot at `r - 1` already stands for the walked one.
    fn swap_adjacent(&mut self, r: usize) -> Result<bool> {
        let (a, b) = (self.slots[r - 1], self.slots[r]);
        if a.same_work(&b) {
            return Ok(false);
        }

        let left = r.checked_sub(2).map(|i| self.slots[i].part());
        let right = self.slots.get(r + 1).map(WorkSlot::part);
        let (pa, pb) = (Some(a.part()), Some(b.part()));
        self.changeover += self.cost(left, pb) - self.cost(left, pa) + self.cost(pb, pa)
            - self.cost(pa, pb)
            + self.cost(pa, right)
            - self.cost(pb, right);

        let mut diff = ProductionTable::new(self.total.periods(), self.total.parts());
        self.tally(r - 1, -1, &mut diff);
        self.slots.swap(r - 1, r);
        retime(self.instance, self.machine, &mut self.slots, r - 1)?;
        self.tally(r - 1, 1, &mut diff);
        diff.accumulate();

        for period in 0..diff.periods() {
            for part in 0..diff.parts() {
                let units = diff.get(period, part);
                if units == 0 {
                    continue;
                }
                self.production.add(period, part, units);
                let before = self.total.get(period, part);
                let inventory = self.instance.inventory(part, period);
                self.total.add(period, part, units);
                self.shortage += deficit(before + units, inventory) - deficit(before, inventory);
            }
        }
        Ok(true)
    }

    /// Lifts the last slot off the machine.
    fn pop_last(&mut self) -> Result<Option<WorkSlot>> {
        let Some(slot) = self.slots.pop() else {
            return Ok(None);
        };
        let part = slot.part();
        if let Some(previous) = self.slots.last() {
            self.changeover -= self.instance.transition_cost(previous.part(), part);
        }
        let mut output: SmallVec<[(usize, i64); 4]> = SmallVec::new();
        slot_contributions(self.instance, self.machine, &slot, |period, units| {
            output.push((period, units))
        });
        for (period, units) in output {
            self.production.remove_units(period, part, units)?;
            self.shift_total(period, part, -units);
        }
        Ok(Some(slot.unplaced()))
    }

    /// Appends a slot at the end of the machine.
    fn push(&mut self, slot: WorkSlot) -> Result<()> {
        let part = slot.part();
        let previous = self.slots.last().map(WorkSlot::part);
        self.changeover += self.cost(previous, Some(part));
        self.slots.push(slot);
        let last = self.slots.len() - 1;
        retime(self.instance, self.machine, &mut self.slots, last)?;

        let mut output: SmallVec<[(usize, i64); 4]> = SmallVec::new();
        slot_contributions(self.instance, self.machine, &self.slots[last], |period, units| {
            output.push((period, units))
        });
        for (period, units) in output {
            self.production.add_from(period, part, units);
            self.shift_total(period, part, units);
        }
        Ok(())
    }
}

/// Collects the moves a walk reaches.
struct Emitter<'s> {
    solution: &'s Solution,
    filter: MoveFilter,
    moves: Vec<Move>,
}

impl Emitter<'_> {
    fn emit(&mut self, coordinate: Coordinate, walk: &Walk<'_>, source: Option<&Walk<'_>>) {
        let move_value = walk.score() - self.solution.score();
        let mut production = SmallVec::new();
        if let Some(source) = source {
            production.push((source.machine, source.production.clone()));
        }
        production.push((walk.machine, walk.production.clone()));
        let m = Move::new(
            MoveKind::Swap,
            coordinate,
            move_value,
            MoveDelta {
                changeover: walk.changeover,
                shortage: walk.shortage as f64,
                production,
            },
        );
        if self.filter.keeps(&m) {
            self.moves.push(m);
        }
    }
}

/// Reaches every relocation through chains of adjacent swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapChainNeighborhood {
    filter: MoveFilter,
}

impl SwapChainNeighborhood {
    pub fn new(filter: MoveFilter) -> Self {
        Self { filter }
    }

    pub fn improving() -> Self {
        Self::new(MoveFilter::Improving)
    }

    fn walk_slot(&self, emitter: &mut Emitter<'_>, machine: usize, position: usize) -> Result<()> {
        let solution = emitter.solution;
        let origin = Walk::new(solution, machine);
        let len = origin.slots.len();

        let mut left = origin.clone();
        for r in (1..=position).rev() {
            if left.swap_adjacent(r)? {
                emitter.emit(Coordinate::new(machine, position, machine, r - 1), &left, None);
            }
        }

        let mut right = origin;
        for r in position + 1..len {
            if right.swap_adjacent(r)? {
                emitter.emit(Coordinate::new(machine, position, machine, r), &right, None);
            }
        }

        if solution.num_machines() < 2 {
            return Ok(());
        }
        let Some(slot) = right.pop_last()? else {
            return Ok(());
        };
        for target in solution.instance().capable_machines(slot.part()) {
            if target == machine || !solution.has_room(target) {
                continue;
            }
            let mut walk = Walk::continue_on(solution, target, &right);
            walk.push(slot)?;
            let end = walk.slots.len() - 1;
            emitter.emit(Coordinate::new(machine, position, target, end), &walk, Some(&right));
            for r in (1..=end).rev() {
                if walk.swap_adjacent(r)? {
                    emitter.emit(Coordinate::new(machine, position, target, r - 1), &walk, Some(&right));
                }
            }
        }
        Ok(())
    }
}

impl Neighborhood for SwapChainNeighborhood {
    fn moves(&self, solution: &Solution) -> Result<Vec<Move>> {
        let mut emitter = Emitter {
            solution,
            filter: self.filter,
            moves: Vec::new(),
        };
        for machine in 0..solution.num_machines() {
            for position in 0..solution.sequence(machine).len() {
                self.walk_slot(&mut emitter, machine, position)?;
            }
        }
        Ok(emitter.moves)
    }

    fn neighborhood_name(&self) -> &'static str {
        "SwapChain"
    }
}
