//! Mutable schedule state with cached score components.
//!
//! A [`Solution`] owns, per machine, an ordered sequence of [`WorkSlot`]s with
//! derived timing, the cumulative production of that machine, the aggregate
//! production over all machines and the cached `changeover`, `shortage` and
//! `score`. Cloning is a deep copy; the [`Instance`] is shared behind an `Arc`.
//!
//! # Bookkeeping paths
//!
//! - [`add_work_slot`](Solution::add_work_slot) appends without propagating
//!   production; call
//!   [`accumulate_production_and_score`](Solution::accumulate_production_and_score)
//!   once after a batch of appends.
//! - [`place_work_slot`](Solution::place_work_slot) appends and keeps every
//!   cached value current.
//! - [`commit`](Solution::commit) writes back a move evaluated elsewhere.
//! - [`recalculate_score`](Solution::recalculate_score) recomputes everything
//!   from the raw sequences without touching the cache.

mod collapse;
mod commit;
mod placement;
mod report;
mod score;


use std::sync::Arc;

use crate::instance::Instance;
use crate::production::ProductionTable;
use crate::work_slot::WorkSlot;

pub use commit::{Coordinate, MoveDelta, SequenceEdit};
pub use report::{MachineReport, SolutionReport};
pub(crate) use score::shortage_of;

#[derive(Clone)]
pub struct Solution {
    instance: Arc<Instance>,
    machines: Vec<Vec<WorkSlot>>,
    production: Vec<ProductionTable>,
    total_production: ProductionTable,
    unassigned: Vec<WorkSlot>,
    changeover: f64,
    shortage: f64,
    score: f64,
}

impl Solution {
    /// Creates an empty schedule whose unassigned pool holds the instance's
    /// no-shortage slots.
    pub fn new(instance: Arc<Instance>) -> Self {
        let periods = instance.num_periods();
        let parts = instance.num_parts();
        let budget = instance.maximum_work_slots();
        let machines = (0..instance.num_machines())
            .map(|_| Vec::with_capacity(budget))
            .collect();
        let production = vec![ProductionTable::new(periods, parts); instance.num_machines()];
        let total_production = ProductionTable::new(periods, parts);
        let shortage = shortage_of(&instance, &total_production);
        let unassigned = instance.no_shortage_slots().to_vec();

        Self {
            instance,
            machines,
            production,
            total_production,
            unassigned,
            changeover: 0.0,
            shortage,
            score: shortage,
        }
    }

    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Cached `changeover + shortage`, maintained incrementally.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn changeover(&self) -> f64 {
        self.changeover
    }

    pub fn shortage(&self) -> f64 {
        self.shortage
    }

    pub fn num_machines(&self) -> usize {
        self.machines.len()
    }

    /// The ordered slot sequence of `machine`.
    pub fn sequence(&self, machine: usize) -> &[WorkSlot] {
        &self.machines[machine]
    }

    pub fn sequences(&self) -> &[Vec<WorkSlot>] {
        &self.machines
    }

    /// Cumulative production of one machine.
    pub fn machine_production(&self, machine: usize) -> &ProductionTable {
        &self.production[machine]
    }

    /// Cumulative production summed over all machines.
    pub fn total_production(&self) -> &ProductionTable {
        &self.total_production
    }

    pub fn unassigned(&self) -> &[WorkSlot] {
        &self.unassigned
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned.is_empty()
    }

    pub fn total_work_slots(&self) -> usize {
        self.machines.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.iter().all(Vec::is_empty)
    }

    /// True while `machine` is below its work slot budget.
    pub fn has_room(&self, machine: usize) -> bool {
        self.machines[machine].len() < self.instance.maximum_work_slots()
    }

    /// Total duration of slots placed on a machine with priority above one.
    pub fn priority_hours(&self) -> f64 {
        self.machines
            .iter()
            .enumerate()
            .flat_map(|(machine, slots)| slots.iter().map(move |slot| (machine, slot)))
            .filter(|(machine, slot)| self.instance.priority(slot.part(), *machine) > 1)
            .map(|(_, slot)| slot.duration())
            .sum()
    }
}

impl std::fmt::Debug for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solution")
            .field("instance", &self.instance.name())
            .field("work_slots", &self.total_work_slots())
            .field("unassigned", &self.unassigned.len())
            .field("changeover", &self.changeover)
            .field("shortage", &self.shortage)
            .field("score", &self.score)
            .finish()
    }
}
