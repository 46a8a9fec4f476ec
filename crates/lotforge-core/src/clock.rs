//! Machine clock: the single placement rule for timing and production.
//!
//! Every path that needs slot timing or per-period output (appending a slot,
//! re-deriving timing after a move, recomputing a machine from scratch,
//! walking a slot through a sequence) goes through [`MachineClock`], so the
//! incremental and from-scratch bookkeeping always agree.
//!
//! Times are period-relative. A slot that overruns the current period's
//! capacity rolls over into the following periods; the units it produces in
//! each period are rounded up to whole units independently. Once the clock
//! leaves the horizon it parks in period `num_periods` and only its time
//! keeps growing.

use crate::error::{LotForgeError, Result};
use crate::instance::Instance;
use crate::production::ProductionTable;
use crate::work_slot::{SlotTiming, WorkSlot};

/// Position on one machine's timeline.
#[derive(Clone, Copy)]
pub struct MachineClock<'a> {
    instance: &'a Instance,
    machine: usize,
    period: usize,
    time: f64,
}

impl<'a> MachineClock<'a> {
    /// Clock at the start of the horizon.
    pub fn new(instance: &'a Instance, machine: usize) -> Self {
        Self::resume(instance, machine, 0, 0.0)
    }

    pub fn resume(instance: &'a Instance, machine: usize, period: usize, time: f64) -> Self {
        Self {
            instance,
            machine,
            period,
            time,
        }
    }

    /// Clock right after `previous` ends, or at the origin when there is none.
    pub fn after(instance: &'a Instance, machine: usize, previous: Option<&WorkSlot>) -> Self {
        match previous.and_then(|slot| slot.timing()) {
            Some(t) => Self::resume(instance, machine, t.end_period, t.end_time),
            None => Self::new(instance, machine),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    fn capacity(&self) -> f64 {
        self.instance.machine_capacity(self.machine, self.period)
    }

    pub fn is_past_horizon(&self) -> bool {
        self.period >= self.instance.num_periods()
    }

    /// Moves into later periods while the time overruns the current one.
    fn roll(&mut self, mut emit: impl FnMut(usize, f64)) {
        while !self.is_past_horizon() {
            let capacity = self.capacity();
            if self.time < capacity {
                break;
            }
            emit(self.period, capacity);
            self.time -= capacity;
            self.period += 1;
        }
    }

    /// Spends `cost` time units without producing anything.
    pub fn changeover(&mut self, cost: f64) {
        self.time += cost;
        self.roll(|_, _| {});
    }

    /// Produces `part` for `duration` time units.
    ///
    /// `emit` receives `(period, units)` for every period inside the horizon
    /// that receives a nonzero contribution.
    pub fn advance(&mut self, part: usize, duration: f64, mut emit: impl FnMut(usize, i64)) {
        let rate = self.instance.production_rate(part, self.machine) as f64;
        let num_periods = self.instance.num_periods();
        let mut produce = |period: usize, units: i64| {
            if period < num_periods && units != 0 {
                emit(period, units);
            }
        };

        if self.is_past_horizon() {
            self.time += duration;
            return;
        }
        let capacity = self.capacity();
        if self.time + duration >= capacity {
            produce(self.period, ((capacity - self.time) * rate).ceil() as i64);
            self.time = self.time + duration - capacity;
            self.period += 1;
            self.roll(|period, capacity| produce(period, (capacity * rate).ceil() as i64));
            produce(self.period, (self.time * rate).ceil() as i64);
        } else {
            self.time += duration;
            produce(self.period, (duration * rate).ceil() as i64);
        }
    }

    /// Places `slot` after a slot of `previous_part`, stores its timing and
    /// returns the changeover paid.
    pub fn place(
        &mut self,
        previous_part: Option<usize>,
        slot: &mut WorkSlot,
        emit: impl FnMut(usize, i64),
    ) -> Result<f64> {
        let cost = previous_part.map_or(0.0, |p| self.instance.transition_cost(p, slot.part()));
        self.changeover(cost);
        let (ini_period, ini_time) = (self.period, self.time);
        self.advance(slot.part(), slot.duration(), emit);

        let end_capacity = self.capacity();
        if !self.is_past_horizon() && self.time > end_capacity {
            return Err(LotForgeError::Fault(format!(
                "slot of part {} on machine {} ends at {} past capacity {} of period {}",
                slot.part(),
                self.machine,
                self.time,
                end_capacity,
                self.period
            )));
        }
        slot.set_timing(SlotTiming {
            ini_time,
            ini_period,
            end_time: self.time,
            end_period: self.period,
        });
        Ok(cost)
    }
}

impl std::fmt::Debug for MachineClock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineClock")
            .field("machine", &self.machine)
            .field("period", &self.period)
            .field("time", &self.time)
            .finish()
    }
}

/// Per-period units a placed slot contributes, replayed from its stored start.
pub fn slot_contributions(
    instance: &Instance,
    machine: usize,
    slot: &WorkSlot,
    emit: impl FnMut(usize, i64),
) {
    let timing = slot.timing().unwrap_or_default();
    let mut clock = MachineClock::resume(instance, machine, timing.ini_period, timing.ini_time);
    clock.advance(slot.part(), slot.duration(), emit);
}

/// Re-derives the timing of `slots[from..]`, starting where `slots[from - 1]` ends.
///
/// # Errors
///
/// [`LotForgeError::Fault`] when a slot would end past its end period's capacity.
pub fn retime(instance: &Instance, machine: usize, slots: &mut [WorkSlot], from: usize) -> Result<()> {
    if from >= slots.len() {
        return Ok(());
    }
    let (head, tail) = slots.split_at_mut(from);
    let previous = head.last();
    let mut clock = MachineClock::after(instance, machine, previous);
    let mut previous_part = previous.map(|s| s.part());
    for slot in tail.iter_mut() {
        clock.place(previous_part, slot, |_, _| {})?;
        previous_part = Some(slot.part());
    }
    Ok(())
}

/// Cumulative production of a whole machine sequence, computed from scratch.
///
/// Only `part` and `duration` of the slots are read; stored timing is ignored.
pub fn machine_production(instance: &Instance, machine: usize, slots: &[WorkSlot]) -> ProductionTable {
    let mut table = ProductionTable::new(instance.num_periods(), instance.num_parts());
    let mut clock = MachineClock::new(instance, machine);
    let mut previous_part: Option<usize> = None;
    for slot in slots {
        let part = slot.part();
        if let Some(p) = previous_part {
            clock.changeover(instance.transition_cost(p, part));
        }
        clock.advance(part, slot.duration(), |period, units| table.add(period, part, units));
        previous_part = Some(part);
    }
    table.accumulate();
    table
}

/// Total changeover paid along one machine sequence.
pub fn sequence_changeover(instance: &Instance, slots: &[WorkSlot]) -> f64 {
    slots
        .windows(2)
        .map(|pair| instance.transition_cost(pair[0].part(), pair[1].part()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{tight_periods, tight_periods_data, two_by_two};

    #[test]
    fn test_advance_within_period() {
        let instance = two_by_two();
        let mut clock = MachineClock::new(&instance, 0);
        let mut out = Vec::new();
        clock.advance(0, 12.5, |p, u| out.push((p, u)));

        assert_eq!(out, vec![(0, 13)]);
        assert_eq!((clock.period(), clock.time()), (0, 12.5));
    }

    #[test]
    fn test_advance_rolls_over_and_rounds_each_piece_up() {
        let instance = tight_periods();
        // Part 0 on machine 0 runs at rate 2, periods hold 10 time units.
        let mut clock = MachineClock::resume(&instance, 0, 0, 7.5);
        let mut out = Vec::new();
        clock.advance(0, 14.0, |p, u| out.push((p, u)));

        assert_eq!(out, vec![(0, 5), (1, 20), (2, 3)]);
        assert_eq!(clock.period(), 2);
        assert_eq!(clock.time(), 1.5);
    }

    #[test]
    fn test_advance_exactly_to_capacity_moves_to_next_period() {
        let instance = tight_periods();
        let mut clock = MachineClock::new(&instance, 0);
        let mut out = Vec::new();
        clock.advance(1, 10.0, |p, u| out.push((p, u)));

        assert_eq!(out, vec![(0, 10)]);
        assert_eq!((clock.period(), clock.time()), (1, 0.0));
    }

    #[test]
    fn test_output_past_horizon_is_dropped() {
        let instance = tight_periods();
        let mut clock = MachineClock::resume(&instance, 0, 2, 8.0);
        let mut out = Vec::new();
        clock.advance(1, 5.0, |p, u| out.push((p, u)));

        assert_eq!(out, vec![(2, 2)]);
        assert_eq!((clock.period(), clock.time()), (3, 3.0));
    }

    #[test]
    fn test_clock_parks_past_the_horizon() {
        let mut data = tight_periods_data();
        data.capacity[0] = vec![10, 10, 0];
        let instance = Instance::new(data).unwrap();
        let mut clock = MachineClock::resume(&instance, 0, 1, 6.0);
        let mut out = Vec::new();
        clock.advance(1, 7.0, |p, u| out.push((p, u)));

        assert_eq!(out, vec![(1, 4)]);
        assert!(clock.is_past_horizon());
        assert_eq!((clock.period(), clock.time()), (3, 3.0));

        clock.changeover(25.0);
        assert_eq!((clock.period(), clock.time()), (3, 28.0));
    }

    #[test]
    fn test_changeover_can_roll_period() {
        let instance = tight_periods();
        let mut clock = MachineClock::resume(&instance, 0, 0, 9.0);
        clock.changeover(4.0);
        assert_eq!((clock.period(), clock.time()), (1, 3.0));
    }

    #[test]
    fn test_place_records_timing_after_changeover() {
        let instance = two_by_two();
        let mut clock = MachineClock::resume(&instance, 0, 0, 20.0);
        let mut slot = WorkSlot::new(1, 10.0);
        let cost = clock.place(Some(0), &mut slot, |_, _| {}).unwrap();

        assert_eq!(cost, 5.0);
        let timing = slot.timing().unwrap();
        assert_eq!((timing.ini_period, timing.ini_time), (0, 25.0));
        assert_eq!((timing.end_period, timing.end_time), (0, 35.0));
    }

    #[test]
    fn test_machine_production_matches_slot_by_slot_replay() {
        let instance = tight_periods();
        let mut slots = vec![
            WorkSlot::new(0, 6.0),
            WorkSlot::new(2, 7.5),
            WorkSlot::new(1, 9.0),
            WorkSlot::new(0, 4.0),
        ];
        retime(&instance, 0, &mut slots, 0).unwrap();

        let mut replay = ProductionTable::new(3, 3);
        for slot in &slots {
            slot_contributions(&instance, 0, slot, |p, u| replay.add(p, slot.part(), u));
        }
        replay.accumulate();

        assert_eq!(machine_production(&instance, 0, &slots), replay);
        assert_eq!(sequence_changeover(&instance, &slots), 3.0 + 1.0 + 1.0);
    }

    #[test]
    fn test_retime_from_middle_keeps_head() {
        let instance = two_by_two();
        let mut slots = vec![WorkSlot::new(0, 30.0), WorkSlot::new(1, 30.0), WorkSlot::new(0, 50.0)];
        retime(&instance, 0, &mut slots, 0).unwrap();
        let head = slots[0].timing();

        slots.swap(1, 2);
        retime(&instance, 0, &mut slots, 1).unwrap();

        assert_eq!(slots[0].timing(), head);
        let t1 = slots[1].timing().unwrap();
        assert_eq!((t1.ini_period, t1.ini_time, t1.end_period, t1.end_time), (0, 30.0, 0, 80.0));
        let t2 = slots[2].timing().unwrap();
        assert_eq!((t2.ini_period, t2.ini_time, t2.end_period, t2.end_time), (0, 85.0, 1, 15.0));
    }
}
