//! Delta evaluation of relocations and exchanges.
//!
//! Changeover is adjusted from the broken and newly formed adjacencies only.
//! Shortage comes from recomputing the production of the changed machines
//! and diffing it against the solution's cached aggregate.

use lotforge_core::clock::machine_production;
use lotforge_core::{Coordinate, Instance, MoveDelta, ProductionTable, Solution, WorkSlot};
use smallvec::SmallVec;

use super::{Move, MoveKind};

type Tables = SmallVec<[(usize, ProductionTable); 2]>;

fn edge(instance: &Instance, from: Option<&WorkSlot>, to: Option<&WorkSlot>) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) => instance.transition_cost(a.part(), b.part()),
        _ => 0.0,
    }
}

/// Changeover of the edge between positions `k` and `k + 1`.
fn edge_at(instance: &Instance, slots: &[WorkSlot], k: usize) -> f64 {
    edge(instance, slots.get(k), slots.get(k + 1))
}

/// Changeover the slot at `at` adds compared to its neighbours being adjacent.
fn detour(instance: &Instance, slots: &[WorkSlot], at: usize) -> f64 {
    let slot = slots.get(at);
    let previous = at.checked_sub(1).and_then(|i| slots.get(i));
    let next = slots.get(at + 1);
    edge(instance, previous, slot) + edge(instance, slot, next) - edge(instance, previous, next)
}

/// Sum of `edge_at(after) - edge_at(before)` over the edges around `positions`.
fn edges_changed(instance: &Instance, before: &[WorkSlot], after: &[WorkSlot], positions: &[usize]) -> f64 {
    let mut edges: SmallVec<[usize; 4]> = positions
        .iter()
        .flat_map(|&p| [p.checked_sub(1), Some(p)])
        .flatten()
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
        .into_iter()
        .map(|k| edge_at(instance, after, k) - edge_at(instance, before, k))
        .sum()
}

fn finish(solution: &Solution, kind: MoveKind, coordinate: Coordinate, changeover_delta: f64, production: Tables) -> Move {
    let shortage = {
        let replaced: SmallVec<[(usize, &ProductionTable); 2]> =
            production.iter().map(|(machine, table)| (*machine, table)).collect();
        solution.shortage_with(&replaced)
    };
    let changeover = solution.changeover() + changeover_delta;
    let move_value = changeover + shortage - solution.score();
    Move::new(
        kind,
        coordinate,
        move_value,
        MoveDelta {
            changeover,
            shortage,
            production,
        },
    )
}

fn in_range(solution: &Solution, coordinate: &Coordinate) -> bool {
    coordinate.machine_ini < solution.num_machines() && coordinate.machine_end < solution.num_machines()
}

/// Evaluates relocating the slot at the source to index `position_end` of the
/// destination sequence, counted after the slot has been removed.
///
/// Returns `None` when the relocation would leave the sequences unchanged
/// (including walking past twins with the same work), falls outside them,
/// lands the part on a machine that cannot produce it, or targets another
/// machine that is already at its work slot budget.
pub fn evaluate_insert(solution: &Solution, coordinate: Coordinate) -> Option<Move> {
    if !in_range(solution, &coordinate) {
        return None;
    }
    let instance = &**solution.instance();
    let c = coordinate;
    let source = solution.sequence(c.machine_ini);
    let slot = *source.get(c.position_ini)?;
    if !instance.can_produce(slot.part(), c.machine_end) {
        return None;
    }

    let removal = detour(instance, source, c.position_ini);
    let mut production = Tables::new();
    let insertion = if c.same_machine() {
        if c.position_end == c.position_ini || c.position_end >= source.len() {
            return None;
        }
        let (low, high) = (c.position_ini.min(c.position_end), c.position_ini.max(c.position_end));
        if source[low..=high].iter().all(|other| other.same_work(&slot)) {
            return None;
        }
        let mut slots = source.to_vec();
        let moved = slots.remove(c.position_ini);
        slots.insert(c.position_end, moved);
        production.push((c.machine_ini, machine_production(instance, c.machine_ini, &slots)));
        detour(instance, &slots, c.position_end)
    } else {
        let target = solution.sequence(c.machine_end);
        if c.position_end > target.len() || !solution.has_room(c.machine_end) {
            return None;
        }
        let mut remaining = source.to_vec();
        remaining.remove(c.position_ini);
        let mut extended = target.to_vec();
        extended.insert(c.position_end, slot);
        production.push((c.machine_ini, machine_production(instance, c.machine_ini, &remaining)));
        production.push((c.machine_end, machine_production(instance, c.machine_end, &extended)));
        detour(instance, &extended, c.position_end)
    };

    Some(finish(solution, MoveKind::Insert, c, insertion - removal, production))
}

/// Evaluates swapping the slots at source and destination.
///
/// Returns `None` for identical coordinates, slots with the same part and
/// duration, positions outside the sequences, or when either machine cannot
/// produce the part it would receive.
pub fn evaluate_exchange(solution: &Solution, coordinate: Coordinate) -> Option<Move> {
    if !in_range(solution, &coordinate) || coordinate.is_identity() {
        return None;
    }
    let instance = &**solution.instance();
    let c = coordinate;
    let first = *solution.sequence(c.machine_ini).get(c.position_ini)?;
    let second = *solution.sequence(c.machine_end).get(c.position_end)?;
    if first.same_work(&second)
        || !instance.can_produce(first.part(), c.machine_end)
        || !instance.can_produce(second.part(), c.machine_ini)
    {
        return None;
    }

    let mut production = Tables::new();
    let changeover_delta = if c.same_machine() {
        let before = solution.sequence(c.machine_ini);
        let mut after = before.to_vec();
        after.swap(c.position_ini, c.position_end);
        production.push((c.machine_ini, machine_production(instance, c.machine_ini, &after)));
        edges_changed(instance, before, &after, &[c.position_ini, c.position_end])
    } else {
        let source = solution.sequence(c.machine_ini);
        let target = solution.sequence(c.machine_end);
        let mut new_source = source.to_vec();
        let mut new_target = target.to_vec();
        new_source[c.position_ini] = second;
        new_target[c.position_end] = first;
        production.push((c.machine_ini, machine_production(instance, c.machine_ini, &new_source)));
        production.push((c.machine_end, machine_production(instance, c.machine_end, &new_target)));
        edges_changed(instance, source, &new_source, &[c.position_ini])
            + edges_changed(instance, target, &new_target, &[c.position_end])
    };

    Some(finish(solution, MoveKind::Exchange, c, changeover_delta, production))
}
