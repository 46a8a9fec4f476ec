//! Immutable problem definition.
//!
//! An [`Instance`] is built once from already-parsed arrays ([`InstanceData`])
//! and never mutated afterwards. All derived constants are computed in
//! [`Instance::new`].

use serde::{Deserialize, Serialize};

use crate::error::{LotForgeError, Result};
use crate::work_slot::WorkSlot;

/// Raw instance arrays, as handed over by an importer.
///
/// Index conventions:
/// - `production_rate[part][machine]` (0 = the machine cannot produce the part)
/// - `changeover_time[from_part][to_part]`
/// - `inventory[part][period]` (negative = net demand to cover by period end)
/// - `capacity[machine][period]`
/// - `priority[part][machine]` (>1 = non-preferred)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InstanceData {
    #[serde(default)]
    pub name: String,
    pub num_parts: usize,
    pub num_machines: usize,
    pub num_periods: usize,
    pub production_rate: Vec<Vec<i64>>,
    pub changeover_time: Vec<Vec<i64>>,
    pub inventory: Vec<Vec<i64>>,
    pub capacity: Vec<Vec<i64>>,
    pub priority: Vec<Vec<i64>>,
}

/// Capacitated lot-sizing instance plus its derived constants.
#[derive(Clone)]
pub struct Instance {
    data: InstanceData,
    minimum_workload: f64,
    maximum_shortage: i64,
    maximum_work_slots: usize,
    no_shortage_slots: Vec<WorkSlot>,
}

impl Instance {
    /// Validates the arrays and computes the derived constants.
    ///
    /// # Errors
    ///
    /// - [`LotForgeError::InvalidInstance`] when an array does not match the
    ///   declared dimensions or holds a negative rate, changeover, capacity or
    ///   priority.
    /// - [`LotForgeError::InfeasibleInstance`] when a part has no capable
    ///   machine or the changeover matrix is all zero (no minimum batch can be
    ///   derived).
    pub fn new(data: InstanceData) -> Result<Self> {
        check_dimensions(&data)?;

        let minimum_workload = data
            .changeover_time
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0);
        if minimum_workload <= 0 {
            return Err(LotForgeError::InfeasibleInstance(
                "changeover matrix has no positive entry, minimum workload would be zero".into(),
            ));
        }
        let minimum_workload = minimum_workload as f64;

        let last = data.num_periods - 1;
        let maximum_shortage: i64 = data.inventory.iter().map(|row| row[last].min(0)).sum();
        let maximum_work_slots = ((-maximum_shortage) as f64 / minimum_workload).ceil() as usize;

        let mut no_shortage_slots = Vec::new();
        for part in 0..data.num_parts {
            let minimum_rate = data.production_rate[part]
                .iter()
                .copied()
                .filter(|&rate| rate > 0)
                .min()
                .ok_or_else(|| {
                    LotForgeError::InfeasibleInstance(format!("No machine can produce part {part}"))
                })?;

            let hours_needed = -(data.inventory[part][last] as f64) / minimum_rate as f64;
            let slot_count = (hours_needed / minimum_workload).ceil().max(0.0) as usize;
            for _ in 0..slot_count {
                no_shortage_slots.push(WorkSlot::new(part, minimum_workload));
            }

            // Fold the last two slots into one carrying the remainder.
            let remainder = hours_needed % minimum_workload;
            if hours_needed > minimum_workload && remainder != 0.0 {
                no_shortage_slots.truncate(no_shortage_slots.len() - 2);
                no_shortage_slots.push(WorkSlot::new(part, minimum_workload + remainder));
            }
        }

        Ok(Self {
            data,
            minimum_workload,
            maximum_shortage,
            maximum_work_slots,
            no_shortage_slots,
        })
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn num_parts(&self) -> usize {
        self.data.num_parts
    }

    pub fn num_machines(&self) -> usize {
        self.data.num_machines
    }

    pub fn num_periods(&self) -> usize {
        self.data.num_periods
    }

    /// Units per time unit of `part` on `machine`; 0 when the machine cannot produce it.
    pub fn production_rate(&self, part: usize, machine: usize) -> i64 {
        self.data.production_rate[part][machine]
    }

    pub fn can_produce(&self, part: usize, machine: usize) -> bool {
        self.data.production_rate[part][machine] > 0
    }

    /// Machines with a nonzero production rate for `part`, in index order.
    pub fn capable_machines(&self, part: usize) -> impl Iterator<Item = usize> + '_ {
        self.data.production_rate[part]
            .iter()
            .enumerate()
            .filter(|(_, &rate)| rate > 0)
            .map(|(machine, _)| machine)
    }

    /// Raw changeover matrix entry.
    pub fn changeover_time(&self, from_part: usize, to_part: usize) -> i64 {
        self.data.changeover_time[from_part][to_part]
    }

    /// Changeover paid when a machine switches from `from_part` to `to_part`.
    ///
    /// Consecutive slots of the same part never pay a changeover.
    pub fn transition_cost(&self, from_part: usize, to_part: usize) -> f64 {
        if from_part == to_part {
            0.0
        } else {
            self.data.changeover_time[from_part][to_part] as f64
        }
    }

    pub fn inventory(&self, part: usize, period: usize) -> i64 {
        self.data.inventory[part][period]
    }

    /// Outstanding demand of `part` at the end of the horizon (never negative).
    pub fn final_demand(&self, part: usize) -> i64 {
        (-self.data.inventory[part][self.data.num_periods - 1]).max(0)
    }

    /// Capacity of `machine` in `period`, clamped to the last period of the horizon.
    pub fn machine_capacity(&self, machine: usize, period: usize) -> f64 {
        let period = period.min(self.data.num_periods - 1);
        self.data.capacity[machine][period] as f64
    }

    pub fn priority(&self, part: usize, machine: usize) -> i64 {
        self.data.priority[part][machine]
    }

    /// Maximum entry of the changeover matrix, used as the minimum batch size.
    pub fn minimum_workload(&self) -> f64 {
        self.minimum_workload
    }

    /// Sum of the final-period inventory deficits (zero or negative).
    pub fn maximum_shortage(&self) -> i64 {
        self.maximum_shortage
    }

    /// Work slot budget of every machine sequence.
    pub fn maximum_work_slots(&self) -> usize {
        self.maximum_work_slots
    }

    /// Minimal slots that cover each part's final deficit at the slowest capable rate.
    pub fn no_shortage_slots(&self) -> &[WorkSlot] {
        &self.no_shortage_slots
    }

    /// The arrays this instance was built from.
    pub fn data(&self) -> &InstanceData {
        &self.data
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.data.name)
            .field("num_parts", &self.data.num_parts)
            .field("num_machines", &self.data.num_machines)
            .field("num_periods", &self.data.num_periods)
            .field("minimum_workload", &self.minimum_workload)
            .field("maximum_shortage", &self.maximum_shortage)
            .field("maximum_work_slots", &self.maximum_work_slots)
            .finish()
    }
}

fn check_dimensions(data: &InstanceData) -> Result<()> {
    if data.num_parts == 0 || data.num_machines == 0 || data.num_periods == 0 {
        return Err(LotForgeError::InvalidInstance(
            "parts, machines and periods must all be at least one".into(),
        ));
    }
    check_matrix("production_rate", &data.production_rate, data.num_parts, data.num_machines, false)?;
    check_matrix("changeover_time", &data.changeover_time, data.num_parts, data.num_parts, false)?;
    check_matrix("inventory", &data.inventory, data.num_parts, data.num_periods, true)?;
    check_matrix("capacity", &data.capacity, data.num_machines, data.num_periods, false)?;
    check_matrix("priority", &data.priority, data.num_parts, data.num_machines, false)?;
    Ok(())
}

fn check_matrix(
    name: &str,
    matrix: &[Vec<i64>],
    rows: usize,
    cols: usize,
    allow_negative: bool,
) -> Result<()> {
    if matrix.len() != rows {
        return Err(LotForgeError::InvalidInstance(format!(
            "{name} has {} rows, expected {rows}",
            matrix.len()
        )));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != cols {
            return Err(LotForgeError::InvalidInstance(format!(
                "{name} row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
        if !allow_negative && row.iter().any(|&v| v < 0) {
            return Err(LotForgeError::InvalidInstance(format!(
                "{name} row {i} holds a negative value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
