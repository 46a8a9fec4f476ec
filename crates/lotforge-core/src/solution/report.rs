use std::fmt;

use serde::Serialize;

use crate::work_slot::WorkSlot;

use super::Solution;

/// One machine's sequence with timing.
#[derive(Debug, Clone, Serialize)]
pub struct MachineReport {
    pub machine: usize,
    pub slots: Vec<WorkSlot>,
}

/// Structured export of a solution.
///
/// Matrices are indexed `[period][part]`. `inventory` is the projected level
/// (cumulative production plus forecast) and `shortage` its clipped negative.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionReport {
    pub instance: String,
    pub machines: Vec<MachineReport>,
    pub production: Vec<Vec<i64>>,
    pub inventory: Vec<Vec<i64>>,
    pub shortage: Vec<Vec<i64>>,
    pub changeover_total: f64,
    pub shortage_total: f64,
    pub priority_hours: f64,
    pub score: f64,
    pub recalculated_score: f64,
}

impl Solution {
    pub fn report(&self) -> SolutionReport {
        let instance = &*self.instance;
        let production = self.total_production.to_rows();
        let inventory: Vec<Vec<i64>> = production
            .iter()
            .enumerate()
            .map(|(period, row)| {
                row.iter()
                    .enumerate()
                    .map(|(part, produced)| produced + instance.inventory(part, period))
                    .collect()
            })
            .collect();
        let shortage = inventory
            .iter()
            .map(|row| row.iter().map(|level| (-level).max(0)).collect())
            .collect();

        SolutionReport {
            instance: instance.name().to_string(),
            machines: self
                .machines
                .iter()
                .enumerate()
                .map(|(machine, slots)| MachineReport {
                    machine,
                    slots: slots.clone(),
                })
                .collect(),
            production,
            inventory,
            shortage,
            changeover_total: self.changeover,
            shortage_total: self.shortage,
            priority_hours: self.priority_hours(),
            score: self.score,
            recalculated_score: self.recalculate_score(),
        }
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution for {}", self.instance)?;
        for machine in &self.machines {
            writeln!(f, "Machine {} ({} slots)", machine.machine, machine.slots.len())?;
            for slot in &machine.slots {
                let t = slot.timing().unwrap_or_default();
                writeln!(
                    f,
                    "  part {:>3}  duration {:>8.2}  start {}@{:.2}  end {}@{:.2}",
                    slot.part(),
                    slot.duration(),
                    t.ini_period,
                    t.ini_time,
                    t.end_period,
                    t.end_time
                )?;
            }
        }
        write_matrix(f, "Cumulative production", &self.production)?;
        write_matrix(f, "Inventory level", &self.inventory)?;
        write_matrix(f, "Shortage", &self.shortage)?;
        writeln!(f, "Changeover: {}", self.changeover_total)?;
        writeln!(f, "Shortage: {}", self.shortage_total)?;
        writeln!(f, "Priority hours: {}", self.priority_hours)?;
        writeln!(
            f,
            "Score: {} (recalculated {})",
            self.score, self.recalculated_score
        )
    }
}

fn write_matrix(f: &mut fmt::Formatter<'_>, title: &str, rows: &[Vec<i64>]) -> fmt::Result {
    writeln!(f, "{title}")?;
    for (period, row) in rows.iter().enumerate() {
        write!(f, "  period {period:>3}:")?;
        for value in row {
            write!(f, " {value:>7}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
