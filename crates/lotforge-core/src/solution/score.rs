use crate::clock::{machine_production, sequence_changeover};
use crate::instance::Instance;
use crate::production::ProductionTable;

use super::Solution;

/// Unmet cumulative demand over every period and part.
pub(crate) fn shortage_of(instance: &Instance, total: &ProductionTable) -> f64 {
    let mut shortage = 0i64;
    for period in 0..instance.num_periods() {
        for (part, &produced) in total.row(period).iter().enumerate() {
            shortage += deficit(produced, instance.inventory(part, period));
        }
    }
    shortage as f64
}

#[inline]
fn deficit(produced: i64, inventory: i64) -> i64 {
    (-(produced + inventory)).max(0)
}

impl Solution {
    /// Changeover and shortage recomputed from the raw sequences.
    ///
    /// Reads nothing cached and writes nothing.
    pub fn recalculate_score(&self) -> f64 {
        self.full_changeover() + self.full_shortage()
    }

    pub fn full_changeover(&self) -> f64 {
        self.machines
            .iter()
            .map(|slots| sequence_changeover(&self.instance, slots))
            .sum()
    }

    pub fn full_shortage(&self) -> f64 {
        let instance = &*self.instance;
        let mut total = ProductionTable::new(instance.num_periods(), instance.num_parts());
        for (machine, slots) in self.machines.iter().enumerate() {
            total.absorb(&machine_production(instance, machine, slots));
        }
        shortage_of(instance, &total)
    }

    /// Shortage the solution would have if each listed machine's cumulative
    /// production were replaced by the given table.
    ///
    /// Only the listed machines are diffed against the cached aggregate, and
    /// only the clipped deficits that change are adjusted.
    pub fn shortage_with(&self, replaced: &[(usize, &ProductionTable)]) -> f64 {
        let instance = &*self.instance;
        let mut shortage = self.shortage as i64;
        for period in 0..instance.num_periods() {
            for part in 0..instance.num_parts() {
                let change: i64 = replaced
                    .iter()
                    .map(|(machine, table)| {
                        table.get(period, part) - self.production[*machine].get(period, part)
                    })
                    .sum();
                if change == 0 {
                    continue;
                }
                let before = self.total_production.get(period, part);
                let inventory = instance.inventory(part, period);
                shortage += deficit(before + change, inventory) - deficit(before, inventory);
            }
        }
        shortage as f64
    }
}
