//! Period by part production counters.

use crate::error::{LotForgeError, Result};

/// Units produced, indexed by `(period, part)`.
///
/// Depending on where it sits the table holds either per-period units (while a
/// batch of slots is being appended) or cumulative units up to and including
/// each period (everywhere else). [`accumulate`](Self::accumulate) converts the
/// former into the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionTable {
    periods: usize,
    parts: usize,
    units: Vec<i64>,
}

impl ProductionTable {
    pub fn new(periods: usize, parts: usize) -> Self {
        Self {
            periods,
            parts,
            units: vec![0; periods * parts],
        }
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    pub fn parts(&self) -> usize {
        self.parts
    }

    #[inline]
    fn index(&self, period: usize, part: usize) -> usize {
        period * self.parts + part
    }

    #[inline]
    pub fn get(&self, period: usize, part: usize) -> i64 {
        self.units[self.index(period, part)]
    }

    /// All parts of one period.
    pub fn row(&self, period: usize) -> &[i64] {
        let start = period * self.parts;
        &self.units[start..start + self.parts]
    }

    /// Adds units to a single period.
    #[inline]
    pub fn add(&mut self, period: usize, part: usize, units: i64) {
        let i = self.index(period, part);
        self.units[i] += units;
    }

    /// Adds units to `period` and every later period of a cumulative table.
    pub fn add_from(&mut self, period: usize, part: usize, units: i64) {
        for p in period..self.periods {
            self.add(p, part, units);
        }
    }

    /// Removes units from `period` and every later period of a cumulative table.
    ///
    /// Ceiling rounding at period boundaries can leave a counter one unit short
    /// of what is being removed. A result of exactly `-1` is clamped to zero;
    /// anything lower is reported as [`LotForgeError::Fault`] and the table is
    /// left untouched.
    pub fn remove_units(&mut self, period: usize, part: usize, units: i64) -> Result<()> {
        for p in period..self.periods {
            let remaining = self.get(p, part) - units;
            if remaining < -1 {
                return Err(LotForgeError::Fault(format!(
                    "production of part {part} in period {p} would drop to {remaining}"
                )));
            }
        }
        for p in period..self.periods {
            let i = self.index(p, part);
            self.units[i] = (self.units[i] - units).max(0);
        }
        Ok(())
    }

    /// Turns per-period units into cumulative units in place.
    pub fn accumulate(&mut self) {
        for period in 1..self.periods {
            for part in 0..self.parts {
                let previous = self.get(period - 1, part);
                self.add(period, part, previous);
            }
        }
    }

    /// Adds every counter of `other` into this table.
    pub fn absorb(&mut self, other: &ProductionTable) {
        debug_assert_eq!(self.units.len(), other.units.len());
        for (mine, theirs) in self.units.iter_mut().zip(&other.units) {
            *mine += theirs;
        }
    }

    /// Subtracts every counter of `other` from this table.
    pub fn release(&mut self, other: &ProductionTable) {
        debug_assert_eq!(self.units.len(), other.units.len());
        for (mine, theirs) in self.units.iter_mut().zip(&other.units) {
            *mine -= theirs;
        }
    }

    pub fn clear(&mut self) {
        self.units.iter_mut().for_each(|u| *u = 0);
    }

    /// Copies the rows of this table into a `[period][part]` matrix.
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        (0..self.periods).map(|p| self.row(p).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_prefix_sums_periods() {
        let mut table = ProductionTable::new(3, 2);
        table.add(0, 0, 4);
        table.add(2, 0, 1);
        table.add(1, 1, 7);
        table.accumulate();

        assert_eq!(table.to_rows(), vec![vec![4, 0], vec![4, 7], vec![5, 7]]);
    }

    #[test]
    fn test_add_from_propagates_forward() {
        let mut table = ProductionTable::new(3, 1);
        table.add_from(1, 0, 6);
        assert_eq!(table.to_rows(), vec![vec![0], vec![6], vec![6]]);
    }

    #[test]
    fn test_remove_units_clamps_one_unit_drift() {
        let mut table = ProductionTable::new(2, 1);
        table.add_from(0, 0, 3);

        table.remove_units(0, 0, 4).unwrap();
        assert_eq!(table.to_rows(), vec![vec![0], vec![0]]);
    }

    #[test]
    fn test_remove_units_rejects_larger_drift() {
        let mut table = ProductionTable::new(2, 1);
        table.add(0, 0, 3);
        table.add(1, 0, 5);

        let err = table.remove_units(0, 0, 5).unwrap_err();
        assert!(err.is_fault());
        // Nothing was written on failure.
        assert_eq!(table.to_rows(), vec![vec![3], vec![5]]);
    }

    #[test]
    fn test_absorb_and_release_cancel() {
        let mut total = ProductionTable::new(2, 2);
        let mut machine = ProductionTable::new(2, 2);
        machine.add(1, 1, 9);
        total.absorb(&machine);
        assert_eq!(total.get(1, 1), 9);
        total.release(&machine);
        assert_eq!(total, ProductionTable::new(2, 2));
    }
}
