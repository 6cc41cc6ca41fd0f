//! Dense accumulator implementation for SpGEMM
//!
//! A value slot per output column plus a list of touched columns, so clearing
//! costs the row's fill rather than the full width.

use crate::accumulator::Accumulator;
use crate::matrix::Scalar;

/// Dense accumulator for a single row of sparse matrix multiplication
pub struct DenseAccumulator<T> {
    /// The dense accumulation array
    values: Vec<T>,

    /// Flags to track which positions in the dense array are live
    occupied: Vec<bool>,

    /// Columns touched since the last reset
    col_indices: Vec<usize>,
}

impl<T: Scalar> DenseAccumulator<T> {
    /// Create a new dense accumulator with specified column capacity
    ///
    /// # Arguments
    ///
    /// * `n_cols` - The number of columns in the output matrix (C)
    pub fn new(n_cols: usize) -> Self {
        Self {
            values: vec![T::zero(); n_cols],
            occupied: vec![false; n_cols],
            col_indices: Vec::new(),
        }
    }

    fn reset(&mut self) {
        for &col in &self.col_indices {
            self.occupied[col] = false;
        }
        self.col_indices.clear();
    }

    #[inline]
    fn accumulate(&mut self, col: usize, val: T) {
        if !self.occupied[col] {
            self.occupied[col] = true;
            self.col_indices.push(col);
            self.values[col] = val;
        } else {
            self.values[col] += val;
        }
    }

    fn drain_into(&mut self, out: &mut Vec<(usize, T)>) {
        self.col_indices.sort_unstable();

        out.extend(
            self.col_indices
                .iter()
                .map(|&col| (col, self.values[col]))
                .filter(|(_, val)| !val.is_zero()),
        );

        self.reset();
    }
}

impl<T: Scalar> Accumulator<T> for DenseAccumulator<T> {
    fn reset(&mut self) {
        DenseAccumulator::reset(self)
    }

    fn accumulate(&mut self, col: usize, val: T) {
        DenseAccumulator::accumulate(self, col, val)
    }

    fn drain_into(&mut self, out: &mut Vec<(usize, T)>) {
        DenseAccumulator::drain_into(self, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_accumulator_empty() {
        let mut accumulator = DenseAccumulator::<f64>::new(5);
        let mut out = Vec::new();
        accumulator.drain_into(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_dense_accumulator_multiple_entries() {
        let mut accumulator = DenseAccumulator::<f64>::new(5);

        accumulator.accumulate(1, 2.0);
        accumulator.accumulate(3, 4.0);
        accumulator.accumulate(0, 1.0);
        accumulator.accumulate(3, 0.5);

        let mut out = Vec::new();
        accumulator.drain_into(&mut out);

        // Sorted by column, column 3 summed
        assert_eq!(out, vec![(0, 1.0), (1, 2.0), (3, 4.5)]);
    }

    #[test]
    fn test_dense_accumulator_reset_discards_state() {
        let mut accumulator = DenseAccumulator::<f64>::new(5);

        accumulator.accumulate(1, 2.0);
        accumulator.accumulate(3, 4.0);
        accumulator.reset();

        accumulator.accumulate(0, 1.0);
        accumulator.accumulate(3, 5.0);

        let mut out = Vec::new();
        accumulator.drain_into(&mut out);

        // The stale 4.0 in column 3 must not leak into the new row
        assert_eq!(out, vec![(0, 1.0), (3, 5.0)]);
    }

    #[test]
    fn test_dense_accumulator_appends_to_existing_output() {
        let mut accumulator = DenseAccumulator::<i64>::new(4);
        accumulator.accumulate(2, 7);

        let mut out = vec![(9, 1)];
        accumulator.drain_into(&mut out);
        assert_eq!(out, vec![(9, 1), (2, 7)]);
    }
}
