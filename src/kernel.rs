//! Per-worker row processing
//!
//! A [`RowKernel`] bundles everything one worker owns for the duration of a
//! call: an accumulator, a candidate buffer, a selector and a buffer for the
//! selected row. Both the sequential and the parallel entry points push every
//! row through [`RowKernel::process_rows`], so they cannot drift apart.

use std::ops::Range;

use crate::accumulator::{create_accumulator, multiply_row, Accumulator};
use crate::error::Result;
use crate::matrix::{CsrView, OutputBuilder, Scalar, TopNConfig};
use crate::select::TopNSelector;

/// Output of one contiguous row range
#[derive(Debug)]
pub struct PartialResult<T> {
    /// Selected rows, with row pointers relative to the range start
    pub rows: OutputBuilder<T>,

    /// Largest number of candidates any row had at or above the lower bound
    pub best_ntop: usize,
}

/// Multiply-accumulate-select state owned by one worker
pub struct RowKernel<T: Scalar> {
    accumulator: Box<dyn Accumulator<T>>,
    selector: TopNSelector<T>,
    candidates: Vec<(usize, T)>,
    selected: Vec<(usize, T)>,
}

impl<T: Scalar> RowKernel<T> {
    /// Creates kernel state for an output with `n_cols` columns
    pub fn new(n_cols: usize, n: usize, lower_bound: T, config: &TopNConfig) -> Self {
        Self {
            accumulator: create_accumulator(config.accumulator_kind(n_cols), n_cols),
            selector: TopNSelector::new(n, lower_bound),
            candidates: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// Computes and selects a single output row into `self.selected`,
    /// returning the number of candidates that reached the lower bound
    fn process_row(&mut self, i: usize, a: &CsrView<'_, T>, b: &CsrView<'_, T>) -> usize {
        multiply_row(self.accumulator.as_mut(), i, a, b);

        self.candidates.clear();
        self.accumulator.drain_into(&mut self.candidates);

        self.selector.select(&self.candidates, &mut self.selected)
    }

    /// Runs every row in `rows` through multiply, accumulate and select
    pub fn process_rows(
        &mut self,
        rows: Range<usize>,
        a: &CsrView<'_, T>,
        b: &CsrView<'_, T>,
        config: &TopNConfig,
    ) -> Result<PartialResult<T>> {
        let n_rows = rows.len();
        let mut builder =
            OutputBuilder::with_capacity(n_rows, config.initial_capacity(n_rows, self.selector.n()))?;
        let mut best_ntop = 0;

        for i in rows {
            let passed = self.process_row(i, a, b);
            best_ntop = best_ntop.max(passed);
            builder.push_row(&self.selected)?;
        }

        Ok(PartialResult {
            rows: builder,
            best_ntop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrixCSR;

    #[test]
    fn test_process_rows_subrange_has_local_row_ptr() {
        // A = diag(1, 2, 3), B = [[1, 2], [3, 4], [5, 6]]
        let a = SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 2.0, 3.0]);
        let b = SparseMatrixCSR::new(
            3,
            2,
            vec![0, 2, 4, 6],
            vec![0, 1, 0, 1, 0, 1],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        );
        let config = TopNConfig::default();
        let mut kernel = RowKernel::new(2, 1, 0.0, &config);

        let part = kernel.process_rows(1..3, &a.view(), &b.view(), &config).unwrap();
        assert_eq!(part.best_ntop, 2);

        let m = part.rows.finish(2);
        assert_eq!(m.n_rows, 2);
        assert_eq!(m.row_ptr, vec![0, 1, 2]);
        assert_eq!(m.col_idx, vec![1, 1]);
        assert_eq!(m.values, vec![8.0, 18.0]);
    }

    #[test]
    fn test_dense_and_sort_kernels_match() {
        let a = SparseMatrixCSR::from_dense(2, 3, &[1.0, 0.5, 0.0, 0.0, 2.0, 1.0]);
        let b = SparseMatrixCSR::from_dense(3, 4, &[
            1.0, 0.0, 2.0, 0.5, //
            0.0, 4.0, 0.0, 1.0, //
            3.0, 0.0, 0.0, 2.0,
        ]);
        let dense_cfg = TopNConfig::default().with_dense_threshold(usize::MAX);
        let sort_cfg = TopNConfig::default().with_dense_threshold(0);

        let run = |config: &TopNConfig| {
            let mut kernel = RowKernel::new(4, 3, 0.0, config);
            kernel
                .process_rows(0..2, &a.view(), &b.view(), config)
                .unwrap()
                .rows
                .finish(4)
        };

        assert_eq!(run(&dense_cfg), run(&sort_cfg));
    }
}
