//! Accumulator implementations for sparse matrix multiplication
//!
//! An accumulator gathers the partial products `a_ik * b_kj` of one output row
//! keyed by output column `j`. Each worker owns one accumulator and reuses it
//! for every row it processes.

pub mod dense;
pub mod sort;

use crate::matrix::{AccumulatorKind, CsrView, Scalar};

pub use dense::DenseAccumulator;
pub use sort::SortAccumulator;

/// Trait for accumulators that handle intermediate products in SpGEMM
///
/// Products for the same column must be summed in the order they were
/// accumulated, so every implementation yields bit-identical sums.
pub trait Accumulator<T: Scalar>: Send {
    /// Reset the accumulator to prepare for a new row
    fn reset(&mut self);

    /// Accumulate a single entry (column and value)
    fn accumulate(&mut self, col: usize, val: T);

    /// Append the row's non-zero `(column, sum)` pairs to `out` in ascending
    /// column order and leave the accumulator empty
    fn drain_into(&mut self, out: &mut Vec<(usize, T)>);
}

/// Create the accumulator for an output with `n_cols` columns
pub fn create_accumulator<T: Scalar>(kind: AccumulatorKind, n_cols: usize) -> Box<dyn Accumulator<T>> {
    match kind {
        AccumulatorKind::Dense => Box::new(DenseAccumulator::new(n_cols)),
        AccumulatorKind::Sort => {
            let initial_capacity = std::cmp::min(n_cols / 10, 1024);
            Box::new(SortAccumulator::new(initial_capacity))
        }
    }
}

/// Accumulates every partial product of output row `a_row` into `accumulator`
///
/// Row `a_row` of A selects rows of B by its column indices; each stored entry
/// of those B rows contributes to the output column it sits in.
#[inline]
pub fn multiply_row<T: Scalar>(
    accumulator: &mut dyn Accumulator<T>,
    a_row: usize,
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
) {
    let (b_cols, b_vals) = (b.col_idx(), b.values());

    for (k, &a_val) in a.row_iter(a_row) {
        for b_idx in b.row_range(k) {
            accumulator.accumulate(b_cols[b_idx], a_val * b_vals[b_idx]);
        }
    }
}
