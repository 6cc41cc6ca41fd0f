//! # Parallel top-N product
//!
//! Rows are split into contiguous, near-equal ranges, one per worker. Each
//! worker owns its [`RowKernel`] and its output builder, so nothing mutable is
//! shared while rows are processed. Partition outputs are concatenated in
//! partition order after all workers have joined, which keeps the result
//! identical to the sequential path for any worker count.

use log::debug;
use rayon::prelude::*;
use std::ops::Range;

use crate::error::{Result, TopNError};
use crate::kernel::{PartialResult, RowKernel};
use crate::matrix::{CsrView, OutputBuilder, Scalar, TopNConfig};
use crate::TopNProduct;

/// Splits `0..n_rows` into at most `n_parts` contiguous ranges whose sizes
/// differ by at most one
///
/// Never returns an empty range: `n_parts` is clamped to `n_rows`, and no
/// ranges are returned when there are no rows.
pub fn partition_rows(n_rows: usize, n_parts: usize) -> Vec<Range<usize>> {
    let n_parts = n_parts.min(n_rows);
    if n_parts == 0 {
        return Vec::new();
    }

    let base = n_rows / n_parts;
    let remainder = n_rows % n_parts;

    let mut ranges = Vec::with_capacity(n_parts);
    let mut start = 0;
    for p in 0..n_parts {
        let len = base + usize::from(p < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Runs one partition on the calling thread
pub(crate) fn run_partition<T: Scalar>(
    rows: Range<usize>,
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
    config: &TopNConfig,
) -> Result<PartialResult<T>> {
    let mut kernel = RowKernel::new(b.n_cols(), n, lower_bound, config);
    kernel.process_rows(rows, a, b, config)
}

/// Joins partition outputs in partition order
pub(crate) fn concatenate<T: Scalar>(
    mut parts: Vec<PartialResult<T>>,
    n_rows: usize,
    n_cols: usize,
) -> Result<TopNProduct<T>> {
    if parts.len() == 1 {
        if let Some(part) = parts.pop() {
            return Ok(TopNProduct {
                matrix: part.rows.finish(n_cols),
                best_ntop: part.best_ntop,
            });
        }
    }

    let total_nnz: usize = parts.iter().map(|p| p.rows.nnz()).sum();
    debug!(
        "concatenating {} partitions holding {} entries",
        parts.len(),
        total_nnz
    );

    let mut output = OutputBuilder::with_capacity(n_rows, total_nnz)?;
    let mut best_ntop = 0;
    for part in parts {
        best_ntop = best_ntop.max(part.best_ntop);
        output.append(part.rows)?;
    }

    Ok(TopNProduct {
        matrix: output.finish(n_cols),
        best_ntop,
    })
}

/// Distributes the rows of A over `n_threads` workers
pub(crate) fn coordinate<T: Scalar>(
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
    config: &TopNConfig,
    n_threads: usize,
) -> Result<TopNProduct<T>> {
    let ranges = partition_rows(a.n_rows(), n_threads);
    debug!(
        "{} rows over {} partitions (requested {} threads)",
        a.n_rows(),
        ranges.len(),
        n_threads
    );

    let parts: Vec<PartialResult<T>> = if ranges.len() <= 1 {
        // No pool for zero or one partition; an empty A still yields an empty
        // builder so the output carries row_ptr = [0]
        let rows = ranges.into_iter().next().unwrap_or(0..0);
        vec![run_partition(rows, a, b, n, lower_bound, config)?]
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .build()?;
        pool.install(|| {
            ranges
                .par_iter()
                .map(|rows| run_partition(rows.clone(), a, b, n, lower_bound, config))
                .collect::<Result<Vec<_>>>()
        })?
    };

    concatenate(parts, a.n_rows(), b.n_cols())
}

/// Multiplies A by B keeping the `n` largest entries `>= lower_bound` of every
/// row, spreading rows over `num_threads` worker threads
///
/// Produces exactly the same arrays as [`crate::multiply_top_n`] for every
/// `num_threads`. Requests for more threads than A has rows are clamped to
/// the row count.
///
/// # Errors
///
/// - [`TopNError::InvalidParameter`] if `n` or `num_threads` is zero
/// - [`TopNError::DimensionMismatch`] if A's column count differs from B's
///   row count
/// - [`TopNError::Capacity`] if output storage cannot grow
/// - [`TopNError::ThreadPool`] if the worker threads cannot be started
///
/// # Panics
///
/// Column indices are not range-checked: an A column index `>= b.n_rows()` or
/// a B column index `>= b.n_cols()` panics inside the row loop. Run
/// [`CsrView::validate_indices`](crate::CsrView::validate_indices) first on
/// operands that are not trusted.
///
/// # Examples
///
/// ```
/// use sparse_topn::{multiply_top_n_parallel, SparseMatrixCSR};
///
/// // A = [[1, 1], [0, 1]], B = [[1, 2], [3, 0]]
/// let a = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 1.0, 1.0]);
/// let b = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 0], vec![1.0, 2.0, 3.0]);
///
/// let c = multiply_top_n_parallel(&a.view(), &b.view(), 1, 0.0, 2).unwrap();
///
/// // Row 0 is [4, 2], row 1 is [3, 0]; only the best entry of each survives
/// assert_eq!(c.row_ptr, vec![0, 1, 2]);
/// assert_eq!(c.col_idx, vec![0, 0]);
/// assert_eq!(c.values, vec![4.0, 3.0]);
/// ```
pub fn multiply_top_n_parallel<T: Scalar>(
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
    num_threads: usize,
) -> Result<crate::SparseMatrixCSR<T>> {
    if num_threads == 0 {
        return Err(TopNError::invalid_parameter(
            "num_threads",
            "must be at least 1",
        ));
    }
    let config = TopNConfig::default().with_threads(num_threads);
    crate::multiply_top_n_with_config(a, b, n, lower_bound, &config).map(|p| p.matrix)
}
