//! # sparse_topn: sparse matrix products that keep only the best entries
//!
//! Computes C = A·B for two CSR matrices while keeping, in every row of C,
//! only the N largest entries at or above a lower bound. This is the usual
//! way to make all-pairs similarity over large vocabularies tractable: the
//! full product can be dense, but each row only needs its strongest matches.
//!
//! ## Algorithm Components
//!
//! 1. **Row multiply-accumulate**: each output row is the sum of the B rows
//!    selected by A's column indices, gathered in a dense or sort-based
//!    accumulator reused across rows.
//!
//! 2. **Bounded top-N selection**: a min-heap of at most N candidates; rows
//!    come out sorted by descending value, ties broken by ascending column.
//!
//! 3. **Growable output**: result arrays grow geometrically since the number
//!    of kept entries is unknown in advance.
//!
//! 4. **Row partitioning**: the parallel path gives each worker a contiguous
//!    row range and concatenates the partitions in order, so every worker
//!    count produces identical output.
//!
//! ## Usage
//!
//! ```
//! use sparse_topn::{multiply_top_n, SparseMatrixCSR};
//!
//! // A = [[1, 0, 2]], B = [[3], [0], [1]]
//! let a = SparseMatrixCSR::new(1, 3, vec![0, 2], vec![0, 2], vec![1.0, 2.0]);
//! let b = SparseMatrixCSR::new(3, 1, vec![0, 1, 1, 2], vec![0, 0], vec![3.0, 1.0]);
//!
//! let c = multiply_top_n(&a.view(), &b.view(), 1, 0.0).unwrap();
//! assert_eq!(c.values, vec![5.0]);
//! ```

pub mod accumulator;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod parallel;
pub mod select;
pub mod utils;

use log::debug;

// Re-export primary components
pub use accumulator::{create_accumulator, multiply_row, Accumulator};
pub use error::{Result, TopNError};
pub use matrix::{reference_spgemm, reference_top_n, CsrView, OutputBuilder, Scalar, SparseMatrixCSR};
pub use matrix::config::{AccumulatorKind, SystemParameters, TopNConfig};
pub use parallel::{multiply_top_n_parallel, partition_rows};
pub use select::TopNSelector;
pub use utils::{from_sprs_csr, to_sprs_csr, view_sprs_csr};

/// A pruned product together with selection statistics
#[derive(Debug, Clone, PartialEq)]
pub struct TopNProduct<T> {
    /// The pruned product
    pub matrix: SparseMatrixCSR<T>,

    /// Largest number of entries any row had at or above the lower bound,
    /// counted before the N cap. A value above N means some row was cut.
    pub best_ntop: usize,
}

/// Multiplies A by B keeping the `n` largest entries `>= lower_bound` of every
/// row, on the calling thread
///
/// Each result row lists its entries by descending value with ties broken by
/// ascending column index. Exact zeros are never emitted. Pass the type's
/// minimum (e.g. `f64::MIN`) as `lower_bound` to disable the threshold.
///
/// # Errors
///
/// - [`TopNError::InvalidParameter`] if `n` is zero
/// - [`TopNError::DimensionMismatch`] if A's column count differs from B's
///   row count
/// - [`TopNError::Capacity`] if output storage cannot grow
///
/// # Panics
///
/// Column indices are not range-checked: an A column index `>= b.n_rows()` or
/// a B column index `>= b.n_cols()` panics inside the row loop. Run
/// [`CsrView::validate_indices`] first on operands that are not trusted.
///
/// # Examples
///
/// ```
/// use sparse_topn::{multiply_top_n, SparseMatrixCSR};
///
/// let a = SparseMatrixCSR::<f64>::identity(2);
/// let b = SparseMatrixCSR::from_dense(2, 3, &[1.0, 4.0, 4.0, 0.0, 2.0, 0.5]);
///
/// let c = multiply_top_n(&a.view(), &b.view(), 2, 1.0).unwrap();
///
/// assert_eq!(c.row_ptr, vec![0, 2, 3]);
/// assert_eq!(c.col_idx, vec![1, 2, 1]);
/// assert_eq!(c.values, vec![4.0, 4.0, 2.0]);
/// ```
pub fn multiply_top_n<T: Scalar>(
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
) -> Result<SparseMatrixCSR<T>> {
    let config = TopNConfig::default().with_threads(1);
    multiply_top_n_with_config(a, b, n, lower_bound, &config).map(|p| p.matrix)
}

/// Full-control entry point: worker count and tuning come from `config`
///
/// One configured thread runs on the caller's thread; more start a worker
/// pool of `min(n_threads, a.n_rows())` threads. The output is identical
/// either way.
pub fn multiply_top_n_with_config<T: Scalar>(
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
    config: &TopNConfig,
) -> Result<TopNProduct<T>> {
    if n == 0 {
        return Err(TopNError::invalid_parameter("n", "must be at least 1"));
    }
    let n_threads = config.system_params.n_threads;
    if n_threads == 0 {
        return Err(TopNError::invalid_parameter("n_threads", "must be at least 1"));
    }
    if a.n_cols() != b.n_rows() {
        return Err(TopNError::DimensionMismatch {
            m1: a.n_rows(),
            n1: a.n_cols(),
            m2: b.n_rows(),
            n2: b.n_cols(),
        });
    }

    debug!(
        "top-{} product of {}×{} by {}×{} ({} threads, {:?} accumulator)",
        n,
        a.n_rows(),
        a.n_cols(),
        b.n_rows(),
        b.n_cols(),
        n_threads,
        config.accumulator_kind(b.n_cols())
    );

    parallel::coordinate(a, b, n, lower_bound, config, n_threads)
}

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_n() {
        let a = SparseMatrixCSR::<f64>::identity(2);
        let err = multiply_top_n(&a.view(), &a.view(), 0, 0.0).unwrap_err();
        assert!(matches!(err, TopNError::InvalidParameter { name: "n", .. }));
    }

    #[test]
    fn test_rejects_zero_threads() {
        let a = SparseMatrixCSR::<f64>::identity(2);
        let err = multiply_top_n_parallel(&a.view(), &a.view(), 1, 0.0, 0).unwrap_err();
        assert!(matches!(err, TopNError::InvalidParameter { name: "num_threads", .. }));
    }

    #[test]
    fn test_rejects_incompatible_shapes() {
        let a = SparseMatrixCSR::<f64>::zeros(2, 3);
        let b = SparseMatrixCSR::<f64>::zeros(2, 3);
        let err = multiply_top_n(&a.view(), &b.view(), 1, 0.0).unwrap_err();
        assert!(matches!(err, TopNError::DimensionMismatch { m1: 2, n1: 3, m2: 2, n2: 3 }));
    }

    #[test]
    fn test_empty_a_gives_empty_result() {
        let a = SparseMatrixCSR::<f64>::zeros(0, 3);
        let b = SparseMatrixCSR::<f64>::identity(3);
        let c = multiply_top_n_parallel(&a.view(), &b.view(), 2, 0.0, 4).unwrap();
        assert_eq!(c.n_rows, 0);
        assert_eq!(c.n_cols, 3);
        assert_eq!(c.row_ptr, vec![0]);
    }

    #[test]
    fn test_best_ntop_reports_uncapped_count() {
        let a = SparseMatrixCSR::from_dense(2, 2, &[1.0, 1.0, 0.0, 1.0]);
        let b = SparseMatrixCSR::from_dense(2, 3, &[1.0, 2.0, 0.0, 0.0, 1.0, 3.0]);
        let config = TopNConfig::default().with_threads(2);

        let product = multiply_top_n_with_config(&a.view(), &b.view(), 1, 0.0, &config).unwrap();

        // Row 0 = [1, 3, 3], row 1 = [0, 1, 3]
        assert_eq!(product.best_ntop, 3);
        assert_eq!(product.matrix.col_idx, vec![1, 2]);
        assert_eq!(product.matrix.values, vec![3.0, 3.0]);
    }
}
