//! Reference implementations used for correctness testing
//!
//! These compute the full, unpruned product with a hashmap accumulator and
//! then apply top-N selection by sorting whole rows. They share no code with
//! the kernel's accumulators or bounded selector.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Result, TopNError};
use crate::matrix::{CsrView, Scalar, SparseMatrixCSR};

/// Performs sparse matrix multiplication using a simple algorithm as a reference implementation
///
/// Rows of the result are sorted by column and exclude exact zeros.
pub fn reference_spgemm<T: Scalar>(a: &CsrView<'_, T>, b: &CsrView<'_, T>) -> Result<SparseMatrixCSR<T>> {
    if a.n_cols() != b.n_rows() {
        return Err(TopNError::DimensionMismatch {
            m1: a.n_rows(),
            n1: a.n_cols(),
            m2: b.n_rows(),
            n2: b.n_cols(),
        });
    }

    let n_rows = a.n_rows();
    let mut row_ptr = Vec::with_capacity(n_rows + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..n_rows {
        let mut accum: HashMap<usize, T> = HashMap::new();

        for (k, &a_val) in a.row_iter(i) {
            for (j, &b_val) in b.row_iter(k) {
                *accum.entry(j).or_insert_with(T::zero) += a_val * b_val;
            }
        }

        let mut row_entries: Vec<_> = accum.into_iter().collect();
        row_entries.sort_by_key(|&(col, _)| col);

        for (j, val) in row_entries {
            if !val.is_zero() {
                col_idx.push(j);
                values.push(val);
            }
        }

        row_ptr.push(col_idx.len());
    }

    Ok(SparseMatrixCSR {
        n_rows,
        n_cols: b.n_cols(),
        row_ptr,
        col_idx,
        values,
    })
}

/// Keeps the `n` largest entries at or above `lower_bound` in every row of
/// `full`, ordered by descending value then ascending column
pub fn reference_prune<T: Scalar>(full: &SparseMatrixCSR<T>, n: usize, lower_bound: T) -> SparseMatrixCSR<T> {
    let mut row_ptr = Vec::with_capacity(full.n_rows + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..full.n_rows {
        let mut row: Vec<(usize, T)> = full
            .row_iter(i)
            .filter(|&(_, &v)| !v.is_zero() && v >= lower_bound)
            .map(|(j, &v)| (j, v))
            .collect();
        row.sort_by(|x, y| {
            y.1.partial_cmp(&x.1)
                .unwrap_or(Ordering::Equal)
                .then(x.0.cmp(&y.0))
        });
        row.truncate(n);

        for (j, v) in row {
            col_idx.push(j);
            values.push(v);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR {
        n_rows: full.n_rows,
        n_cols: full.n_cols,
        row_ptr,
        col_idx,
        values,
    }
}

/// Unpruned product followed by whole-row sorting and truncation
pub fn reference_top_n<T: Scalar>(
    a: &CsrView<'_, T>,
    b: &CsrView<'_, T>,
    n: usize,
    lower_bound: T,
) -> Result<SparseMatrixCSR<T>> {
    let full = reference_spgemm(a, b)?;
    Ok(reference_prune(&full, n, lower_bound))
}
