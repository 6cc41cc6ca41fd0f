//! Compressed Sparse Row (CSR) matrix format implementation
//!
//! Two flavours live here:
//! - [`CsrView`] borrows three caller-owned arrays and is what the kernel reads
//! - [`SparseMatrixCSR`] owns its arrays and is what the kernel returns

use ndarray::Array2;
use num_traits::Num;
use std::fmt;
use std::ops::Range;

use crate::error::{Result, TopNError};

/// Checks the invariants that can be verified without scanning every entry
fn check_structure(
    n_rows: usize,
    row_ptr: &[usize],
    col_idx_len: usize,
    values_len: usize,
) -> Result<()> {
    if row_ptr.len() != n_rows + 1 {
        return Err(TopNError::invalid_shape(format!(
            "row_ptr has length {} for {} rows (expected {})",
            row_ptr.len(),
            n_rows,
            n_rows + 1
        )));
    }
    if row_ptr[0] != 0 {
        return Err(TopNError::invalid_shape(format!(
            "row_ptr[0] is {}, expected 0",
            row_ptr[0]
        )));
    }
    if let Some(idx) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
        return Err(TopNError::invalid_shape(format!(
            "row_ptr decreases at index {}: {} > {}",
            idx,
            row_ptr[idx],
            row_ptr[idx + 1]
        )));
    }
    if col_idx_len != values_len {
        return Err(TopNError::invalid_shape(format!(
            "{} column indices but {} values",
            col_idx_len, values_len
        )));
    }
    if row_ptr[n_rows] > col_idx_len {
        return Err(TopNError::invalid_shape(format!(
            "row_ptr[{}] = {} exceeds the {} stored entries",
            n_rows, row_ptr[n_rows], col_idx_len
        )));
    }
    Ok(())
}

/// A read-only view over a CSR matrix whose arrays belong to the caller
///
/// Construction checks only cheap invariants (row pointer length, origin and
/// monotonicity). Column bounds and per-row uniqueness are the caller's
/// responsibility; [`CsrView::validate_indices`] checks them on request.
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a, T> {
    n_rows: usize,
    n_cols: usize,
    row_ptr: &'a [usize],
    col_idx: &'a [usize],
    values: &'a [T],
}

impl<'a, T> CsrView<'a, T> {
    /// Creates a view over caller-owned CSR arrays
    ///
    /// # Errors
    ///
    /// Returns [`TopNError::InvalidShape`] if `row_ptr` does not have
    /// `n_rows + 1` entries, does not start at zero, decreases anywhere, or
    /// points past the end of `col_idx`, or if `col_idx` and `values` differ
    /// in length.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: &'a [usize],
        col_idx: &'a [usize],
        values: &'a [T],
    ) -> Result<Self> {
        check_structure(n_rows, row_ptr, col_idx.len(), values.len())?;
        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.row_ptr[self.n_rows]
    }

    /// Half-open range of row `i` inside [`Self::col_idx`] and [`Self::values`]
    #[inline]
    pub fn row_range(&self, i: usize) -> Range<usize> {
        self.row_ptr[i]..self.row_ptr[i + 1]
    }

    pub fn row_ptr(&self) -> &'a [usize] {
        self.row_ptr
    }

    pub fn col_idx(&self) -> &'a [usize] {
        self.col_idx
    }

    pub fn values(&self) -> &'a [T] {
        self.values
    }

    /// Returns an iterator over the stored `(column, value)` pairs of row `i`
    #[inline]
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let range = self.row_range(i);
        let (col_idx, values) = (self.col_idx, self.values);
        col_idx[range.clone()].iter().copied().zip(&values[range])
    }

    /// Full scan for out-of-bounds and repeated column indices
    ///
    /// The product kernel never calls this; duplicated columns are summed
    /// there like any other contribution.
    pub fn validate_indices(&self) -> Result<()> {
        let mut last_seen = vec![usize::MAX; self.n_cols];
        for i in 0..self.n_rows {
            for idx in self.row_range(i) {
                let col = self.col_idx[idx];
                if col >= self.n_cols {
                    return Err(TopNError::invalid_shape(format!(
                        "column index {} in row {} out of bounds (n_cols = {})",
                        col, i, self.n_cols
                    )));
                }
                if last_seen[col] == i {
                    return Err(TopNError::invalid_shape(format!(
                        "duplicate column index {} in row {}",
                        col, i
                    )));
                }
                last_seen[col] = i;
            }
        }
        Ok(())
    }
}

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Matrices produced by the top-N kernel keep each row ordered by descending
/// value rather than by column.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    /// - every column index must be below n_cols
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(
            row_ptr[n_rows],
            col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );

        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Fallible counterpart of [`SparseMatrixCSR::new`] for untrusted input
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        check_structure(n_rows, &row_ptr, col_idx.len(), values.len())?;
        if row_ptr[n_rows] != col_idx.len() {
            return Err(TopNError::invalid_shape(format!(
                "row_ptr[{}] = {} but {} entries are stored",
                n_rows,
                row_ptr[n_rows],
                col_idx.len()
            )));
        }
        let matrix = Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        };
        matrix.view().validate_indices()?;
        Ok(matrix)
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Borrows the matrix as a kernel operand
    pub fn view(&self) -> CsrView<'_, T> {
        CsrView {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr: &self.row_ptr,
            col_idx: &self.col_idx,
            values: &self.values,
        }
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Number of stored entries in row i
    pub fn row_nnz(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Builds a CSR matrix from a row-major dense slice, skipping zeros
    pub fn from_dense(n_rows: usize, n_cols: usize, dense: &[T]) -> Self {
        assert_eq!(dense.len(), n_rows * n_cols, "dense.len() must be n_rows * n_cols");

        let mut row_ptr = Vec::with_capacity(n_rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);

        for row in dense.chunks(n_cols.max(1)).take(n_rows) {
            for (j, &v) in row.iter().enumerate() {
                if !v.is_zero() {
                    col_idx.push(j);
                    values.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }
        // n_cols == 0 yields no chunks
        row_ptr.resize(n_rows + 1, 0);

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Expands into a dense `ndarray` matrix, summing repeated columns
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for i in 0..self.n_rows {
            for (j, &v) in self.row_iter(i) {
                dense[[i, j]] = dense[[i, j]] + v;
            }
        }
        dense
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.values.len())?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
