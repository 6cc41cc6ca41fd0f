//! Growable CSR output storage
//!
//! The number of entries a product will keep is unknown until every row has
//! been selected, so entries go into buffers that grow geometrically. Length
//! and capacity are tracked separately and growth only happens in
//! [`OutputBuilder::reserve_for`], never as a side effect of a push.

use log::trace;
use num_traits::Num;

use crate::error::{Result, TopNError};
use crate::matrix::SparseMatrixCSR;

/// Accumulates result rows in increasing row order
#[derive(Debug)]
pub struct OutputBuilder<T> {
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
    capacity: usize,
}

impl<T> OutputBuilder<T>
where
    T: Copy + Num,
{
    /// Creates a builder expecting `n_rows` rows and reserving room for
    /// `initial_capacity` entries
    pub fn with_capacity(n_rows: usize, initial_capacity: usize) -> Result<Self> {
        let mut builder = Self {
            row_ptr: Vec::new(),
            col_idx: Vec::new(),
            values: Vec::new(),
            capacity: 0,
        };
        builder
            .row_ptr
            .try_reserve_exact(n_rows + 1)
            .map_err(|source| TopNError::Capacity {
                requested: n_rows + 1,
                source,
            })?;
        builder.row_ptr.push(0);
        builder.grow_to(initial_capacity)?;
        Ok(builder)
    }

    /// Number of finalized rows
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of entries written so far
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Entries that fit without growing
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Makes room for `additional` more entries, doubling as needed
    pub fn reserve_for(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .nnz()
            .checked_add(additional)
            .ok_or_else(|| TopNError::Capacity {
                requested: usize::MAX,
                source: overflow_error(),
            })?;
        if needed <= self.capacity {
            return Ok(());
        }
        let target = needed.max(self.capacity.saturating_mul(2));
        trace!("growing output storage from {} to {} entries", self.capacity, target);
        self.grow_to(target)
    }

    fn grow_to(&mut self, target: usize) -> Result<()> {
        let additional = target.saturating_sub(self.col_idx.len());
        let capacity_error = |source| TopNError::Capacity {
            requested: target,
            source,
        };
        self.col_idx
            .try_reserve_exact(additional)
            .map_err(capacity_error)?;
        self.values
            .try_reserve_exact(additional)
            .map_err(capacity_error)?;
        self.capacity = self.capacity.max(target);
        Ok(())
    }

    /// Finalizes the next row from its selected `(column, value)` entries
    pub fn push_row(&mut self, entries: &[(usize, T)]) -> Result<()> {
        self.reserve_for(entries.len())?;
        for &(col, val) in entries {
            self.col_idx.push(col);
            self.values.push(val);
        }
        self.row_ptr.push(self.col_idx.len());
        Ok(())
    }

    /// Appends every row of `part` after the rows already written, shifting
    /// its row pointers by the current entry count
    pub fn append(&mut self, part: OutputBuilder<T>) -> Result<()> {
        let offset = self.nnz();
        self.reserve_for(part.nnz())?;
        self.row_ptr
            .try_reserve_exact(part.n_rows())
            .map_err(|source| TopNError::Capacity {
                requested: self.row_ptr.len() + part.n_rows(),
                source,
            })?;
        self.row_ptr
            .extend(part.row_ptr[1..].iter().map(|&p| p + offset));
        self.col_idx.extend_from_slice(&part.col_idx);
        self.values.extend_from_slice(&part.values);
        Ok(())
    }

    /// Hands the buffers over as a matrix with `n_cols` columns
    pub fn finish(self, n_cols: usize) -> SparseMatrixCSR<T> {
        SparseMatrixCSR {
            n_rows: self.row_ptr.len() - 1,
            n_cols,
            row_ptr: self.row_ptr,
            col_idx: self.col_idx,
            values: self.values,
        }
    }
}

// `TryReserveError` has no public constructor; an impossible reservation
// produces the capacity-overflow variant.
fn overflow_error() -> std::collections::TryReserveError {
    match Vec::<u8>::new().try_reserve_exact(usize::MAX) {
        Err(e) => e,
        Ok(()) => unreachable!("reserving usize::MAX bytes cannot succeed"),
    }
}
