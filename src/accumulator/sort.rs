//! Sort-based accumulator implementation for SpGEMM
//!
//! Collects products in an unsorted list, then stable-sorts by column and
//! merges runs. Memory is proportional to the row's product count instead of
//! the output width, which suits very wide outputs.

use crate::accumulator::Accumulator;
use crate::matrix::Scalar;

/// Sort-based accumulator for a single row of sparse matrix multiplication
pub struct SortAccumulator<T> {
    /// Intermediate products in arrival order
    entries: Vec<(usize, T)>,
}

impl<T: Scalar> SortAccumulator<T> {
    /// Create a new sort-based accumulator
    ///
    /// # Arguments
    ///
    /// * `initial_capacity` - Initial capacity for the temporary storage
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(initial_capacity),
        }
    }

    fn reset(&mut self) {
        self.entries.clear();
    }

    #[inline]
    fn accumulate(&mut self, col: usize, val: T) {
        self.entries.push((col, val));
    }

    fn drain_into(&mut self, out: &mut Vec<(usize, T)>) {
        // Stable, so each column's products are summed in arrival order
        self.entries.sort_by_key(|&(col, _)| col);

        let mut iter = self.entries.iter().copied();
        if let Some((mut current_col, mut current_val)) = iter.next() {
            for (col, val) in iter {
                if col == current_col {
                    current_val += val;
                } else {
                    if !current_val.is_zero() {
                        out.push((current_col, current_val));
                    }
                    current_col = col;
                    current_val = val;
                }
            }
            if !current_val.is_zero() {
                out.push((current_col, current_val));
            }
        }

        self.reset();
    }
}

impl<T: Scalar> Accumulator<T> for SortAccumulator<T> {
    fn reset(&mut self) {
        SortAccumulator::reset(self)
    }

    fn accumulate(&mut self, col: usize, val: T) {
        SortAccumulator::accumulate(self, col, val)
    }

    fn drain_into(&mut self, out: &mut Vec<(usize, T)>) {
        SortAccumulator::drain_into(self, out)
    }
}
