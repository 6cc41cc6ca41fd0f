//! Utilities for converting between our matrix formats and sprs

use crate::error::{Result, TopNError};
use crate::matrix::{CsrView, SparseMatrixCSR};
use num_traits::Num;
use sprs::CsMat;

/// Converts our CSR matrix format to sprs CsMat format
///
/// sprs keeps rows sorted by column, so the score ordering of top-N rows is
/// not preserved.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> Result<CsMat<T>>
where
    T: Copy + Num + Default,
{
    CsMat::new_from_unsorted(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
    .map_err(|(_, _, _, e)| TopNError::invalid_shape(e.to_string()))
}

/// Converts sprs CsMat in CSR format to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}

/// Borrows a CSR-stored sprs matrix as a kernel operand without copying
pub fn view_sprs_csr<T>(matrix: &CsMat<T>) -> Result<CsrView<'_, T>> {
    if !matrix.is_csr() {
        return Err(TopNError::invalid_shape("sprs matrix is not stored as CSR"));
    }
    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.view().into_raw_storage();
    CsrView::new(n_rows, n_cols, indptr, indices, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprs_round_trip_sorts_rows() {
        // Row 0 stored by score, columns out of order
        let m = SparseMatrixCSR::new(2, 3, vec![0, 2, 3], vec![2, 0, 1], vec![5.0, 1.0, 2.0]);

        let sprs_m = to_sprs_csr(&m).unwrap();
        assert_eq!(sprs_m.nnz(), 3);
        assert_eq!(sprs_m.get(0, 2), Some(&5.0));

        let back = from_sprs_csr(sprs_m);
        assert_eq!(back.col_idx, vec![0, 2, 1]);
        assert_eq!(back.values, vec![1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_view_sprs_csr() {
        let sprs_m: CsMat<f64> = CsMat::new((2, 2), vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0]);
        let view = view_sprs_csr(&sprs_m).unwrap();
        assert_eq!(view.n_rows(), 2);
        assert_eq!(view.row_iter(1).collect::<Vec<_>>(), vec![(0, &4.0)]);
    }

    #[test]
    fn test_view_rejects_csc() {
        let csc: CsMat<f64> = CsMat::new_csc((2, 2), vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0]);
        assert!(view_sprs_csr(&csc).is_err());
    }
}
