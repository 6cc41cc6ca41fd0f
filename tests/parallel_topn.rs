//! Tests for the partitioned top-N product on larger inputs

use sparse_topn::{
    multiply_top_n, multiply_top_n_parallel, multiply_top_n_with_config, reference_top_n,
    to_sprs_csr, view_sprs_csr, SparseMatrixCSR, TopNConfig, TopNError,
};

/// Deterministic sparse matrix with roughly `density` fill
fn pseudo_random_matrix(n_rows: usize, n_cols: usize, density: f64, seed: u64) -> SparseMatrixCSR<f64> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    for _ in 0..n_rows {
        for j in 0..n_cols {
            if next() < density {
                col_idx.push(j);
                values.push(next());
            }
        }
        row_ptr.push(col_idx.len());
    }
    SparseMatrixCSR::new(n_rows, n_cols, row_ptr, col_idx, values)
}

#[test]
fn test_equivalence_across_thread_counts() {
    let a = pseudo_random_matrix(200, 150, 0.05, 7);
    let b = pseudo_random_matrix(150, 300, 0.05, 11);

    let sequential = multiply_top_n(&a.view(), &b.view(), 10, 0.01).unwrap();
    for threads in [1, 2, 3, 7, 16, 199, 200, 1000] {
        let parallel = multiply_top_n_parallel(&a.view(), &b.view(), 10, 0.01, threads).unwrap();
        assert_eq!(sequential, parallel, "mismatch with {} threads", threads);
    }
}

#[test]
fn test_parallel_vs_reference() {
    let a = pseudo_random_matrix(60, 40, 0.1, 3);
    let b = pseudo_random_matrix(40, 80, 0.1, 5);

    let expected = reference_top_n(&a.view(), &b.view(), 5, 0.05).unwrap();
    let parallel = multiply_top_n_parallel(&a.view(), &b.view(), 5, 0.05, 4).unwrap();

    assert_eq!(parallel, expected);
}

#[test]
fn test_unpruned_product_matches_sprs() {
    let a = pseudo_random_matrix(30, 20, 0.2, 13);
    let b = pseudo_random_matrix(20, 25, 0.2, 17);

    let c = multiply_top_n_parallel(&a.view(), &b.view(), usize::MAX, f64::MIN, 3).unwrap();

    let sa = to_sprs_csr(&a).unwrap();
    let sb = to_sprs_csr(&b).unwrap();
    let expected = (&sa * &sb).to_dense();
    let actual = c.to_dense();

    assert_eq!(expected.shape(), actual.shape());
    for (x, y) in expected.iter().zip(actual.iter()) {
        assert!((x - y).abs() < 1e-12, "expected {}, got {}", x, y);
    }
}

#[test]
fn test_sprs_operands_are_borrowed_directly() {
    let a = pseudo_random_matrix(25, 15, 0.3, 19);
    let b = pseudo_random_matrix(15, 10, 0.3, 23);
    let sa = to_sprs_csr(&a).unwrap();
    let sb = to_sprs_csr(&b).unwrap();

    let from_sprs = multiply_top_n(&view_sprs_csr(&sa).unwrap(), &view_sprs_csr(&sb).unwrap(), 3, 0.0).unwrap();
    let from_ours = multiply_top_n(&a.view(), &b.view(), 3, 0.0).unwrap();

    assert_eq!(from_sprs, from_ours);
}

#[test]
fn test_small_initial_capacity_grows_to_fit() {
    let a = pseudo_random_matrix(50, 50, 0.2, 29);
    let b = pseudo_random_matrix(50, 50, 0.2, 31);

    let tiny = TopNConfig::default().with_threads(4).with_max_initial_capacity(1);
    let roomy = TopNConfig::default().with_threads(1);

    let grown = multiply_top_n_with_config(&a.view(), &b.view(), 8, 0.0, &tiny).unwrap();
    let reserved = multiply_top_n_with_config(&a.view(), &b.view(), 8, 0.0, &roomy).unwrap();

    assert_eq!(grown, reserved);
    assert!(grown.matrix.nnz() > 50);
}

#[test]
fn test_capacity_failure_aborts_whole_call() {
    let a = pseudo_random_matrix(6, 4, 0.5, 37);
    let b = pseudo_random_matrix(4, 5, 0.5, 41);
    let config = TopNConfig::default()
        .with_threads(3)
        .with_max_initial_capacity(usize::MAX / 2);

    let result = multiply_top_n_with_config(&a.view(), &b.view(), usize::MAX, 0.0, &config);

    assert!(matches!(result, Err(TopNError::Capacity { .. })));
}

#[test]
fn test_capacity_failure_on_calling_thread() {
    let a = pseudo_random_matrix(4, 4, 0.5, 43);
    let b = pseudo_random_matrix(4, 4, 0.5, 47);
    let config = TopNConfig::default()
        .with_threads(1)
        .with_max_initial_capacity(usize::MAX / 2);

    let result = multiply_top_n_with_config(&a.view(), &b.view(), usize::MAX, 0.0, &config);

    assert!(matches!(result, Err(TopNError::Capacity { .. })));
}
