use sparse_topn::{multiply_top_n_with_config, Result, SparseMatrixCSR, TopNConfig};

/// L2-normalizes each row so that A·Aᵀ holds cosine similarities
fn normalize_rows(m: &mut SparseMatrixCSR<f64>) {
    for i in 0..m.n_rows {
        let range = m.row_ptr[i]..m.row_ptr[i + 1];
        let norm = m.values[range.clone()].iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut m.values[range] {
                *v /= norm;
            }
        }
    }
}

/// Transposes a CSR matrix through sprs
fn transpose(m: &SparseMatrixCSR<f64>) -> Result<SparseMatrixCSR<f64>> {
    let t = sparse_topn::to_sprs_csr(m)?.transpose_into();
    Ok(sparse_topn::from_sprs_csr(t))
}

fn main() -> Result<()> {
    println!("sparse_topn: sparse products with per-row top-N pruning");

    // Character-trigram counts for a few names
    let names = ["acme corp", "acme corporation", "acme inc", "globex", "globex corp"];
    let trigrams = ["acm", "cme", "cor", "orp", "inc", "glo", "lob", "obe", "bex", "rat", "ion"];
    let counts = [
        1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, //
        1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0,
    ];

    let mut a = SparseMatrixCSR::from_dense(names.len(), trigrams.len(), &counts);
    normalize_rows(&mut a);
    let b = transpose(&a)?;

    let config = TopNConfig::default();
    println!("\nConfiguration:");
    println!("  Threads: {}", config.system_params.n_threads);
    println!("  Dense accumulator threshold: {}", config.dense_accum_threshold);

    let product = multiply_top_n_with_config(&a.view(), &b.view(), 3, 0.3, &config)?;

    println!("\nTop-3 matches with similarity >= 0.3:");
    for (i, name) in names.iter().enumerate() {
        let matches: Vec<String> = product
            .matrix
            .row_iter(i)
            .map(|(j, v)| format!("{} ({:.3})", names[j], v))
            .collect();
        println!("  {:<18} -> {}", name, matches.join(", "));
    }
    println!("\nLargest candidate count in a row: {}", product.best_ntop);
    Ok(())
}
