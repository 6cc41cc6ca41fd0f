//! Configuration and system parameters for the top-N product

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of worker threads to use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Row accumulation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorKind {
    /// Dense array over every output column with touched-slot tracking
    Dense,
    /// Unsorted list of products, stable-sorted and merged per row
    Sort,
}

/// Configuration for the top-N product kernel
///
/// None of these settings change the numeric result; they only trade memory
/// for speed. Every worker of one call uses the same accumulator strategy.
#[derive(Debug, Clone)]
pub struct TopNConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Output column count up to which the dense accumulator is used
    pub dense_accum_threshold: usize,

    /// Upper bound on the initial reservation for result entries
    pub max_initial_capacity: usize,
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            dense_accum_threshold: 1 << 16,
            max_initial_capacity: 1 << 20,
        }
    }
}

impl TopNConfig {
    /// Sets the number of worker threads
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.system_params.n_threads = n_threads;
        self
    }

    /// Sets the dense accumulator cut-over
    pub fn with_dense_threshold(mut self, dense_accum_threshold: usize) -> Self {
        self.dense_accum_threshold = dense_accum_threshold;
        self
    }

    /// Sets the cap on the initial output reservation
    pub fn with_max_initial_capacity(mut self, max_initial_capacity: usize) -> Self {
        self.max_initial_capacity = max_initial_capacity;
        self
    }

    /// Accumulator used for an output with `n_cols` columns
    pub fn accumulator_kind(&self, n_cols: usize) -> AccumulatorKind {
        if n_cols <= self.dense_accum_threshold {
            AccumulatorKind::Dense
        } else {
            AccumulatorKind::Sort
        }
    }

    /// Initial entry reservation for `n_rows` rows capped at `n` entries each
    pub fn initial_capacity(&self, n_rows: usize, n: usize) -> usize {
        n_rows.saturating_mul(n).min(self.max_initial_capacity)
    }
}
