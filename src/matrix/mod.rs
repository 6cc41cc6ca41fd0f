// Matrix data structures and operations

pub mod builder;
pub mod config;
pub mod csr;
pub mod reference;

use num_traits::Num;
use std::ops::AddAssign;

pub use builder::OutputBuilder;
pub use config::{AccumulatorKind, SystemParameters, TopNConfig};
pub use csr::{CsrView, SparseMatrixCSR};
pub use reference::{reference_prune, reference_spgemm, reference_top_n};

/// Element types the kernel can multiply, accumulate, and rank
///
/// Ordering only needs to be partial; NaN scores are a caller error and
/// rank unpredictably.
pub trait Scalar: Copy + Num + AddAssign + PartialOrd + Send + Sync + 'static {}

impl<T> Scalar for T where T: Copy + Num + AddAssign + PartialOrd + Send + Sync + 'static {}
