//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_sprs_csr, view_sprs_csr};
