//! Data handling: dense matrix storage and the training dataset view.
//!
//! The design matrix is stored column-major ([`ColMatrix`]) because split
//! finding scans whole feature columns. [`Dataset`] pairs the matrix with a
//! target vector and precomputes, per feature, the permutation that sorts
//! samples by that feature's value.

mod dataset;
mod matrix;

pub use dataset::Dataset;
pub use matrix::ColMatrix;
