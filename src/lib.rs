//! microboost: a small XGBoost-style gradient boosting library.
//!
//! Fits an additive ensemble of binary regression trees that minimise a
//! twice-differentiable loss (logistic or squared error) via second-order
//! boosting with shrinkage, leaf-weight regularisation, and early stopping.
//!
//! # Key Types
//!
//! - [`GBT`] / [`GBTParams`] - the model, with train/predict
//! - [`Dataset`] / [`ColMatrix`] - design matrix and presorted column views
//! - [`Metric`] - loss selection ([`LogLoss`] or [`Rmse`])
//! - [`GrowthStrategy`] - depth-first or SLIQ breadth-first tree growth
//!
//! # Training
//!
//! ```no_run
//! use microboost::{Dataset, GBT, GBTParams, Metric};
//!
//! let train = Dataset::from_rows(
//!     &[vec![0.0], vec![1.0], vec![2.0], vec![3.0]],
//!     vec![0.0, 0.0, 1.0, 1.0],
//! )?;
//!
//! let mut model = GBT::new(GBTParams {
//!     metric: Metric::logloss(),
//!     shrinkage_rate: 0.5,
//!     ..GBTParams::default()
//! })?;
//! model.train(&train, &train, 20, 5)?;
//!
//! let p = model.predict(&[2.5], 0)?;
//! # Ok::<(), microboost::Error>(())
//! ```

pub mod data;
pub mod error;
pub mod metrics;
pub mod testing;
pub mod training;
pub mod trees;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{ColMatrix, Dataset};
pub use error::{Error, Result};
pub use metrics::{LogLoss, Metric, MetricFn, Rmse};
pub use training::{GBTParams, Verbosity, GBT};
pub use trees::{GrowthStrategy, RegressionTree, SplitInfo};
pub use utils::Parallelism;
