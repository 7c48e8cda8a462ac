//! Training infrastructure: the boosting loop and its collaborators.
//!
//! - [`GBT`]: the model; orchestrates gradient recomputation, tree growth,
//!   shrinkage decay, and validation tracking
//! - [`GBTParams`]: hyperparameters, including the flat-map embedding parser
//! - [`EarlyStopping`]: stops training when the validation loss plateaus
//! - [`TrainingLogger`], [`Verbosity`]: console progress reporting

mod callback;
mod logger;
mod params;
mod trainer;

pub use callback::{EarlyStopAction, EarlyStopping};
pub use logger::{TrainingLogger, Verbosity};
pub use params::GBTParams;
pub use trainer::GBT;
