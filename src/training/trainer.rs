//! GBT: the boosting outer loop.
//!
//! Each round recomputes the ensemble's predictions on the training set,
//! derives gradient and Hessian vectors from them, grows one tree, applies
//! the geometric shrinkage decay, and tracks train/validation loss for
//! early stopping.

use std::collections::HashMap;
use std::time::Instant;

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::metrics::{Metric, MetricFn};
use crate::trees::{GreedySplitter, GrowthStrategy, HistogramSplitter, RegressionTree};
use crate::utils::Parallelism;

use super::callback::{EarlyStopAction, EarlyStopping};
use super::logger::{TrainingLogger, Verbosity};
use super::params::GBTParams;

// =============================================================================
// GBT
// =============================================================================

/// Gradient boosted trees model.
///
/// Trees are appended in strict iteration order; a prediction over the first
/// `k` trees recovers the model as it stood after round `k - 1`, so
/// `predict(x, best_iteration() + 1)` is the model at its best validation
/// point.
#[derive(Debug, Clone)]
pub struct GBT {
    params: GBTParams,
    growth: GrowthStrategy,
    verbosity: Verbosity,
    parallelism: Parallelism,
    trees: Vec<RegressionTree>,
    best_iteration: usize,
    n_features: Option<usize>,
}

impl GBT {
    /// Create an untrained model from validated hyperparameters.
    pub fn new(params: GBTParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            growth: GrowthStrategy::default(),
            verbosity: Verbosity::default(),
            parallelism: Parallelism::default(),
            trees: Vec::new(),
            best_iteration: 0,
            n_features: None,
        })
    }

    /// Create a model from the flat configuration map of the embedding API.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        Self::new(GBTParams::from_map(map)?)
    }

    /// Select the tree construction order.
    pub fn with_growth_strategy(mut self, growth: GrowthStrategy) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train for up to `num_boost_round` iterations.
    ///
    /// Stops early when the validation loss has not improved for
    /// `early_stopping_rounds` consecutive rounds (0 disables early
    /// stopping). On error, the model keeps the trees built so far and
    /// `best_iteration` stays at its last update.
    pub fn train(
        &mut self,
        train_set: &Dataset,
        valid_set: &Dataset,
        num_boost_round: usize,
        early_stopping_rounds: usize,
    ) -> Result<()> {
        if train_set.n_rows() < 2 {
            return Err(Error::DegenerateDataset {
                n_rows: train_set.n_rows(),
            });
        }
        if valid_set.n_features() != train_set.n_features() {
            return Err(Error::invalid_shape(format!(
                "train has {} features but valid has {}",
                train_set.n_features(),
                valid_set.n_features()
            )));
        }

        self.trees.clear();
        self.best_iteration = 0;
        self.n_features = Some(train_set.n_features());

        let y_train = train_set.y_projected();
        let y_valid = valid_set.y_projected();
        let metric = self.params.metric;

        let logger = TrainingLogger::new(self.verbosity);
        logger.start_training(num_boost_round, metric.name());

        let mut early_stopping = EarlyStopping::new(early_stopping_rounds);
        let mut shrinkage = self.params.shrinkage_rate;

        for round in 0..num_boost_round {
            let started = Instant::now();

            // Gradient and Hessian at the current ensemble predictions.
            let preds = self.predict_dataset(train_set);
            let grad = metric.gradients(&preds, &y_train)?;
            let hess = metric.hessian(&preds);

            let tree = self.build_tree(train_set, &grad, &hess, shrinkage)?;
            self.trees.push(tree);
            shrinkage *= self.params.learning_rate;

            // Rescore with the new tree included.
            let train_preds = self.predict_dataset(train_set);
            let train_loss = metric.loss(&train_preds, &y_train)?;
            let valid_preds = self.predict_dataset(valid_set);
            let valid_loss = metric.loss(&valid_preds, &y_valid)?;

            logger.log_round(round, train_loss, valid_loss, started.elapsed());

            match early_stopping.update(valid_loss) {
                EarlyStopAction::Improved => self.best_iteration = round,
                EarlyStopAction::Continue => {}
                EarlyStopAction::Stop => {
                    logger.log_early_stop(
                        round,
                        early_stopping.best_round(),
                        early_stopping.best_value().unwrap_or(f64::NAN),
                    );
                    break;
                }
            }
        }

        logger.finish_training(self.trees.len(), self.best_iteration);
        Ok(())
    }

    fn build_tree(
        &self,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        shrinkage: f64,
    ) -> Result<RegressionTree> {
        let tree_params = self.params.tree_params();
        match self.params.max_bin {
            Some(n_bins) => {
                let finder = HistogramSplitter::new(tree_params, n_bins);
                RegressionTree::build(
                    tree_params,
                    dataset,
                    grad,
                    hess,
                    shrinkage,
                    self.growth,
                    &finder,
                    self.parallelism,
                )
            }
            None => {
                let finder = GreedySplitter::new(tree_params);
                RegressionTree::build(
                    tree_params,
                    dataset,
                    grad,
                    hess,
                    shrinkage,
                    self.growth,
                    &finder,
                    self.parallelism,
                )
            }
        }
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict one sample from the first `num_iterations` trees.
    ///
    /// `num_iterations = 0` means "all trees". Fails with
    /// [`Error::InvalidShape`] when `x` does not have one value per feature
    /// of the training matrix.
    pub fn predict(&self, x: &[f64], num_iterations: usize) -> Result<f64> {
        if let Some(n_features) = self.n_features {
            if x.len() != n_features {
                return Err(Error::invalid_shape(format!(
                    "sample has {} values but the model was trained on {} features",
                    x.len(),
                    n_features
                )));
            }
        }
        Ok(self
            .params
            .metric
            .score_to_prediction(self.sum_score(x, num_iterations)))
    }

    /// Sum of raw tree scores over the first `num_iterations` trees.
    pub fn sum_score(&self, x: &[f64], num_iterations: usize) -> f64 {
        let limit = if num_iterations == 0 {
            self.trees.len()
        } else {
            num_iterations.min(self.trees.len())
        };
        self.trees[..limit].iter().map(|tree| tree.score(x)).sum()
    }

    /// Transformed predictions for every row of a dataset, using all trees.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Vec<f64> {
        let n_features = dataset.n_features();
        self.parallelism.maybe_par_map(0..dataset.n_rows(), |row| {
            let mut x = vec![0.0; n_features];
            dataset.copy_row(row, &mut x);
            self.params
                .metric
                .score_to_prediction(self.sum_score(&x, 0))
        })
    }

    // =========================================================================
    // Parameter readback
    // =========================================================================

    /// Iteration with the lowest validation loss observed during training.
    #[inline]
    pub fn best_iteration(&self) -> usize {
        self.best_iteration
    }

    /// Number of trees in the ensemble.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Tree at a given boosting iteration.
    #[inline]
    pub fn tree(&self, iteration: usize) -> &RegressionTree {
        &self.trees[iteration]
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.params.max_depth
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.params.learning_rate
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.params.lambda
    }

    #[inline]
    pub fn gamma(&self) -> f64 {
        self.params.gamma
    }

    #[inline]
    pub fn min_split_gain(&self) -> f64 {
        self.params.min_split_gain
    }

    #[inline]
    pub fn shrinkage_rate(&self) -> f64 {
        self.params.shrinkage_rate
    }

    #[inline]
    pub fn max_bin(&self) -> Option<usize> {
        self.params.max_bin
    }

    #[inline]
    pub fn metric(&self) -> Metric {
        self.params.metric
    }
}

// =============================================================================
// Tests
// =============================================================================
