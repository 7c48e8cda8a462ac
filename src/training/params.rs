//! Training hyperparameters and the flat-map embedding interface.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::metrics::Metric;
use crate::trees::TreeParams;

// =============================================================================
// GBTParams
// =============================================================================

/// Hyperparameters for boosted training.
///
/// Host runtimes configure the learner through a flat `name -> scalar` map
/// (see [`GBTParams::from_map`]); Rust callers can fill the struct directly.
#[derive(Debug, Clone, PartialEq)]
pub struct GBTParams {
    /// L2 regularisation on leaf weights (`lambda >= 0`).
    pub lambda: f64,
    /// Reserved complexity penalty (`gamma >= 0`); currently unused in gain.
    pub gamma: f64,
    /// Initial per-tree learning rate (`0 < shrinkage_rate <= 1`).
    pub shrinkage_rate: f64,
    /// Gain threshold below which a split is rejected (`>= 0`).
    pub min_split_gain: f64,
    /// Minimum rows per node (`>= 1`).
    pub min_tree_size: usize,
    /// Per-iteration multiplicative decay on the shrinkage, typically 1.0.
    pub learning_rate: f64,
    /// Maximum tree depth (`>= 1`).
    pub max_depth: u32,
    /// Loss function.
    pub metric: Metric,
    /// Bin count for the histogram splitter; `None` selects exact search.
    pub max_bin: Option<usize>,
}

impl Default for GBTParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            gamma: 0.0,
            shrinkage_rate: 0.3,
            min_split_gain: 0.0,
            min_tree_size: 1,
            learning_rate: 1.0,
            max_depth: 5,
            metric: Metric::default(),
            max_bin: None,
        }
    }
}

impl GBTParams {
    /// Parse the flat configuration map.
    ///
    /// Recognised keys: `lambda`, `gamma`, `shrinkage_rate`,
    /// `min_split_gain`, `min_tree_size`, `learning_rate`, `max_depth`,
    /// `metric` (0 = logloss, 1 = rmse), and optional `max_bin`. Every key
    /// except `max_bin` is required.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        let require = |key: &'static str| -> Result<f64> {
            map.get(key).copied().ok_or_else(|| {
                Error::invalid_config(format!("missing required hyperparameter `{}`", key))
            })
        };

        let params = Self {
            lambda: require("lambda")?,
            gamma: require("gamma")?,
            shrinkage_rate: require("shrinkage_rate")?,
            min_split_gain: require("min_split_gain")?,
            min_tree_size: require("min_tree_size")? as usize,
            learning_rate: require("learning_rate")?,
            max_depth: require("max_depth")? as u32,
            metric: Metric::from_code(require("metric")? as i64)?,
            max_bin: map.get("max_bin").map(|&b| b as usize),
        };

        params.validate()?;
        Ok(params)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if !(self.lambda >= 0.0) {
            return Err(Error::invalid_config(format!(
                "lambda must be >= 0, got {}",
                self.lambda
            )));
        }
        if !(self.gamma >= 0.0) {
            return Err(Error::invalid_config(format!(
                "gamma must be >= 0, got {}",
                self.gamma
            )));
        }
        if !(self.shrinkage_rate > 0.0 && self.shrinkage_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "shrinkage_rate must be in (0, 1], got {}",
                self.shrinkage_rate
            )));
        }
        if !(self.min_split_gain >= 0.0) {
            return Err(Error::invalid_config(format!(
                "min_split_gain must be >= 0, got {}",
                self.min_split_gain
            )));
        }
        if self.min_tree_size < 1 {
            return Err(Error::invalid_config(format!(
                "min_tree_size must be >= 1, got {}",
                self.min_tree_size
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.max_depth < 1 {
            return Err(Error::invalid_config(format!(
                "max_depth must be >= 1, got {}",
                self.max_depth
            )));
        }
        if let Some(max_bin) = self.max_bin {
            if max_bin < 2 {
                return Err(Error::invalid_config(format!(
                    "max_bin must be >= 2, got {}",
                    max_bin
                )));
            }
        }
        Ok(())
    }

    /// Project the per-tree subset of the parameters.
    pub(crate) fn tree_params(&self) -> TreeParams {
        TreeParams {
            lambda: self.lambda,
            gamma: self.gamma,
            min_split_gain: self.min_split_gain,
            min_tree_size: self.min_tree_size,
            max_depth: self.max_depth,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<String, f64> {
        [
            ("lambda", 1.0),
            ("gamma", 0.0),
            ("shrinkage_rate", 0.5),
            ("min_split_gain", 0.1),
            ("min_tree_size", 3.0),
            ("learning_rate", 1.0),
            ("max_depth", 4.0),
            ("metric", 0.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn parses_a_complete_map() {
        let params = GBTParams::from_map(&full_map()).unwrap();
        assert_eq!(params.lambda, 1.0);
        assert_eq!(params.min_tree_size, 3);
        assert_eq!(params.max_depth, 4);
        assert_eq!(params.metric, Metric::logloss());
        assert_eq!(params.max_bin, None);
    }

    #[test]
    fn optional_max_bin() {
        let mut map = full_map();
        map.insert("max_bin".to_string(), 64.0);
        let params = GBTParams::from_map(&map).unwrap();
        assert_eq!(params.max_bin, Some(64));
    }

    #[test]
    fn missing_key_is_invalid_config() {
        let mut map = full_map();
        map.remove("lambda");
        let err = GBTParams::from_map(&map).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases: &[(&str, f64)] = &[
            ("lambda", -1.0),
            ("gamma", -0.5),
            ("shrinkage_rate", 0.0),
            ("shrinkage_rate", 1.5),
            ("min_split_gain", -0.1),
            ("min_tree_size", 0.0),
            ("learning_rate", 0.0),
            ("max_depth", 0.0),
            ("metric", 7.0),
            ("max_bin", 1.0),
        ];
        for &(key, value) in cases {
            let mut map = full_map();
            map.insert(key.to_string(), value);
            let err = GBTParams::from_map(&map).unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfig { .. }),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn default_params_validate() {
        GBTParams::default().validate().unwrap();
    }
}
