//! Exact greedy split finding.
//!
//! For each feature, sweep the presorted column once while maintaining
//! running gradient/Hessian sums; every boundary between two distinct
//! feature values is a candidate split. The best candidate over all
//! features becomes the node's split.

use crate::data::Dataset;
use crate::utils::Parallelism;

use super::split_info::SplitInfo;
use super::tree::TreeParams;

// =============================================================================
// SplitFinder
// =============================================================================

/// Failure modes of split finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// The node has too few rows, or no feature offers a usable boundary
    /// (every column constant, or no boundary satisfies the size minimum).
    #[error("no split possible on this node")]
    NoSplitPossible,
}

/// Strategy seam for split finding.
///
/// Exact and histogram-binned finders expose the same [`SplitInfo`] contract
/// so they are interchangeable inside the tree builder. `grad` and `hess`
/// are indexed by the dataset's local row indices.
pub trait SplitFinder: Send + Sync {
    fn best_split(
        &self,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        parallelism: Parallelism,
    ) -> Result<SplitInfo, SplitError>;
}

// =============================================================================
// GreedySplitter
// =============================================================================

/// Best candidate found while sweeping one feature column.
#[derive(Debug, Clone, Copy)]
struct FeatureCandidate {
    gain: f64,
    /// Position (in sorted order) of the last sample on the left.
    last_left: usize,
    threshold: f64,
}

/// Exact best-split search via a cumulative-sum scan over sorted columns.
#[derive(Debug, Clone)]
pub struct GreedySplitter {
    params: TreeParams,
}

impl GreedySplitter {
    pub fn new(params: TreeParams) -> Self {
        Self { params }
    }

    /// Sweep one feature and return its best boundary, if any.
    ///
    /// Candidates exist only between distinct consecutive values (a boundary
    /// inside a run of equal values cannot realize the `< t` / `>= t`
    /// partition) and when both sides meet the size minimum. The first
    /// position attaining the maximum gain wins.
    fn scan_feature(
        &self,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        feature: usize,
        g_total: f64,
        h_total: f64,
    ) -> Option<FeatureCandidate> {
        let order = dataset.sorted_column(feature);
        let n = order.len();
        let min_size = self.params.min_tree_size;

        let mut g_left = 0.0;
        let mut h_left = 0.0;
        let mut best: Option<FeatureCandidate> = None;

        for pos in 0..n - 1 {
            let row = order[pos] as usize;
            g_left += grad[row];
            h_left += hess[row];

            let value = dataset.value(row, feature);
            let next_value = dataset.value(order[pos + 1] as usize, feature);
            if next_value <= value {
                continue;
            }

            let n_left = pos + 1;
            let n_right = n - n_left;
            if n_left < min_size || n_right < min_size {
                continue;
            }

            let gain = self.params.split_gain(
                g_left,
                h_left,
                g_total - g_left,
                h_total - h_left,
                g_total,
                h_total,
            );
            if best.map_or(true, |b| gain > b.gain) {
                best = Some(FeatureCandidate {
                    gain,
                    last_left: pos,
                    threshold: next_value,
                });
            }
        }

        best
    }
}

impl SplitFinder for GreedySplitter {
    fn best_split(
        &self,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        parallelism: Parallelism,
    ) -> Result<SplitInfo, SplitError> {
        let n = dataset.n_rows();
        debug_assert_eq!(grad.len(), n);
        debug_assert_eq!(hess.len(), n);
        if n <= 1 {
            return Err(SplitError::NoSplitPossible);
        }

        let g_total: f64 = grad.iter().sum();
        let h_total: f64 = hess.iter().sum();

        // Features are scanned independently; the reduction stays sequential
        // so ties break by the smallest feature index.
        let per_feature = parallelism.maybe_par_map(0..dataset.n_features(), |j| {
            self.scan_feature(dataset, grad, hess, j, g_total, h_total)
        });

        let mut best: Option<(usize, FeatureCandidate)> = None;
        for (feature, candidate) in per_feature.into_iter().enumerate() {
            if let Some(c) = candidate {
                if best.as_ref().map_or(true, |(_, b)| c.gain > b.gain) {
                    best = Some((feature, c));
                }
            }
        }

        let (feature, c) = best.ok_or(SplitError::NoSplitPossible)?;
        let order = dataset.sorted_column(feature);
        let left = order[..=c.last_left].to_vec();
        let right = order[c.last_left + 1..].to_vec();

        Ok(SplitInfo::new(feature, c.threshold, c.gain, left, right))
    }
}

// =============================================================================
// Tests
// =============================================================================
