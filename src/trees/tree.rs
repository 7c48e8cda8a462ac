//! Tree facade: hyperparameters, gain arithmetic, and build dispatch.

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::utils::Parallelism;

use super::builder::DepthFirstBuilder;
use super::class_list::BreadthFirstBuilder;
use super::node::{MutableTree, Node, NodeId, Tree};
use super::splitter::SplitFinder;

// =============================================================================
// TreeParams
// =============================================================================

/// Regularisation and structural constraints for one tree.
///
/// Captured at construction so rebuilding is deterministic from
/// hyperparameters alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// L2 regularisation on leaf weights.
    pub lambda: f64,
    /// Reserved complexity penalty; accepted but not applied to gain.
    pub gamma: f64,
    /// Minimum gain required to accept a split.
    pub min_split_gain: f64,
    /// A node with this many rows or fewer becomes a leaf, and no accepted
    /// split may create a smaller child.
    pub min_tree_size: usize,
    /// Maximum node depth (root is depth 0).
    pub max_depth: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            gamma: 0.0,
            min_split_gain: 0.0,
            min_tree_size: 1,
            max_depth: 5,
        }
    }
}

impl TreeParams {
    /// Regularised objective value `G^2 / (H + lambda)`.
    ///
    /// A non-positive denominator yields 0 so that degenerate candidates
    /// never poison the argmax with NaN.
    #[inline]
    pub(crate) fn objective(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.lambda;
        if denom <= 0.0 {
            0.0
        } else {
            g * g / denom
        }
    }

    /// Gain of replacing a parent with the proposed children:
    /// `obj(G_l, H_l) + obj(G_r, H_r) - obj(G_p, H_p)`.
    #[inline]
    pub(crate) fn split_gain(
        &self,
        g_left: f64,
        h_left: f64,
        g_right: f64,
        h_right: f64,
        g_parent: f64,
        h_parent: f64,
    ) -> f64 {
        self.objective(g_left, h_left) + self.objective(g_right, h_right)
            - self.objective(g_parent, h_parent)
    }

    /// Closed-form optimal leaf weight `-G / (H + lambda)`, shrunk.
    pub(crate) fn leaf_weight(&self, g_sum: f64, h_sum: f64, shrinkage: f64) -> Result<f64> {
        let denom = h_sum + self.lambda;
        if denom <= 0.0 {
            return Err(Error::NumericalInstability {
                hess_sum: h_sum,
                lambda: self.lambda,
            });
        }
        Ok(-g_sum / denom * shrinkage)
    }
}

// =============================================================================
// GrowthStrategy
// =============================================================================

/// How nodes are ordered during tree construction.
///
/// Both strategies produce the same logical tree for the same inputs; they
/// differ in work layout. Depth-first re-sorts each node's row subset and
/// visits only its own rows; breadth-first pays one global column sort
/// up-front and does one scan per feature per depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowthStrategy {
    /// Recursive build over derived child datasets (left before right).
    #[default]
    DepthFirst,
    /// SLIQ-style per-depth build over a per-sample class list.
    BreadthFirst,
}

// =============================================================================
// RegressionTree
// =============================================================================

/// A binary regression tree plus the hyperparameters it was built with.
///
/// Immutable after [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RegressionTree {
    params: TreeParams,
    nodes: Tree,
}

impl RegressionTree {
    /// Grow one tree from a dataset and its gradient/Hessian vectors.
    ///
    /// Leaf weights are multiplied by `shrinkage` as they are written. The
    /// `finder` drives split selection on the depth-first path; the
    /// breadth-first path scans exactly by construction and ignores it.
    pub fn build<F: SplitFinder>(
        params: TreeParams,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        shrinkage: f64,
        strategy: GrowthStrategy,
        finder: &F,
        parallelism: Parallelism,
    ) -> Result<Self> {
        debug_assert_eq!(grad.len(), dataset.n_rows());
        debug_assert_eq!(hess.len(), dataset.n_rows());

        let mut tree = MutableTree::new();
        let root = tree.init_root();

        match strategy {
            GrowthStrategy::DepthFirst => {
                let builder = DepthFirstBuilder::new(&params, finder, shrinkage, parallelism);
                builder.grow(&mut tree, root, dataset, grad, hess, 0)?;
            }
            GrowthStrategy::BreadthFirst => {
                let builder = BreadthFirstBuilder::new(&params, shrinkage);
                builder.build(&mut tree, dataset, grad, hess)?;
            }
        }

        Ok(Self {
            params,
            nodes: tree.freeze(),
        })
    }

    /// Score a single sample.
    #[inline]
    pub fn score(&self, x: &[f64]) -> f64 {
        self.nodes.score(x)
    }

    /// The hyperparameters this tree was built with.
    #[inline]
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.n_nodes()
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.nodes.n_leaves()
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.nodes.depth()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.node(id)
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes.is_leaf(id)
    }

    /// Gain recorded at a node (0 for leaves).
    #[inline]
    pub fn gain(&self, id: NodeId) -> f64 {
        self.nodes.gain(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
