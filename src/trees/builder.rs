//! Depth-first recursive tree construction.
//!
//! Exact greedy split finding over derived child datasets: each accepted
//! split produces left/right dataset views and matching projections of the
//! gradient and Hessian vectors, then recurses left before right.

use crate::data::Dataset;
use crate::error::Result;
use crate::utils::Parallelism;

use super::node::{MutableTree, NodeId};
use super::split_info::Side;
use super::splitter::{SplitError, SplitFinder};
use super::tree::TreeParams;

pub(crate) struct DepthFirstBuilder<'a, F: SplitFinder> {
    params: &'a TreeParams,
    finder: &'a F,
    shrinkage: f64,
    parallelism: Parallelism,
}

impl<'a, F: SplitFinder> DepthFirstBuilder<'a, F> {
    pub(crate) fn new(
        params: &'a TreeParams,
        finder: &'a F,
        shrinkage: f64,
        parallelism: Parallelism,
    ) -> Self {
        Self {
            params,
            finder,
            shrinkage,
            parallelism,
        }
    }

    /// Grow the subtree rooted at `node` over the given row view.
    ///
    /// `grad` and `hess` are indexed by the dataset's local rows.
    pub(crate) fn grow(
        &self,
        tree: &mut MutableTree,
        node: NodeId,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
        depth: u32,
    ) -> Result<()> {
        let g_sum: f64 = grad.iter().sum();
        let h_sum: f64 = hess.iter().sum();

        if depth >= self.params.max_depth || dataset.n_rows() <= self.params.min_tree_size {
            tree.make_leaf(node, self.params.leaf_weight(g_sum, h_sum, self.shrinkage)?);
            return Ok(());
        }

        let split = match self
            .finder
            .best_split(dataset, grad, hess, self.parallelism)
        {
            Ok(split) => split,
            Err(SplitError::NoSplitPossible) => {
                tree.make_leaf(node, self.params.leaf_weight(g_sum, h_sum, self.shrinkage)?);
                return Ok(());
            }
        };

        // Zero-gain splits leave the objective unchanged and would recurse
        // forever on constant gradients.
        if split.gain() <= 0.0 || split.gain() < self.params.min_split_gain {
            tree.make_leaf(node, self.params.leaf_weight(g_sum, h_sum, self.shrinkage)?);
            return Ok(());
        }

        let (left_id, right_id) = tree.apply_split(
            node,
            split.feature_id() as u32,
            split.threshold(),
            split.gain(),
        );

        let left_set = dataset.subset(&split, Side::Left);
        let left_grad = split.split_vec(grad, Side::Left);
        let left_hess = split.split_vec(hess, Side::Left);
        self.grow(tree, left_id, &left_set, &left_grad, &left_hess, depth + 1)?;
        drop(left_set);

        let right_set = dataset.subset(&split, Side::Right);
        let right_grad = split.split_vec(grad, Side::Right);
        let right_hess = split.split_vec(hess, Side::Right);
        self.grow(tree, right_id, &right_set, &right_grad, &right_hess, depth + 1)?;

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
