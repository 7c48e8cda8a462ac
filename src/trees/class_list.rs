//! SLIQ-style breadth-first tree construction.
//!
//! Instead of rematerialising per-node row subsets, this path keeps the
//! column sort global and threads a per-sample "current leaf id" vector (the
//! class list) through the build. Every node at depth d is finished before
//! any node at depth d + 1: one pass per depth, one scan per feature, with
//! per-leaf running sums accumulated in global sorted order.
//!
//! For the same inputs and tie-breaks this produces the same tree as the
//! depth-first builder; it trades the per-node column re-sorts for
//! O(max_depth * F * S) scanning work.

use crate::data::Dataset;
use crate::error::Result;

use super::node::{MutableTree, Node, NodeId};
use super::tree::TreeParams;

// =============================================================================
// ClassList
// =============================================================================

/// Per-sample map from sample index to its currently-assigned leaf id.
///
/// All samples start at the root (node 0). After a depth finishes, samples
/// in freshly split leaves are rerouted to the matching child.
#[derive(Debug, Clone)]
pub(crate) struct ClassList {
    node_of: Vec<NodeId>,
}

impl ClassList {
    pub(crate) fn new(n_samples: usize) -> Self {
        Self {
            node_of: vec![0; n_samples],
        }
    }

    #[inline]
    pub(crate) fn node_at(&self, sample: usize) -> NodeId {
        self.node_of[sample]
    }

    #[inline]
    pub(crate) fn update(&mut self, sample: usize, node: NodeId) {
        self.node_of[sample] = node;
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.node_of.len()
    }
}

// =============================================================================
// Per-leaf build state
// =============================================================================

/// Totals for one open leaf, seeded when the leaf is created.
#[derive(Debug, Clone, Copy)]
struct LeafStats {
    g_total: f64,
    h_total: f64,
    size: usize,
}

/// Running sums while scanning one feature, reset per feature pass.
#[derive(Debug, Clone, Copy, Default)]
struct ScanState {
    g_run: f64,
    h_run: f64,
    count: usize,
    last_value: f64,
    started: bool,
}

/// Best candidate recorded for one leaf across all feature passes.
#[derive(Debug, Clone, Copy)]
struct BestSplit {
    gain: f64,
    feature: u32,
    threshold: f64,
    g_left: f64,
    h_left: f64,
    left_count: usize,
}

// =============================================================================
// BreadthFirstBuilder
// =============================================================================

pub(crate) struct BreadthFirstBuilder<'a> {
    params: &'a TreeParams,
    shrinkage: f64,
}

impl<'a> BreadthFirstBuilder<'a> {
    pub(crate) fn new(params: &'a TreeParams, shrinkage: f64) -> Self {
        Self { params, shrinkage }
    }

    /// Build the whole tree into `tree` (root already allocated).
    pub(crate) fn build(
        &self,
        tree: &mut MutableTree,
        dataset: &Dataset,
        grad: &[f64],
        hess: &[f64],
    ) -> Result<()> {
        let n = dataset.n_rows();
        debug_assert_eq!(grad.len(), n);
        debug_assert_eq!(hess.len(), n);
        debug_assert_eq!(tree.n_nodes(), 1);

        let mut class_list = ClassList::new(n);

        // Per-node-id state, kept in lockstep with the tree arena.
        let mut stats: Vec<LeafStats> = vec![LeafStats {
            g_total: grad.iter().sum(),
            h_total: hess.iter().sum(),
            size: n,
        }];
        let mut open: Vec<bool> = vec![false];
        let mut scan: Vec<ScanState> = vec![ScanState::default()];
        let mut best: Vec<Option<BestSplit>> = vec![None];

        let mut active: Vec<NodeId> = vec![0];

        for depth in 0..=self.params.max_depth {
            let splitting_allowed = depth < self.params.max_depth;

            // Freeze leaves that cannot split; the rest get scanned.
            let mut scanning: Vec<NodeId> = Vec::with_capacity(active.len());
            for &leaf in &active {
                let s = stats[leaf as usize];
                if !splitting_allowed || s.size <= self.params.min_tree_size {
                    tree.make_leaf(
                        leaf,
                        self.params.leaf_weight(s.g_total, s.h_total, self.shrinkage)?,
                    );
                } else {
                    open[leaf as usize] = true;
                    best[leaf as usize] = None;
                    scanning.push(leaf);
                }
            }
            if scanning.is_empty() {
                break;
            }

            // One scan per feature over the global sorted order. A candidate
            // boundary at sample i covers exactly the leaf's samples seen
            // strictly before i, so the threshold is i's own value (the
            // first right-side sample) and runs of equal values can never
            // straddle the boundary.
            for feature in 0..dataset.n_features() {
                for &leaf in &scanning {
                    scan[leaf as usize] = ScanState::default();
                }

                for &sample in dataset.sorted_column(feature) {
                    let sample = sample as usize;
                    let leaf = class_list.node_at(sample) as usize;
                    if !open[leaf] {
                        continue;
                    }

                    let value = dataset.value(sample, feature);
                    let leaf_stats = stats[leaf];
                    let state = &mut scan[leaf];

                    if state.started && value > state.last_value {
                        let n_left = state.count;
                        let n_right = leaf_stats.size - n_left;
                        if n_left >= self.params.min_tree_size
                            && n_right >= self.params.min_tree_size
                        {
                            let gain = self.params.split_gain(
                                state.g_run,
                                state.h_run,
                                leaf_stats.g_total - state.g_run,
                                leaf_stats.h_total - state.h_run,
                                leaf_stats.g_total,
                                leaf_stats.h_total,
                            );
                            let current = &mut best[leaf];
                            if gain > 0.0 && current.map_or(true, |b| gain > b.gain) {
                                *current = Some(BestSplit {
                                    gain,
                                    feature: feature as u32,
                                    threshold: value,
                                    g_left: state.g_run,
                                    h_left: state.h_run,
                                    left_count: n_left,
                                });
                            }
                        }
                    }

                    let state = &mut scan[leaf];
                    state.g_run += grad[sample];
                    state.h_run += hess[sample];
                    state.count += 1;
                    state.last_value = value;
                    state.started = true;
                }
            }

            // Split the winners, freeze the rest.
            let mut next_active: Vec<NodeId> = Vec::new();
            for &leaf in &scanning {
                open[leaf as usize] = false;
                let parent = stats[leaf as usize];

                match best[leaf as usize].take() {
                    Some(b) if b.gain >= self.params.min_split_gain => {
                        let (left, right) =
                            tree.apply_split(leaf, b.feature, b.threshold, b.gain);

                        // Seed both children from the recorded left sums.
                        debug_assert_eq!(left as usize, stats.len());
                        stats.push(LeafStats {
                            g_total: b.g_left,
                            h_total: b.h_left,
                            size: b.left_count,
                        });
                        stats.push(LeafStats {
                            g_total: parent.g_total - b.g_left,
                            h_total: parent.h_total - b.h_left,
                            size: parent.size - b.left_count,
                        });
                        for _ in 0..2 {
                            open.push(false);
                            scan.push(ScanState::default());
                            best.push(None);
                        }

                        next_active.push(left);
                        next_active.push(right);
                    }
                    _ => {
                        tree.make_leaf(
                            leaf,
                            self.params
                                .leaf_weight(parent.g_total, parent.h_total, self.shrinkage)?,
                        );
                    }
                }
            }

            if next_active.is_empty() {
                break;
            }

            // Route samples of split leaves down to the matching child.
            for sample in 0..class_list.len() {
                let leaf = class_list.node_at(sample);
                if let Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } = *tree.node(leaf)
                {
                    let child = if dataset.value(sample, feature as usize) < threshold {
                        left
                    } else {
                        right
                    };
                    class_list.update(sample, child);
                }
            }

            active = next_active;
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn column_dataset(values: &[f64]) -> Dataset {
        let rows: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
        Dataset::from_rows(&rows, vec![0.0; values.len()]).unwrap()
    }

    fn grow_tree(
        params: TreeParams,
        ds: &Dataset,
        grad: &[f64],
        hess: &[f64],
        shrinkage: f64,
    ) -> crate::trees::node::Tree {
        let builder = BreadthFirstBuilder::new(&params, shrinkage);
        let mut tree = MutableTree::new();
        tree.init_root();
        builder.build(&mut tree, ds, grad, hess).unwrap();
        tree.freeze()
    }

    #[test]
    fn class_list_starts_at_root() {
        let cl = ClassList::new(4);
        assert_eq!(cl.len(), 4);
        for i in 0..4 {
            assert_eq!(cl.node_at(i), 0);
        }
    }

    #[test]
    fn class_list_updates_assignments() {
        let mut cl = ClassList::new(3);
        cl.update(1, 5);
        assert_eq!(cl.node_at(0), 0);
        assert_eq!(cl.node_at(1), 5);
    }

    #[test]
    fn root_split_matches_exact_scan() {
        let ds = column_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let grad = [-1.0, -1.0, 1.0, 1.0];
        let hess = [1.0; 4];
        let params = TreeParams {
            lambda: 0.0,
            max_depth: 1,
            ..TreeParams::default()
        };

        let tree = grow_tree(params, &ds, &grad, &hess, 1.0);
        assert_eq!(tree.n_nodes(), 3);
        match *tree.node(0) {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(feature, 0);
                assert_abs_diff_eq!(threshold, 3.0, epsilon = 1e-9);
            }
            _ => panic!("expected a split at the root"),
        }
        assert_eq!(tree.gain(0), 4.0);
        assert_abs_diff_eq!(tree.score(&[1.5]), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.score(&[3.5]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn two_depths_isolate_every_sample() {
        let rows = vec![
            vec![1.0, 1.0],
            vec![2.0, 5.0],
            vec![3.0, 1.0],
            vec![4.0, 5.0],
        ];
        let ds = Dataset::from_rows(&rows, vec![0.0; 4]).unwrap();
        let grad = [-3.0, -1.0, 1.0, 3.0];
        let hess = [1.0; 4];
        let params = TreeParams {
            lambda: 0.5,
            max_depth: 2,
            ..TreeParams::default()
        };

        let tree = grow_tree(params, &ds, &grad, &hess, 1.0);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 4);

        // Each sample lands in its own leaf: weight = -g / (h + lambda).
        for (row, &g) in rows.iter().zip(grad.iter()) {
            assert_abs_diff_eq!(tree.score(row), -g / 1.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn constant_gradients_collapse_to_single_leaf() {
        let ds = column_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let grad = [0.0; 4];
        let hess = [2.0; 4];
        let params = TreeParams {
            lambda: 1.0,
            max_depth: 4,
            ..TreeParams::default()
        };

        let tree = grow_tree(params, &ds, &grad, &hess, 1.0);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.score(&[2.0]), 0.0);
    }

    #[test]
    fn min_tree_size_freezes_small_leaves() {
        let ds = column_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let grad = [-2.0, -1.0, 1.0, 2.0];
        let hess = [1.0; 4];
        let params = TreeParams {
            lambda: 1.0,
            min_tree_size: 2,
            max_depth: 5,
            ..TreeParams::default()
        };

        let tree = grow_tree(params, &ds, &grad, &hess, 1.0);
        assert_eq!(tree.n_nodes(), 3);
    }
}
