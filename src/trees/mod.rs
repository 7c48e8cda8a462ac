//! Tree construction and scoring.
//!
//! Split finding is a strategy seam ([`SplitFinder`]) with two
//! implementations: the canonical exact [`GreedySplitter`] and the
//! approximate [`HistogramSplitter`]. Trees grow either depth-first
//! (recursive, over derived child datasets) or breadth-first (SLIQ class
//! list); both produce the same logical tree and store their nodes in a
//! flat arena.

mod builder;
mod class_list;
mod histogram;
mod node;
mod split_info;
mod splitter;
mod tree;

pub use histogram::{Histogram, HistogramSplitter};
pub use node::{Node, NodeId, Tree};
pub use split_info::{Side, SplitInfo};
pub use splitter::{GreedySplitter, SplitError, SplitFinder};
pub use tree::{GrowthStrategy, RegressionTree, TreeParams};
