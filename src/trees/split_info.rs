//! Split candidate description.

// =============================================================================
// Side
// =============================================================================

/// Which side of a binary split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

// =============================================================================
// SplitInfo
// =============================================================================

/// One candidate split: feature, threshold, gain, and the row partition it
/// induces.
///
/// Row indices are *local* to the dataset the split was found on. The
/// partition covers every row of that dataset exactly once: rows with
/// `x[feature] < threshold` are on the left, rows with
/// `x[feature] >= threshold` on the right, and both sides are non-empty.
/// The threshold equals the feature value of the first right-side sample in
/// sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    feature_id: usize,
    threshold: f64,
    gain: f64,
    left_rows: Vec<u32>,
    right_rows: Vec<u32>,
}

impl SplitInfo {
    pub fn new(
        feature_id: usize,
        threshold: f64,
        gain: f64,
        left_rows: Vec<u32>,
        right_rows: Vec<u32>,
    ) -> Self {
        debug_assert!(!left_rows.is_empty() && !right_rows.is_empty());
        Self {
            feature_id,
            threshold,
            gain,
            left_rows,
            right_rows,
        }
    }

    /// Gain of the split (reduction of the regularised objective).
    #[inline]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Numeric threshold; rows with `x < threshold` route left.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feature (column) index the split tests.
    #[inline]
    pub fn feature_id(&self) -> usize {
        self.feature_id
    }

    /// Local row indices on the left side.
    #[inline]
    pub fn left_rows(&self) -> &[u32] {
        &self.left_rows
    }

    /// Local row indices on the right side.
    #[inline]
    pub fn right_rows(&self) -> &[u32] {
        &self.right_rows
    }

    /// Project a per-row vector onto one side of the partition.
    ///
    /// Used to split the gradient and Hessian vectors in parallel with the
    /// dataset.
    pub fn split_vec(&self, values: &[f64], side: Side) -> Vec<f64> {
        let rows = match side {
            Side::Left => &self.left_rows,
            Side::Right => &self.right_rows,
        };
        rows.iter().map(|&r| values[r as usize]).collect()
    }
}

impl PartialOrd for SplitInfo {
    /// Splits order by gain, for `max`-style reductions.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.gain.partial_cmp(&other.gain)
    }
}

// =============================================================================
// Tests
// =============================================================================
