//! Dataset: design matrix, target vector, and presorted feature columns.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::trees::{Side, SplitInfo};
use crate::utils::argsort_by_key;

use super::ColMatrix;

// =============================================================================
// Dataset
// =============================================================================

/// A design matrix X and target vector y, viewed through a row subset.
///
/// The matrix and targets are shared (`Arc`) and immutable after
/// construction; a dataset only owns its row-index list and the per-feature
/// sort permutations over that list. Deriving a child dataset for one side
/// of a split therefore never copies X or y.
///
/// For each feature `j`, [`sorted_column`](Self::sorted_column) yields a
/// permutation of the *local* indices `0..n_rows()` placing the current rows
/// in ascending order of that feature's value. The permutations are built
/// once at construction, O(n log n) per feature.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Arc<ColMatrix>,
    y: Arc<[f64]>,
    /// Global row ids of this view, in local-index order.
    row_indices: Vec<u32>,
    /// Per feature: permutation of local indices, ascending by value.
    sorted_columns: Vec<Vec<u32>>,
}

impl Dataset {
    /// Build a dataset over all rows of `x`.
    ///
    /// Fails with [`Error::InvalidShape`] when `y` does not have one value
    /// per row of `x`.
    pub fn new(x: ColMatrix, y: Vec<f64>) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(Error::invalid_shape(format!(
                "X has {} rows but y has {} values",
                x.n_rows(),
                y.len()
            )));
        }

        let row_indices: Vec<u32> = (0..x.n_rows() as u32).collect();
        let x = Arc::new(x);
        let y: Arc<[f64]> = y.into();
        let sorted_columns = Self::build_sorted_columns(&x, &row_indices);

        Ok(Self {
            x,
            y,
            row_indices,
            sorted_columns,
        })
    }

    /// Convenience constructor from sample rows.
    pub fn from_rows(rows: &[Vec<f64>], y: Vec<f64>) -> Result<Self> {
        Self::new(ColMatrix::from_rows(rows), y)
    }

    fn build_sorted_columns(x: &ColMatrix, row_indices: &[u32]) -> Vec<Vec<u32>> {
        (0..x.n_cols())
            .map(|j| {
                argsort_by_key(row_indices.len(), |local| {
                    x.value(row_indices[local] as usize, j)
                })
            })
            .collect()
    }

    /// Number of rows in the current view.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.row_indices.len()
    }

    /// Number of features (columns of X).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.x.n_cols()
    }

    /// Feature value at (local row, feature).
    #[inline]
    pub fn value(&self, local_row: usize, feature: usize) -> f64 {
        self.x.value(self.row_indices[local_row] as usize, feature)
    }

    /// Target value at a local row.
    #[inline]
    pub fn target(&self, local_row: usize) -> f64 {
        self.y[self.row_indices[local_row] as usize]
    }

    /// The y values for the current row subset, in local-index order.
    pub fn y_projected(&self) -> Vec<f64> {
        self.row_indices
            .iter()
            .map(|&r| self.y[r as usize])
            .collect()
    }

    /// Copy a sample row of X into `buf`.
    #[inline]
    pub fn copy_row(&self, local_row: usize, buf: &mut [f64]) {
        self.x.copy_row(self.row_indices[local_row] as usize, buf);
    }

    /// A feature column projected onto the current rows, in local order.
    pub fn col(&self, feature: usize) -> Vec<f64> {
        let column = self.x.col_slice(feature);
        self.row_indices
            .iter()
            .map(|&r| column[r as usize])
            .collect()
    }

    /// Permutation of local indices sorting the current rows by feature `j`.
    #[inline]
    pub fn sorted_column(&self, feature: usize) -> &[u32] {
        &self.sorted_columns[feature]
    }

    /// Derive a dataset holding only the rows on one side of a split.
    ///
    /// Shares X and y with the parent; the child carries its own row-index
    /// list and recomputed per-feature permutations (sized to the subset).
    pub fn subset(&self, split: &SplitInfo, side: Side) -> Dataset {
        let local_ids = match side {
            Side::Left => split.left_rows(),
            Side::Right => split.right_rows(),
        };

        let row_indices: Vec<u32> = local_ids
            .iter()
            .map(|&local| self.row_indices[local as usize])
            .collect();
        let sorted_columns = Self::build_sorted_columns(&self.x, &row_indices);

        Dataset {
            x: Arc::clone(&self.x),
            y: Arc::clone(&self.y),
            row_indices,
            sorted_columns,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn column_dataset(values: &[f64]) -> Dataset {
        let rows: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
        Dataset::from_rows(&rows, vec![0.0; values.len()]).unwrap()
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let x = ColMatrix::from_rows(&[vec![1.0], vec![2.0]]);
        let err = Dataset::new(x, vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
    }

    #[test]
    fn sorted_column_orders_values() {
        let ds = column_dataset(&[3.1, 1.2, 4.5, 2.6]);
        let pi = ds.sorted_column(0);
        assert_eq!(pi, &[1, 3, 0, 2]);

        let sorted: Vec<f64> = pi.iter().map(|&i| ds.value(i as usize, 0)).collect();
        assert_eq!(sorted, vec![1.2, 2.6, 3.1, 4.5]);
    }

    #[test]
    fn sorted_column_inverse_is_identity() {
        let ds = column_dataset(&[3.1, 1.2, 4.5, 2.6]);
        let pi = ds.sorted_column(0);

        let mut inverse = vec![0u32; pi.len()];
        for (pos, &i) in pi.iter().enumerate() {
            inverse[i as usize] = pos as u32;
        }
        for local in 0..pi.len() {
            assert_eq!(pi[inverse[local] as usize] as usize, local);
        }
    }

    #[test]
    fn col_projects_current_rows() {
        let ds = Dataset::from_rows(
            &[vec![1.0, 9.0], vec![2.0, 8.0], vec![3.0, 7.0]],
            vec![0.0; 3],
        )
        .unwrap();
        assert_eq!(ds.col(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(ds.col(1), vec![9.0, 8.0, 7.0]);

        let split = SplitInfo::new(0, 3.0, 1.0, vec![0, 1], vec![2]);
        let left = ds.subset(&split, Side::Left);
        assert_eq!(left.col(1), vec![9.0, 8.0]);
    }

    #[test]
    fn y_projection_follows_row_order() {
        let ds = Dataset::from_rows(
            &[vec![1.0], vec![2.0], vec![3.0]],
            vec![10.0, 20.0, 30.0],
        )
        .unwrap();
        assert_eq!(ds.y_projected(), vec![10.0, 20.0, 30.0]);
        assert_eq!(ds.target(1), 20.0);
    }

    #[test]
    fn subset_shares_x_and_remaps_rows() {
        let ds = Dataset::from_rows(
            &[vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
            vec![10.0, 20.0, 30.0, 40.0],
        )
        .unwrap();

        let split = SplitInfo::new(0, 3.0, 1.0, vec![0, 1], vec![2, 3]);
        let left = ds.subset(&split, Side::Left);
        let right = ds.subset(&split, Side::Right);

        assert_eq!(left.n_rows(), 2);
        assert_eq!(right.n_rows(), 2);
        assert_eq!(left.y_projected(), vec![10.0, 20.0]);
        assert_eq!(right.y_projected(), vec![30.0, 40.0]);

        // Child permutations index into the child view.
        assert_eq!(left.sorted_column(0), &[0, 1]);
        let smallest = right.sorted_column(0)[0] as usize;
        assert_eq!(right.value(smallest, 0), 3.0);
    }

    #[test]
    fn nested_subset_tracks_global_rows() {
        let ds = Dataset::from_rows(
            &[vec![5.0], vec![1.0], vec![4.0], vec![2.0], vec![3.0]],
            vec![50.0, 10.0, 40.0, 20.0, 30.0],
        )
        .unwrap();

        // Rows with value >= 3.0: global rows 0, 2, 4 (locals 0, 2, 4).
        let split = SplitInfo::new(0, 3.0, 1.0, vec![1, 3], vec![0, 2, 4]);
        let right = ds.subset(&split, Side::Right);
        assert_eq!(right.y_projected(), vec![50.0, 40.0, 30.0]);

        // Within the child, split off its smallest value (3.0, local 2).
        let inner = SplitInfo::new(0, 4.0, 1.0, vec![2], vec![0, 1]);
        let inner_left = right.subset(&inner, Side::Left);
        assert_eq!(inner_left.y_projected(), vec![30.0]);
        assert_eq!(inner_left.value(0, 0), 3.0);
    }
}
