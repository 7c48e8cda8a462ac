//! Common utilities: parallelism configuration and sorting helpers.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through training components. When `Parallel`,
/// components may use `rayon` parallel iterators; when `Sequential`, they must
/// iterate sequentially. Components never manage thread pools themselves.
///
/// Every parallel region in the crate writes to per-index disjoint outputs and
/// reduces them sequentially afterwards, so results are identical under both
/// modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::Parallel
    }
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over an iterator, in parallel when allowed.
    ///
    /// The output order always matches the input order, so downstream
    /// reductions stay deterministic.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Argsort: indices `0..n` ordered so that `key(idx)` is non-decreasing.
///
/// Ties keep their original index order (stable sort), which fixes the
/// ordering of equal feature values across runs.
pub fn argsort_by_key<F>(n: usize, key: F) -> Vec<u32>
where
    F: Fn(usize) -> f64,
{
    let mut indices: Vec<u32> = (0..n as u32).collect();
    indices.sort_by(|&a, &b| {
        key(a as usize)
            .partial_cmp(&key(b as usize))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}
