//! Synthetic datasets for tests and examples.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::Dataset;
use crate::metrics::LogLoss;

/// Regression data with a sparse linear signal plus Gaussian-ish noise.
///
/// Targets depend on the first three features only, so shallow trees can
/// recover most of the signal.
pub fn synthetic_regression(n_rows: usize, n_features: usize, seed: u64, noise: f64) -> Dataset {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|_| (0..n_features).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();

    let y: Vec<f64> = rows
        .iter()
        .map(|row| {
            let signal = 3.0 * row[0] - 2.0 * row.get(1).copied().unwrap_or(0.0)
                + row.get(2).copied().unwrap_or(0.0);
            signal + noise * (rng.gen::<f64>() - 0.5)
        })
        .collect();

    Dataset::from_rows(&rows, y).expect("generated shapes always agree")
}

/// Binary classification data with logistic labels over a linear score.
pub fn synthetic_two_class(n_rows: usize, n_features: usize, seed: u64) -> Dataset {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|_| (0..n_features).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();

    let y: Vec<f64> = rows
        .iter()
        .map(|row| {
            let score = 4.0 * row[0] + 2.0 * row.get(1).copied().unwrap_or(0.0);
            let p = LogLoss::sigmoid(score);
            if rng.gen::<f64>() < p {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    Dataset::from_rows(&rows, y).expect("generated shapes always agree")
}
