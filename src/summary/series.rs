use crate::sorted_array::SortedArray;

use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Quantiles of every column across rows, one output row per quantile
///
/// NaN values are skipped, a column without finite values gives NaN.
pub fn column_quantiles(values: ArrayView2<f64>, quantiles: &[f64]) -> Array2<f64> {
    let mut result = Array2::from_elem((quantiles.len(), values.ncols()), f64::NAN);
    for (column, mut output) in values
        .axis_iter(Axis(1))
        .zip(result.axis_iter_mut(Axis(1)))
    {
        let sorted = SortedArray::from(column);
        for (&q, output) in quantiles.iter().zip(output.iter_mut()) {
            *output = sorted.ppf(q).unwrap_or(f64::NAN);
        }
    }
    result
}

/// Pearson correlation of the series with itself shifted by `lag`
///
/// Pairs with a NaN member are dropped. NaN if fewer than two pairs remain or either side is
/// constant.
pub fn autocorrelation(x: ArrayView1<f64>, lag: usize) -> f64 {
    if lag >= x.len() {
        return f64::NAN;
    }
    let (a, b): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(x.iter().skip(lag))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .unzip();
    pearson(&a, &b)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;
    let (cov, var_a, var_b) = a.iter().zip_eq(b).fold(
        (0.0, 0.0, 0.0),
        |(cov, var_a, var_b), (&a, &b)| {
            let (da, db) = (a - mean_a, b - mean_b);
            (cov + da * db, var_a + da * da, var_b + db * db)
        },
    );
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    cov / f64::sqrt(var_a * var_b)
}

/// Autocorrelation for lags `0..=max_lag`
pub fn autocorrelations(x: ArrayView1<f64>, max_lag: usize) -> Array1<f64> {
    (0..=max_lag).map(|lag| autocorrelation(x, lag)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn quantiles_per_column() {
        let values = array![[1.0, 10.0], [2.0, f64::NAN], [3.0, 30.0], [4.0, 40.0]];
        let q = column_quantiles(values.view(), &[0.0, 0.5, 1.0]);
        assert_eq!(q.dim(), (3, 2));
        assert_relative_eq!(q.column(0), array![1.0, 2.5, 4.0]);
        assert_relative_eq!(q.column(1), array![10.0, 30.0, 40.0]);
    }

    #[test]
    fn all_nan_column() {
        let values = array![[f64::NAN], [f64::NAN]];
        assert!(column_quantiles(values.view(), &[0.5])[[0, 0]].is_nan());
    }

    #[test]
    fn lag_zero_is_unity() {
        let x = array![1.0, 3.0, 2.0, 5.0, 4.0];
        assert_relative_eq!(autocorrelation(x.view(), 0), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn alternating_series() {
        let x = array![1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(autocorrelation(x.view(), 1), -1.0, epsilon = 1e-14);
        assert_relative_eq!(autocorrelation(x.view(), 2), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn linear_trend() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let r = autocorrelations(x.view(), 3);
        assert_eq!(r.len(), 4);
        for &r in r.iter() {
            assert_relative_eq!(r, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn degenerate_cases() {
        let x = array![1.0, 1.0, 1.0];
        assert!(autocorrelation(x.view(), 1).is_nan());
        let x = array![1.0, 2.0];
        assert!(autocorrelation(x.view(), 1).is_nan());
        assert!(autocorrelation(x.view(), 5).is_nan());
    }

    #[test]
    fn nan_pairs_are_dropped() {
        let x = array![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        // Remaining lag-1 pairs: (1, 2), (4, 5), (5, 6)
        let expected = pearson(&[1.0, 4.0, 5.0], &[2.0, 5.0, 6.0]);
        assert_relative_eq!(autocorrelation(x.view(), 1), expected);
        assert_relative_eq!(expected, 1.0, epsilon = 1e-14);
    }
}
