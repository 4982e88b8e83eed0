//! Linear Least-Squares Fit

use crate::RegressionError;
use serde::Serialize;
use tracing::debug;

/// Fitted line `y = slope * x + intercept`.
///
/// Every field is `None` until there are enough points: two for the line,
/// three for the standard errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegressionResult {
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub slope_error: Option<f64>,
    pub intercept_error: Option<f64>,
}

impl RegressionResult {
    /// Whether a line has been fitted
    pub fn is_fitted(&self) -> bool {
        self.slope.is_some() && self.intercept.is_some()
    }

    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> Option<f64> {
        Some(self.slope? * x + self.intercept?)
    }
}

/// Ordinary least-squares fit of `y` against `x`.
///
/// With more than two points the standard errors come from the diagonal of
/// `s² (XᵀX)⁻¹`, where `s² = RSS / (n - 2)` and `X` has rows `[x_i, 1]`.
pub fn fit(x: &[f64], y: &[f64]) -> Result<RegressionResult, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Ok(RegressionResult::default());
    }

    if x.iter().all(|&xi| xi == x[0]) {
        return Err(RegressionError::DegenerateFit { n, x: x[0] });
    }
    let out_of_range = RegressionError::NumericRange { n };

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;
    if !(mean_x.is_finite() && mean_y.is_finite()) {
        return Err(out_of_range);
    }

    // Centered x divided by its largest magnitude, so squaring neither
    // overflows nor underflows: u_i = (x_i - mean_x) / scale, |u_i| <= 1
    let scale = x
        .iter()
        .map(|&xi| (xi - mean_x).abs())
        .fold(0.0, f64::max);
    if !(scale.is_finite() && scale > 0.0) {
        return Err(out_of_range);
    }
    let u: Vec<f64> = x.iter().map(|&xi| (xi - mean_x) / scale).collect();

    let mut suu = 0.0;
    let mut suy = 0.0;
    for (&ui, &yi) in u.iter().zip(y) {
        suu += ui * ui;
        suy += ui * (yi - mean_y);
    }

    // Slope against u; the slope against x is this divided by scale
    let slope_u = suy / suu;
    let slope = slope_u / scale;
    let intercept = mean_y - slope * mean_x;
    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(out_of_range);
    }

    if n == 2 {
        return Ok(RegressionResult {
            slope: Some(slope),
            intercept: Some(intercept),
            ..Default::default()
        });
    }

    let rss: f64 = u
        .iter()
        .zip(y)
        .map(|(&ui, &yi)| {
            let r = (yi - mean_y) - slope_u * ui;
            r * r
        })
        .sum();
    let s2 = rss / (nf - 2.0);

    // With Sxx = scale² Σu² and Σx² = Sxx + n mean_x², the diagonal of
    // s² (XᵀX)⁻¹ is s² / Sxx and s² (1/n + mean_x² / Sxx)
    let slope_var_u = s2 / suu;
    let slope_error = slope_var_u.sqrt() / scale;
    let mean_x_u = mean_x / scale;
    let intercept_error = (s2 / nf + slope_var_u * mean_x_u * mean_x_u).sqrt();
    if !(slope_error.is_finite() && intercept_error.is_finite()) {
        return Err(out_of_range);
    }

    debug!(n, slope, intercept, rss, "Fitted line");

    Ok(RegressionResult {
        slope: Some(slope),
        intercept: Some(intercept),
        slope_error: Some(slope_error),
        intercept_error: Some(intercept_error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_too_few_points() {
        assert_eq!(fit(&[], &[]).unwrap(), RegressionResult::default());
        let single = fit(&[1.0], &[2.0]).unwrap();
        assert!(!single.is_fitted());
        assert_eq!(single.slope_error, None);
    }

    #[test]
    fn test_two_points_exact_line() {
        let result = fit(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
        assert_eq!(result.slope, Some(2.0));
        assert_eq!(result.intercept, Some(0.0));
        assert_eq!(result.slope_error, None);
        assert_eq!(result.intercept_error, None);
    }

    #[test]
    fn test_collinear_points_have_zero_error() {
        let result = fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(result.slope, Some(1.0));
        assert_eq!(result.intercept, Some(0.0));
        assert_eq!(result.slope_error, Some(0.0));
        assert_eq!(result.intercept_error, Some(0.0));
    }

    #[test]
    fn test_noisy_points() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.2, 7.8, 10.1];
        let result = fit(&x, &y).unwrap();

        assert!((result.slope.unwrap() - 1.99).abs() < 1e-9);
        assert!((result.intercept.unwrap() - 0.05).abs() < 1e-9);
        // s² = 0.107 / 3
        assert!((result.slope_error.unwrap() - 0.059722).abs() < 1e-5);
        assert!((result.intercept_error.unwrap() - 0.198074).abs() < 1e-5);
    }

    #[test]
    fn test_identical_x_is_degenerate() {
        let err = fit(&[1.0, 1.0], &[1.0, 3.0]).unwrap_err();
        assert_eq!(err, RegressionError::DegenerateFit { n: 2, x: 1.0 });

        let thirds = [0.1, 0.1, 0.1];
        assert!(matches!(
            fit(&thirds, &[1.0, 2.0, 3.0]),
            Err(RegressionError::DegenerateFit { n: 3, .. })
        ));
    }

    #[test]
    fn test_huge_distinct_x_fits() {
        let result = fit(&[1e160, 2e160, 3e160], &[1.0, 2.0, 3.0]).unwrap();
        assert!((result.slope.unwrap() * 1e160 - 1.0).abs() < 1e-9);
        assert!(result.intercept.unwrap().abs() < 1e-9);
        assert!(result.slope_error.unwrap().is_finite());
        assert!(result.intercept_error.unwrap().is_finite());
    }

    #[test]
    fn test_tiny_distinct_x_fits() {
        let result = fit(&[1e-170, 2e-170, 3e-170], &[1.0, 2.0, 3.0]).unwrap();
        assert!((result.slope.unwrap() / 1e170 - 1.0).abs() < 1e-9);
        assert!(result.intercept.unwrap().abs() < 1e-9);
        assert!(result.slope_error.unwrap().is_finite());

        let pair = fit(&[1e-170, 3e-170], &[0.0, 4.0]).unwrap();
        assert!((pair.slope.unwrap() / 2e170 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_slope_beyond_f64_is_numeric_range() {
        assert_eq!(
            fit(&[0.0, 1e-300, 2e-300], &[0.0, 1e300, 2e300]).unwrap_err(),
            RegressionError::NumericRange { n: 3 }
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            fit(&[1.0, 2.0], &[1.0]).unwrap_err(),
            RegressionError::LengthMismatch { x_len: 2, y_len: 1 }
        );
    }

    #[test]
    fn test_predict() {
        let result = fit(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert_eq!(result.predict(1.0), Some(3.0));
        assert_eq!(RegressionResult::default().predict(1.0), None);
    }

    proptest! {
        #[test]
        fn prop_recovers_exact_line(
            xs in proptest::collection::hash_set(-1000i32..1000, 3..30),
            slope in -100.0f64..100.0,
            intercept in -100.0f64..100.0,
        ) {
            let x: Vec<f64> = xs.into_iter().map(f64::from).collect();
            let y: Vec<f64> = x.iter().map(|xi| slope * xi + intercept).collect();
            let result = fit(&x, &y).unwrap();

            prop_assert!((result.slope.unwrap() - slope).abs() < 1e-6);
            prop_assert!((result.intercept.unwrap() - intercept).abs() < 1e-6);
            prop_assert!(result.slope_error.unwrap() < 1e-6);
        }

        #[test]
        fn prop_residuals_sum_to_zero(
            points in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 3..40),
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
            prop_assume!(x.iter().any(|&xi| xi != x[0]));
            let result = fit(&x, &y).unwrap();

            let residual_sum: f64 = x
                .iter()
                .zip(&y)
                .map(|(&xi, &yi)| yi - result.predict(xi).unwrap())
                .sum();
            prop_assert!(residual_sum.abs() < 1e-6);
            prop_assert!(result.slope_error.unwrap().is_finite());
            prop_assert!(result.intercept_error.unwrap() >= 0.0);
        }
    }
}
