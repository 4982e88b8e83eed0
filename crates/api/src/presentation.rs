//! Presentation Adapter
//!
//! Shapes stored measurements and fit results into what the routes render.

use data_validator::{RawReading, Validator};
use regression::{RegressionError, RegressionResult};
use serde::Serialize;
use storage::{Measurement, MeasurementStore};
use tracing::warn;

use crate::error::ApiError;

/// Plot point, x = voltage, y = current
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Whether the view carries a fitted line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// Fewer than two points
    InsufficientData,
    Fitted,
    /// Every voltage is the same, or the line overflows an `f64`
    Unavailable,
}

/// Everything the results page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub fit: RegressionResult,
    pub fit_status: FitStatus,
    /// Fitted line from the lowest to the highest voltage
    pub line: Option<[Point; 2]>,
}

/// Parse a submission and append it to both encodings.
///
/// Input is parsed before anything touches storage.
pub fn submit_measurement(
    store: &MeasurementStore,
    raw: &RawReading,
) -> Result<Measurement, ApiError> {
    let reading = Validator::new().validate(raw)?;
    let measurement = Measurement::new(reading.voltage, reading.current);

    store.ensure_initialized()?;
    store.append(measurement)?;
    Ok(measurement)
}

/// Load every measurement and fit current against voltage.
///
/// Expects both encodings to exist; callers initialize the store first.
pub fn results_view(store: &MeasurementStore) -> Result<ResultsView, ApiError> {
    let measurements = store.load_all()?;

    let points: Vec<Point> = measurements
        .iter()
        .map(|m| Point {
            x: m.voltage,
            y: m.current,
        })
        .collect();
    let (x, y): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p.x, p.y)).unzip();

    let (fit, fit_status) = match regression::fit(&x, &y) {
        Ok(fit) if fit.is_fitted() => (fit, FitStatus::Fitted),
        Ok(fit) => (fit, FitStatus::InsufficientData),
        Err(
            err @ (RegressionError::DegenerateFit { .. } | RegressionError::NumericRange { .. }),
        ) => {
            warn!(error = %err, "Fit unavailable");
            (RegressionResult::default(), FitStatus::Unavailable)
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ResultsView {
        line: fitted_line(&x, &fit),
        points,
        fit,
        fit_status,
    })
}

fn fitted_line(x: &[f64], fit: &RegressionResult) -> Option<[Point; 2]> {
    let lo = x.iter().copied().reduce(f64::min)?;
    let hi = x.iter().copied().reduce(f64::max)?;
    Some([
        Point {
            x: lo,
            y: fit.predict(lo)?,
        },
        Point {
            x: hi,
            y: fit.predict(hi)?,
        },
    ])
}
