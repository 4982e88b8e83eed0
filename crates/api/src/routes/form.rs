//! Submission Routes

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use data_validator::RawReading;
use metrics::counter;
use tracing::info;

use crate::error::ApiError;
use crate::{presentation, views, SharedState};

/// Submission form; creates empty stores if they are missing
pub async fn index(State(state): State<SharedState>) -> Result<Html<&'static str>, ApiError> {
    super::ensure_initialized(&state).await?;
    Ok(Html(views::INDEX_PAGE))
}

/// Append a submitted reading and redirect to the results page
pub async fn submit(
    State(state): State<SharedState>,
    Form(raw): Form<RawReading>,
) -> Result<Redirect, ApiError> {
    let state = state.write().await;

    match presentation::submit_measurement(&state.store, &raw) {
        Ok(measurement) => {
            counter!("ivfit_measurements_submitted_total").increment(1);
            info!(
                voltage = measurement.voltage,
                current = measurement.current,
                "Recorded measurement"
            );
            Ok(Redirect::to("/results"))
        }
        Err(err) => {
            if matches!(err, ApiError::InvalidInput(_)) {
                counter!("ivfit_submissions_rejected_total").increment(1);
            }
            Err(err)
        }
    }
}
