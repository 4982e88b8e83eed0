//! Results Routes

use axum::{extract::State, response::Html, Json};
use metrics::counter;

use crate::error::ApiError;
use crate::presentation::{self, ResultsView};
use crate::{views, SharedState};

/// Scatter plot with fitted line
pub async fn results_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    super::ensure_initialized(&state).await?;
    let state = state.read().await;
    let view = presentation::results_view(&state.store)?;
    counter!("ivfit_results_rendered_total").increment(1);
    Ok(Html(views::render_results(&view)?))
}

/// Same view as JSON; absent fit values are `null`
pub async fn results_json(State(state): State<SharedState>) -> Result<Json<ResultsView>, ApiError> {
    super::ensure_initialized(&state).await?;
    let state = state.read().await;
    Ok(Json(presentation::results_view(&state.store)?))
}
