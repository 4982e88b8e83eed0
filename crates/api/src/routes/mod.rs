//! HTTP Routes

pub mod form;
pub mod results;

use crate::error::ApiError;
use crate::SharedState;

/// Create missing stores under the write guard, so first requests racing on
/// a fresh directory never see a half-written file
pub(crate) async fn ensure_initialized(state: &SharedState) -> Result<(), ApiError> {
    state.write().await.store.ensure_initialized()?;
    Ok(())
}
