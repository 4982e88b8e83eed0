//! Request Errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use regression::RegressionError;
use serde::Serialize;
use storage::StorageError;
use thiserror::Error;
use tracing::{error, warn};

/// Anything that ends a request early
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Fit failed: {0}")]
    Regression(#[from] RegressionError),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Regression(_) | ApiError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Storage(StorageError::Io { .. }) => "io_failure",
            ApiError::Storage(StorageError::Corrupt { .. }) => "corrupt_data",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Regression(_) => "regression_failure",
            ApiError::Render(_) => "render_failure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            warn!(error = %self, kind = self.kind(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let invalid = ApiError::from(ValidationError::MissingField("voltage"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.kind(), "invalid_input");

        let corrupt = ApiError::from(StorageError::Corrupt {
            path: PathBuf::from("data.json"),
            reason: "missing field `current`".to_string(),
        });
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(corrupt.kind(), "corrupt_data");

        let mismatch = ApiError::from(RegressionError::LengthMismatch { x_len: 2, y_len: 1 });
        assert_eq!(mismatch.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mismatch.kind(), "regression_failure");

        let degenerate = ApiError::from(RegressionError::DegenerateFit { n: 2, x: 1.0 });
        assert_eq!(degenerate.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(degenerate.kind(), "regression_failure");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::from(StorageError::Io {
            path: PathBuf::from("data.xml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
