use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::repository::RepositoryError;

/// Message shared by the fail-fast lookup and the storage constraint path.
pub const DUPLICATE_APPLICATION_MESSAGE: &str = "You have already applied to this job";

/// Error taxonomy surfaced by every lifecycle operation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("{}", DUPLICATE_APPLICATION_MESSAGE)]
    DuplicateApplication,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage failure during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl PipelineError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PipelineError::Forbidden(_) => StatusCode::FORBIDDEN,
            PipelineError::NotFound { .. } => StatusCode::NOT_FOUND,
            PipelineError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            PipelineError::DuplicateApplication => StatusCode::CONFLICT,
            PipelineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Attaches the failing operation to repository errors.
pub(crate) trait StorageContext<T> {
    fn during(self, operation: &'static str) -> Result<T, PipelineError>;
}

impl<T> StorageContext<T> for Result<T, RepositoryError> {
    fn during(self, operation: &'static str) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::Storage { operation, source })
    }
}
