use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatepass_core::error::CoreError;
use gatepass_db::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StorageError`] for backend
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gatepass_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Storage errors ---
            AppError::Storage(err) => classify_storage_error(err),

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `Conflict` (duplicate id) maps to 409.
/// - `Unsupported` (e.g. deleting a visitor) maps to 405.
/// - Everything else maps to 500 with a sanitized message.
fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StorageError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StorageError::Unsupported { .. } => (
            StatusCode::METHOD_NOT_ALLOWED,
            "UNSUPPORTED",
            err.to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Storage error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use gatepass_db::Collection;

    use super::*;

    #[test]
    fn storage_errors_map_to_statuses() {
        let not_found = AppError::from(StorageError::not_found(Collection::Users, "u1"));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unsupported = AppError::from(StorageError::Unsupported {
            operation: "delete",
            collection: Collection::Visitors,
        });
        assert_eq!(unsupported.status(), StatusCode::METHOD_NOT_ALLOWED);

        let corrupt = AppError::from(StorageError::Corrupt("bad".into()));
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_the_only_400() {
        let err = AppError::from(CoreError::Validation("Please fill in all required fields".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.parts().1, "VALIDATION_ERROR");

        let internal = AppError::InternalError("hashing failed".into());
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.parts().2, "An internal error occurred");
    }

    #[test]
    fn core_conflict_is_409() {
        let err = AppError::from(CoreError::Conflict("Visit is already closed".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
