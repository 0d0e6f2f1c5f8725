use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mentorlink_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Photo not found: {0}")]
    PhotoNotFound(Uuid),

    #[error("Photo too large: {size} bytes (max {max})")]
    PhotoTooLarge { size: usize, max: usize },

    #[error("Photo storage error: {0}")]
    PhotoStorage(String),

    #[error("Missing x-user-id header")]
    Unauthenticated,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::PhotoNotFound(_) | ServerError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ServerError::PhotoTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            ServerError::PhotoStorage(e) => {
                tracing::error!(error = %e, "Photo storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Photo storage error".to_string())
            }
            ServerError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::Store(e) => match e {
                StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                StoreError::Conflict { .. } => (StatusCode::CONFLICT, e.to_string()),
                StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                _ => {
                    tracing::error!(error = %e, "Store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            },
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use mentorlink_shared::error::DomainError;

    use super::*;

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (StoreError::not_found("mentors", "x"), StatusCode::NOT_FOUND),
            (
                StoreError::Conflict {
                    field: "reviews".into(),
                    expected: 1,
                    actual: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                StoreError::Invalid(DomainError::EmptyReviewText),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Migration("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).into_response().status(), status);
        }
    }
}
