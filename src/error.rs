use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error surface of the API. Every variant maps to one status code and a
/// JSON body of the shape `{"error": ..., "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("user with id {0} not found")]
    NotFound(i64),
    #[error("database integrity error: {0}")]
    Conflict(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation failed"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };

        // Store and hashing failures are logged where they happen; their
        // details stay out of the response body.
        let message = match &self {
            ApiError::Database(_) => "database failure".to_string(),
            ApiError::Hashing(_) => "password processing failed".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": label,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = ApiError::Validation("name too long".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound(42).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let res = ApiError::Conflict("duplicate key".into()).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failures_map_to_500() {
        let res = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let res = ApiError::Hashing("salt error".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn store_failure_body_hides_details() {
        let res = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["error"], "internal error");
        assert_eq!(v["message"], "database failure");
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(
            ApiError::NotFound(7).to_string(),
            "user with id 7 not found"
        );
    }
}
