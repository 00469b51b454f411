use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fanflux_service::ServiceError;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),
    NotFound(String),
    Conflict(String),
    DatabaseError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::AlreadyExists(msg) => ApiError::Conflict(msg),
            ServiceError::Validation(msg) => ApiError::ValidationError(msg),
            ServiceError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

/// Rejects an empty query parameter with "`<name>` is required".
pub fn required(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} is required", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanflux_database::DbError;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = vec![
            (ServiceError::NotFound("User not found".into()), StatusCode::NOT_FOUND),
            (ServiceError::AlreadyExists("User already exists".into()), StatusCode::CONFLICT),
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Database(DbError::Poisoned), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_required() {
        assert!(required("0xabc", "Address").is_ok());
        match required(" ", "Address") {
            Err(ApiError::ValidationError(msg)) => assert_eq!(msg, "Address is required"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
