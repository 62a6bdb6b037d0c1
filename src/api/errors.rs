use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::errors::UseCaseError;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Missing single entity. The public API has always answered these with
    /// 416 rather than 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::RANGE_NOT_SATISFIABLE, message)
    }

    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Arguments(e) => ApiError::bad_request(e.to_string()),
            UseCaseError::Domain(e) => ApiError::bad_request(e.to_string()),
            UseCaseError::NotFound(msg) => ApiError::not_found(msg),
            UseCaseError::Repository(e) => {
                error!(error = %e, "Request failed in the storage layer");
                ApiError::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RepositoryError;
    use crate::application::query::ArgumentError;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = UseCaseError::from(ArgumentError::Invalid("bad".to_string())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = UseCaseError::NotFound("Asset not found".to_string()).into();
        assert_eq!(err.status(), StatusCode::RANGE_NOT_SATISFIABLE);

        let err: ApiError = UseCaseError::from(RepositoryError::Internal("pool closed".to_string())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal Server Error");
    }
}
