use crate::services::ServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// ErrorBody
///
/// JSON shape of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Product not found")]
    pub error: String,
}

/// ApiError
///
/// The HTTP-facing error taxonomy. Every handler and middleware returns this type,
/// and `IntoResponse` is the single place where categories become status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Detail is logged server-side; clients only see a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidIdentifier(message) => ApiError::BadRequest(message),
            ServiceError::NotFound { kind, .. } => ApiError::NotFound(format!("{kind} not found")),
            ServiceError::Conflict(message) => ApiError::Conflict(message),
            ServiceError::Repository(source) => ApiError::Internal(source.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed with internal error");
                "Internal server error".to_string()
            }
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m,
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::MalformedId, repository::RepositoryError};
    use axum::body::to_bytes;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                ServiceError::InvalidIdentifier("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::NotFound {
                    kind: "Product",
                    id: "62f7a9b3c4d1e01234567890".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT),
            (
                ServiceError::Repository(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn malformed_id_passes_through_as_bad_request() {
        let err: ServiceError = RepositoryError::from(MalformedId("abc".into())).into();
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.to_string(), "'abc' is not a valid identifier");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::Internal("connection reset by peer".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn not_found_body_names_the_entity() {
        let err = ServiceError::NotFound {
            kind: "Role",
            id: "674a3f21c91b9e7d45f0b812".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Role not found");
    }
}
