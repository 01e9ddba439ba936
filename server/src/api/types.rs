//! Shared API types
//!
//! Error responses share one JSON shape: `{error, code, message}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::suggest::{BuildError, LookupError};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn from_lookup(e: LookupError) -> Self {
        match e {
            LookupError::InvalidArgument(reason) => Self::bad_request("INVALID_PREFIX", reason),
            LookupError::Cache(e) => {
                tracing::error!(error = %e, "Suggestion cache error");
                Self::internal("Suggestion lookup failed")
            }
            LookupError::Store(e) => {
                tracing::error!(error = %e, backend = e.backend(), "Suggestion store error");
                Self::internal("Suggestion lookup failed")
            }
        }
    }

    pub fn from_build(e: BuildError) -> Self {
        tracing::error!(error = %e, "Build failed");
        match e {
            BuildError::UpstreamFetch(_) => {
                Self::service_unavailable("Corpus supplier unavailable or returned bad data")
            }
            BuildError::Persistence(_) => Self::internal("Failed to persist prefix documents"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;
    use crate::domain::suggest::CorpusError;

    #[test]
    fn test_lookup_error_mapping() {
        let resp = ApiError::from_lookup(LookupError::InvalidArgument("empty")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err = LookupError::Store(DataError::Config("x".into()));
        let resp = ApiError::from_lookup(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_build_error_mapping() {
        let err = BuildError::UpstreamFetch(CorpusError::Empty);
        let resp = ApiError::from_build(err).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = BuildError::Persistence(DataError::Config("x".into()));
        let resp = ApiError::from_build(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
