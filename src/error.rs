use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::forecast::ForecastError;
use crate::store::StoreError;

/// Request-level error taxonomy, mapped onto HTTP statuses in one place.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error("weather provider error: {0}")]
    Upstream(#[from] ForecastError),
    #[error("catalog storage error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            Self::UnknownParameter(_) => (StatusCode::BAD_REQUEST, "unknown_parameter"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            // Bad coordinates are the caller's fault, not the provider's.
            Self::Upstream(ForecastError::InvalidCoordinates) => {
                (StatusCode::BAD_REQUEST, "validation")
            }
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream"),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        };

        let body = ErrorBody {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::Validation("bad name".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("no such city".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_maps_to_502() {
        let response =
            ApiError::Upstream(ForecastError::Malformed("truncated".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_coordinates_map_to_400() {
        let response = ApiError::Upstream(ForecastError::InvalidCoordinates).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_parameter_names_the_token() {
        let err = ApiError::UnknownParameter("bogus".to_string());
        assert!(err.to_string().contains("bogus"));
    }
}
