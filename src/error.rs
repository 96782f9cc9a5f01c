use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::search::SearchError;
use crate::utils::{error_codes, error_to_api_response};

/// 配置错误，启动时直接失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("search backend failed: {0}")]
    Upstream(#[from] SearchError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AppError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT)
            }
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut response =
            (status, error_to_api_response::<()>(code, self.to_string())).into_response();

        if let AppError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_sets_retry_after() {
        let response = AppError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = AppError::Validation("query must not be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
