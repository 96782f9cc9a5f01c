use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, error::AppError};

/// 管理接口鉴权，校验 `Authorization: Bearer <ADMIN_TOKEN>`
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.admin_token.as_str();
    let provided = req.headers().typed_get::<Authorization<Bearer>>();

    match provided {
        Some(auth) if !expected.is_empty() && token_matches(auth.token(), expected) => {
            next.run(req).await
        }
        _ => {
            tracing::warn!("Rejected admin request to {}", req.uri().path());
            AppError::Unauthorized.into_response()
        }
    }
}

/// 逐字节比较，耗时与第一个不同字节的位置无关
fn token_matches(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
