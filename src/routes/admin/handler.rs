use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    AppState,
    cache::CacheStats,
    error::AppError,
    limiter::{self, RateLimitPreset},
    result::ApiResponse,
    utils::success_to_api_response,
};

use super::model::{
    BlockRequest, BlockResponse, PresetStatus, RateLimitStatusResponse, UnblockResponse,
};

const MAX_BLOCK_SECS: u64 = limiter::MAX_DURATION.as_secs();

#[axum::debug_handler]
pub async fn cache_stats(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<CacheStats>>) {
    (
        StatusCode::OK,
        success_to_api_response(state.query_cache.stats()),
    )
}

#[axum::debug_handler]
pub async fn clear_cache(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<Value>>) {
    let cleared = state.query_cache.len();
    state.query_cache.clear();
    tracing::info!("Query cache cleared, {} entries dropped", cleared);

    (
        StatusCode::OK,
        success_to_api_response(json!({ "cleared": cleared })),
    )
}

#[axum::debug_handler]
pub async fn rate_limit_status(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> (StatusCode, Json<ApiResponse<RateLimitStatusResponse>>) {
    let presets = RateLimitPreset::ALL
        .iter()
        .map(|preset| {
            let key = preset.key(&identifier);
            let is_suspicious = state.limiter.is_suspicious(&key);
            match state.limiter.status(&key) {
                Some(status) => PresetStatus {
                    preset: preset.as_str().to_string(),
                    tracked: true,
                    count: status.count,
                    suspicious_activity: status.suspicious_activity,
                    is_suspicious,
                    blocked: status.blocked,
                    resets_at: chrono::Duration::from_std(status.resets_in)
                        .ok()
                        .map(|d| Utc::now() + d),
                },
                None => PresetStatus {
                    preset: preset.as_str().to_string(),
                    tracked: false,
                    count: 0,
                    suspicious_activity: 0,
                    is_suspicious,
                    blocked: false,
                    resets_at: None,
                },
            }
        })
        .collect();

    (
        StatusCode::OK,
        success_to_api_response(RateLimitStatusResponse {
            identifier,
            presets,
        }),
    )
}

#[axum::debug_handler]
pub async fn block_identifier(
    State(state): State<AppState>,
    Json(req): Json<BlockRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlockResponse>>), AppError> {
    let identifier = req.identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::Validation("identifier must not be empty".to_string()));
    }
    if req.duration_secs == 0 || req.duration_secs > MAX_BLOCK_SECS {
        return Err(AppError::Validation(format!(
            "duration_secs must be between 1 and {}",
            MAX_BLOCK_SECS
        )));
    }

    state
        .limiter
        .block_client(identifier, Duration::from_secs(req.duration_secs));
    tracing::warn!(
        "Client {} blocked by admin for {}s",
        identifier,
        req.duration_secs
    );

    Ok((
        StatusCode::OK,
        success_to_api_response(BlockResponse {
            identifier: identifier.to_string(),
            blocked_until: Utc::now() + chrono::Duration::seconds(req.duration_secs as i64),
        }),
    ))
}

#[axum::debug_handler]
pub async fn unblock_identifier(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<UnblockResponse>>), AppError> {
    if !state.limiter.unblock_client(&identifier) {
        return Err(AppError::NotFound(format!("rate limit entry for {}", identifier)));
    }
    tracing::info!("Rate limit entry for {} removed by admin", identifier);

    Ok((
        StatusCode::OK,
        success_to_api_response(UnblockResponse {
            identifier,
            removed: true,
        }),
    ))
}
