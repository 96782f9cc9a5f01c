use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppError,
    result::ApiResponse,
    search::SearchMode,
    utils::success_to_api_response,
};

use super::model::{AiSearchRequest, MAX_QUERY_CHARS, SearchPayload, SearchQuery};

fn validate_query(raw: &str) -> Result<&str, AppError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::Validation(format!(
            "query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }
    Ok(query)
}

/// AI 辅助搜索：先查缓存，未命中再调用下游并回写缓存
#[axum::debug_handler]
pub async fn ai_search(
    State(state): State<AppState>,
    Json(req): Json<AiSearchRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SearchPayload>>), AppError> {
    let query = validate_query(&req.query)?;

    if let Some(response) = state.query_cache.get(query) {
        tracing::debug!("Query cache hit: {}", query);
        return Ok((
            StatusCode::OK,
            success_to_api_response(SearchPayload {
                query: query.to_string(),
                cached: true,
                response,
            }),
        ));
    }

    tracing::debug!("Query cache miss: {}", query);
    let response = state.search.search(query, SearchMode::Ai).await?;
    // 只缓存成功的结果
    state.query_cache.set(query, response.clone());

    Ok((
        StatusCode::OK,
        success_to_api_response(SearchPayload {
            query: query.to_string(),
            cached: false,
            response,
        }),
    ))
}

/// 普通关键词搜索，直接转发下游
#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<(StatusCode, Json<ApiResponse<SearchPayload>>), AppError> {
    let query = validate_query(&params.q)?;
    let response = state.search.search(query, SearchMode::Keyword).await?;

    Ok((
        StatusCode::OK,
        success_to_api_response(SearchPayload {
            query: query.to_string(),
            cached: false,
            response,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_and_rejects_blank() {
        assert_eq!(validate_query("  k street  ").unwrap(), "k street");
        assert!(matches!(validate_query("   "), Err(AppError::Validation(_))));
        assert!(validate_query(&"x".repeat(MAX_QUERY_CHARS + 1)).is_err());
        assert!(validate_query(&"x".repeat(MAX_QUERY_CHARS)).is_ok());
    }
}
