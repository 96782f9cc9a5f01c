use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};

use crate::{
    AppState,
    limiter::RateLimitPreset,
    middleware::{RateLimitGuard, log_errors, rate_limit, require_admin},
    routes,
};

// 搜索路由，AI 搜索与普通搜索各用一个限流档位
fn search_routes(state: &AppState) -> Router<AppState> {
    let ai = Router::new()
        .route("/search/ai", post(routes::search::ai_search))
        .route_layer(from_fn_with_state(
            RateLimitGuard::new(state, RateLimitPreset::AiSearch),
            rate_limit,
        ));

    let keyword = Router::new()
        .route("/search", get(routes::search::search))
        .route_layer(from_fn_with_state(
            RateLimitGuard::new(state, RateLimitPreset::Search),
            rate_limit,
        ));

    ai.merge(keyword)
}

// 管理路由：先限流再鉴权
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/cache/stats", get(routes::admin::cache_stats))
        .route("/admin/cache", delete(routes::admin::clear_cache))
        .route("/admin/rate-limit/block", post(routes::admin::block_identifier))
        .route(
            "/admin/rate-limit/{identifier}",
            get(routes::admin::rate_limit_status).delete(routes::admin::unblock_identifier),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(
            RateLimitGuard::new(state, RateLimitPreset::Api),
            rate_limit,
        ))
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        .merge(search_routes(&state))
        .merge(admin_routes(&state));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router.layer(from_fn(log_errors)).with_state(state)
}
