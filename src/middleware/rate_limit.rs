use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::AppError,
    limiter::{RateLimitDecision, RateLimitPolicy, RateLimitPreset, RateLimiter},
};

use super::client_ip::client_identifier;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// 某一组路由使用的限流档位
#[derive(Clone)]
pub struct RateLimitGuard {
    limiter: Arc<RateLimiter>,
    preset: RateLimitPreset,
    policy: RateLimitPolicy,
    suspicious_block: Option<Duration>,
}

impl RateLimitGuard {
    pub fn new(state: &AppState, preset: RateLimitPreset) -> Self {
        Self {
            limiter: state.limiter.clone(),
            preset,
            policy: state.config.rate_limit_policy(preset),
            suspicious_block: state.config.suspicious_block,
        }
    }

    pub async fn check_rate_limit(&self, req: Request<Body>, next: Next) -> Response {
        let identifier = client_identifier(req.headers());
        let key = self.preset.key(&identifier);
        let decision = self.limiter.check(&key, self.policy);

        if !decision.allowed {
            let retry_after = decision.retry_after();
            tracing::warn!(
                "Rate limit exceeded - client: {}, preset: {}, retry in {:?}",
                identifier,
                self.preset.as_str(),
                retry_after
            );

            if let Some(duration) = self.suspicious_block {
                if self.limiter.is_suspicious(&key) {
                    tracing::warn!(
                        "Blocking suspicious client {} on all presets for {}s",
                        identifier,
                        duration.as_secs()
                    );
                    self.limiter.block_client(&identifier, duration);
                }
            }

            let mut response = AppError::RateLimited {
                retry_after_secs: ceil_secs(retry_after),
            }
            .into_response();
            self.apply_headers(response.headers_mut(), &decision);
            return response;
        }

        tracing::debug!(
            "Rate limit ok - client: {}, preset: {}, remaining: {}",
            identifier,
            self.preset.as_str(),
            decision.remaining
        );

        let mut response = next.run(req).await;
        self.apply_headers(response.headers_mut(), &decision);
        response
    }

    fn apply_headers(&self, headers: &mut HeaderMap, decision: &RateLimitDecision) {
        headers.insert(LIMIT_HEADER, HeaderValue::from(self.policy.limit()));
        headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
        headers.insert(
            RESET_HEADER,
            HeaderValue::from(ceil_secs(decision.retry_after())),
        );
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs + 1 } else { secs }
}

pub async fn rate_limit(
    State(guard): State<RateLimitGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    guard.check_rate_limit(req, next).await
}
