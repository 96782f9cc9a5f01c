use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache;
use crate::error::ConfigError;
use crate::limiter::{self, RateLimitPolicy, RateLimitPreset, RateLimitPresets};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub rate_limits: RateLimitPresets,
    pub rate_limit_sweep_interval: Duration,
    /// 可疑标识自动封禁时长，None 表示不自动封禁
    pub suspicious_block: Option<Duration>,
    pub query_cache_max_size: usize,
    pub query_cache_ttl: Duration,
    pub query_cache_sweep_interval: Duration,
    pub search_backend_url: String,
    pub search_backend_timeout: Duration,
    pub admin_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            rate_limits: RateLimitPresets::default(),
            rate_limit_sweep_interval: limiter::DEFAULT_SWEEP_INTERVAL,
            suspicious_block: Some(Duration::from_secs(3600)),
            query_cache_max_size: cache::DEFAULT_MAX_SIZE,
            query_cache_ttl: cache::DEFAULT_TTL,
            query_cache_sweep_interval: cache::DEFAULT_SWEEP_INTERVAL,
            search_backend_url: String::new(),
            search_backend_timeout: Duration::from_secs(30),
            admin_token: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let defaults = Config::default();

        let api_base_uri = optional("API_BASE_URI").unwrap_or(defaults.api_base_uri);
        if !api_base_uri.starts_with('/') {
            return Err(ConfigError::invalid("API_BASE_URI", "must start with '/'"));
        }

        let suspicious_block_secs: u64 = parse_or("SUSPICIOUS_BLOCK_SECS", 3600)?;

        Ok(Config {
            server_host: optional("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or("SERVER_PORT", defaults.server_port)?,
            api_base_uri,
            rate_limits: RateLimitPresets {
                ai_search: preset_from_env(
                    RateLimitPreset::AiSearch,
                    "RATE_LIMIT_AI_REQUESTS",
                    "RATE_LIMIT_AI_WINDOW",
                )?,
                search: preset_from_env(
                    RateLimitPreset::Search,
                    "RATE_LIMIT_SEARCH_REQUESTS",
                    "RATE_LIMIT_SEARCH_WINDOW",
                )?,
                api: preset_from_env(
                    RateLimitPreset::Api,
                    "RATE_LIMIT_API_REQUESTS",
                    "RATE_LIMIT_API_WINDOW",
                )?,
            },
            rate_limit_sweep_interval: secs_or(
                "RATE_LIMIT_SWEEP_INTERVAL",
                defaults.rate_limit_sweep_interval,
            )?,
            suspicious_block: match suspicious_block_secs {
                0 => None,
                secs => Some(bounded_secs("SUSPICIOUS_BLOCK_SECS", secs)?),
            },
            query_cache_max_size: parse_or(
                "QUERY_CACHE_MAX_SIZE",
                defaults.query_cache_max_size,
            )?,
            query_cache_ttl: secs_or("QUERY_CACHE_TTL", defaults.query_cache_ttl)?,
            query_cache_sweep_interval: secs_or(
                "QUERY_CACHE_SWEEP_INTERVAL",
                defaults.query_cache_sweep_interval,
            )?,
            search_backend_url: required("SEARCH_BACKEND_URL")?,
            search_backend_timeout: secs_or(
                "SEARCH_BACKEND_TIMEOUT",
                defaults.search_backend_timeout,
            )?,
            admin_token: required("ADMIN_TOKEN")?,
        })
    }

    pub fn rate_limit_policy(&self, preset: RateLimitPreset) -> RateLimitPolicy {
        self.rate_limits.policy(preset)
    }
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
        None => Ok(default),
    }
}

/// 以秒为单位的时长，不允许为 0
fn secs_or(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(name, default.as_secs())?;
    bounded_secs(name, secs)
}

fn bounded_secs(name: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    if secs > limiter::MAX_DURATION.as_secs() {
        return Err(ConfigError::invalid(
            name,
            format!("must not exceed {}", limiter::MAX_DURATION.as_secs()),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn preset_from_env(
    preset: RateLimitPreset,
    requests_var: &'static str,
    window_var: &'static str,
) -> Result<RateLimitPolicy, ConfigError> {
    let default = preset.default_policy();

    let limit = parse_or(requests_var, default.limit())?;
    let window = secs_or(window_var, default.window())?;
    RateLimitPolicy::new(limit, window)
        .map_err(|e| ConfigError::invalid(requests_var, e.to_string()))
}
