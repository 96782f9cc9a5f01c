use std::time::Duration;

use crate::error::ConfigError;

use super::MAX_DURATION;

/// 单个限流策略：窗口内最多允许 `limit` 次请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    limit: u32,
    window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window: Duration) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::invalid("limit", "must be at least 1"));
        }
        if window.is_zero() {
            return Err(ConfigError::invalid("window", "must be greater than zero"));
        }
        if window > MAX_DURATION {
            return Err(ConfigError::invalid(
                "window",
                format!("must not exceed {}s", MAX_DURATION.as_secs()),
            ));
        }
        Ok(Self { limit, window })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// 按接口开销划分的限流档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPreset {
    /// AI 辅助搜索，调用成本最高
    AiSearch,
    Search,
    Api,
}

impl RateLimitPreset {
    pub const ALL: [RateLimitPreset; 3] = [
        RateLimitPreset::AiSearch,
        RateLimitPreset::Search,
        RateLimitPreset::Api,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitPreset::AiSearch => "ai_search",
            RateLimitPreset::Search => "search",
            RateLimitPreset::Api => "api",
        }
    }

    /// 限流表里的键，每个档位单独计数
    pub fn key(&self, client: &str) -> String {
        format!("{}:{}", self.as_str(), client)
    }

    pub fn default_policy(&self) -> RateLimitPolicy {
        let limit = match self {
            RateLimitPreset::AiSearch => 10,
            RateLimitPreset::Search => 30,
            RateLimitPreset::Api => 100,
        };
        RateLimitPolicy {
            limit,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPresets {
    pub ai_search: RateLimitPolicy,
    pub search: RateLimitPolicy,
    pub api: RateLimitPolicy,
}

impl RateLimitPresets {
    pub fn policy(&self, preset: RateLimitPreset) -> RateLimitPolicy {
        match preset {
            RateLimitPreset::AiSearch => self.ai_search,
            RateLimitPreset::Search => self.search,
            RateLimitPreset::Api => self.api,
        }
    }
}

impl Default for RateLimitPresets {
    fn default() -> Self {
        Self {
            ai_search: RateLimitPreset::AiSearch.default_policy(),
            search: RateLimitPreset::Search.default_policy(),
            api: RateLimitPreset::Api.default_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_limit_and_window() {
        assert!(RateLimitPolicy::new(0, Duration::from_secs(1)).is_err());
        assert!(RateLimitPolicy::new(1, Duration::ZERO).is_err());
        assert!(RateLimitPolicy::new(1, Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn rejects_window_beyond_cap() {
        assert!(RateLimitPolicy::new(1, MAX_DURATION).is_ok());
        assert!(RateLimitPolicy::new(1, MAX_DURATION + Duration::from_secs(1)).is_err());
        assert!(RateLimitPolicy::new(1, Duration::from_secs(u64::MAX)).is_err());
    }

    #[test]
    fn keys_are_scoped_per_preset() {
        let keys: Vec<String> = RateLimitPreset::ALL
            .iter()
            .map(|preset| preset.key("203.0.113.1"))
            .collect();
        assert_eq!(
            keys,
            vec!["ai_search:203.0.113.1", "search:203.0.113.1", "api:203.0.113.1"]
        );
    }

    #[test]
    fn presets_are_ordered_by_cost() {
        let presets = RateLimitPresets::default();
        assert!(presets.ai_search.limit() < presets.search.limit());
        assert!(presets.search.limit() < presets.api.limit());
        assert_eq!(presets.policy(RateLimitPreset::Api), presets.api);
    }
}
