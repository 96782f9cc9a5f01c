use std::sync::Arc;

use config::Config;
use error::ConfigError;

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod search;
pub mod sweep;
pub mod utils;

use cache::QueryCache;
use limiter::RateLimiter;
use search::{SearchBackend, SearchResponse};
use sweep::SweepHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub limiter: Arc<RateLimiter>,
    pub query_cache: Arc<QueryCache<SearchResponse>>,
    pub search: Arc<dyn SearchBackend>,
}

impl AppState {
    pub fn new(config: Config, search: Arc<dyn SearchBackend>) -> Result<Self, ConfigError> {
        let query_cache = QueryCache::new(config.query_cache_max_size, config.query_cache_ttl)?;

        Ok(Self {
            config: Arc::new(config),
            limiter: Arc::new(RateLimiter::new()),
            query_cache: Arc::new(query_cache),
            search,
        })
    }

    /// 启动限流表和查询缓存的后台清理任务
    pub fn spawn_sweepers(&self) -> Vec<SweepHandle> {
        vec![
            self.limiter
                .spawn_sweeper(self.config.rate_limit_sweep_interval),
            self.query_cache
                .spawn_sweeper(self.config.query_cache_sweep_interval),
        ]
    }
}
