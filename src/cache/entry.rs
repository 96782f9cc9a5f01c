use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<T> {
    pub data: T,
    /// 写入时间，读取时不刷新
    pub timestamp: Instant,
    pub hits: u64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, now: Instant) -> Self {
        Self {
            data,
            timestamp: now,
            hits: 0,
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) > ttl
    }
}
