//! 查询结果缓存。
//!
//! 键为规范化后的查询串，TTL 从写入时刻起算；容量满时淘汰写入时间最早的一条，
//! 与命中次数无关。

mod entry;
mod key;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use crate::error::ConfigError;
use crate::sweep::{SweepHandle, spawn_sweep};

use entry::CacheEntry;
pub use key::normalize_query;

pub const DEFAULT_MAX_SIZE: usize = 1000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// 缓存状态快照，命中率只统计当前未过期的条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_hits: u64,
    pub hit_rate: f64,
    pub max_size: usize,
    pub ttl_minutes: f64,
}

#[derive(Debug)]
pub struct QueryCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    max_size: usize,
    ttl: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(max_size: usize, ttl: Duration) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::invalid("max_size", "must be at least 1"));
        }
        if ttl.is_zero() {
            return Err(ConfigError::invalid("ttl", "must be greater than zero"));
        }
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            max_size,
            ttl,
        })
    }

    pub fn get(&self, query: &str) -> Option<T> {
        let key = normalize_query(query);
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let entry = entries.get_mut(&key)?;
        if !entry.is_expired(now, self.ttl) {
            entry.hits += 1;
            return Some(entry.data.clone());
        }

        // 过期即删除
        entries.remove(&key);
        None
    }

    pub fn set(&self, query: &str, data: T) {
        let key = normalize_query(query);
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if entries.len() >= self.max_size {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.timestamp)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(key, CacheEntry::new(data, now));
    }

    /// 清理所有过期条目，返回清理数量
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock();

        let mut valid_entries = 0;
        let mut total_hits = 0;
        for entry in entries.values() {
            if !entry.is_expired(now, self.ttl) {
                valid_entries += 1;
                total_hits += entry.hits;
            }
        }

        let hit_rate = if valid_entries > 0 {
            total_hits as f64 / valid_entries as f64
        } else {
            0.0
        };

        CacheStats {
            size: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
            total_hits,
            hit_rate,
            max_size: self.max_size,
            ttl_minutes: self.ttl.as_secs_f64() / 60.0,
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<T: Clone + Send + 'static> QueryCache<T> {
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> SweepHandle {
        let cache = Arc::clone(self);
        spawn_sweep("query_cache", period, move || cache.cleanup())
    }
}
