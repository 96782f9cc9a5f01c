//! 进程内限流器。
//!
//! 固定窗口计数：窗口过期后整条记录被替换，所以跨窗口边界的突发流量最多能放行 `2 * limit`
//! 次请求，各接口的限流参数是按这个行为调的。多实例部署时每个进程各自计数。

mod entry;
mod policy;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::sweep::{SweepHandle, spawn_sweep};

use entry::RateLimitEntry;
pub use policy::{RateLimitPolicy, RateLimitPreset, RateLimitPresets};

/// 超过这个拒绝次数即视为可疑
pub const SUSPICIOUS_THRESHOLD: u32 = 5;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// 窗口和封禁时长的上限
pub const MAX_DURATION: Duration = Duration::from_secs(30 * 24 * 3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: Instant,
}

impl RateLimitDecision {
    /// 距离窗口重置还有多久
    pub fn retry_after(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// 某个标识当前的限流状态快照
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub count: u32,
    pub suspicious_activity: u32,
    pub blocked: bool,
    pub resets_in: Duration,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, identifier: &str, policy: RateLimitPolicy) -> RateLimitDecision {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if let Some(entry) = entries
            .get_mut(identifier)
            .filter(|entry| !entry.is_expired(now))
        {
            if entry.count < policy.limit() {
                entry.count += 1;
                return RateLimitDecision {
                    allowed: true,
                    remaining: policy.limit() - entry.count,
                    reset_at: entry.reset_at,
                };
            }

            entry.suspicious_activity = entry.suspicious_activity.saturating_add(1);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: entry.reset_at,
            };
        }

        // 首次请求或窗口已过期，重建记录
        let entry = RateLimitEntry::fresh(now, policy.window());
        entries.insert(identifier.to_string(), entry);

        RateLimitDecision {
            allowed: true,
            remaining: policy.limit() - 1,
            reset_at: entry.reset_at,
        }
    }

    pub fn is_suspicious(&self, identifier: &str) -> bool {
        self.entries
            .lock()
            .get(identifier)
            .is_some_and(|entry| entry.suspicious_activity > SUSPICIOUS_THRESHOLD)
    }

    /// 封禁 `identifier`，在 `duration` 内所有 `check` 都会被拒绝
    pub fn block(&self, identifier: &str, duration: Duration) {
        let entry = RateLimitEntry::blocked(Instant::now(), duration);
        self.entries.lock().insert(identifier.to_string(), entry);
    }

    /// 删除记录，返回之前是否存在
    pub fn unblock(&self, identifier: &str) -> bool {
        self.entries.lock().remove(identifier).is_some()
    }

    /// 在所有档位上封禁同一个客户端
    pub fn block_client(&self, client: &str, duration: Duration) {
        let entry = RateLimitEntry::blocked(Instant::now(), duration);
        let mut entries = self.entries.lock();
        for preset in RateLimitPreset::ALL {
            entries.insert(preset.key(client), entry);
        }
    }

    /// 删除客户端在所有档位上的记录，任一档位存在记录即返回 true
    pub fn unblock_client(&self, client: &str) -> bool {
        let mut entries = self.entries.lock();
        let mut removed = false;
        for preset in RateLimitPreset::ALL {
            removed |= entries.remove(&preset.key(client)).is_some();
        }
        removed
    }

    /// 已过期的记录视为不存在
    pub fn status(&self, identifier: &str) -> Option<RateLimitStatus> {
        let now = Instant::now();
        let entries = self.entries.lock();
        let entry = entries.get(identifier).filter(|e| !e.is_expired(now))?;

        Some(RateLimitStatus {
            count: entry.count,
            suspicious_activity: entry.suspicious_activity,
            blocked: entry.is_blocked(),
            resets_in: entry.reset_at.saturating_duration_since(now),
        })
    }

    /// 清理所有已过期的记录，返回清理数量
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> SweepHandle {
        let limiter = Arc::clone(self);
        spawn_sweep("rate_limiter", period, move || limiter.sweep())
    }
}
