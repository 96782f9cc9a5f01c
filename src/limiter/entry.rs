use std::time::Duration;

use tokio::time::Instant;

use super::MAX_DURATION;

/// 单个标识（通常是客户端 IP）在当前窗口内的请求记录
#[derive(Debug, Clone, Copy)]
pub(crate) struct RateLimitEntry {
    pub count: u32,
    /// 窗口结束时间，now >= reset_at 即视为过期
    pub reset_at: Instant,
    /// 超限被拒绝的次数，只会在整条记录被替换时归零
    pub suspicious_activity: u32,
}

impl RateLimitEntry {
    pub fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: deadline(now, window),
            suspicious_activity: 0,
        }
    }

    /// 手动封禁：计数直接拉满
    pub fn blocked(now: Instant, duration: Duration) -> Self {
        Self {
            count: u32::MAX,
            reset_at: deadline(now, duration),
            suspicious_activity: u32::MAX,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }

    pub fn is_blocked(&self) -> bool {
        self.count == u32::MAX
    }
}

/// 超过 [`MAX_DURATION`] 的时长按上限处理
fn deadline(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration.min(MAX_DURATION)).unwrap_or(now)
}
