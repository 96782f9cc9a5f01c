use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub identifier: String,
    pub duration_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockResponse {
    pub identifier: String,
    pub blocked_until: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateLimitStatusResponse {
    pub identifier: String,
    pub presets: Vec<PresetStatus>,
}

/// 单个档位上的计数
#[derive(Debug, Serialize, Deserialize)]
pub struct PresetStatus {
    pub preset: String,
    pub tracked: bool,
    pub count: u32,
    pub suspicious_activity: u32,
    pub is_suspicious: bool,
    pub blocked: bool,
    pub resets_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnblockResponse {
    pub identifier: String,
    pub removed: bool,
}
