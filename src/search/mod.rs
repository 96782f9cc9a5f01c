//! 下游搜索服务。AI 搜索的结果会被写入查询缓存。

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpSearchBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// 自然语言查询，由 LLM 解析
    Ai,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, mode: SearchMode) -> Result<SearchResponse, SearchError>;
}
