use serde::{Deserialize, Serialize};

use crate::search::SearchResponse;

/// 查询串最大长度（字符数）
pub const MAX_QUERY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct AiSearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchPayload {
    pub query: String,
    pub cached: bool,
    #[serde(flatten)]
    pub response: SearchResponse,
}
