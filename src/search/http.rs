use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{SearchBackend, SearchError, SearchMode, SearchResponse};

#[derive(Serialize)]
struct SearchRequestBody<'a> {
    query: &'a str,
    mode: SearchMode,
}

/// 通过 HTTP 调用外部搜索服务
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    url: String,
}

impl HttpSearchBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str, mode: SearchMode) -> Result<SearchResponse, SearchError> {
        tracing::debug!("Forwarding {:?} search to {}", mode, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&SearchRequestBody { query, mode })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Search backend responded with {}", status);
            return Err(SearchError::Status(status.as_u16()));
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}
