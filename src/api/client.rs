use super::types::{
    error_detail, ApiError, CategoriesEnvelope, HealthStatus, NewsEnvelope, NewsPayload,
};
use crate::config::Config;
use crate::model::CategoryCounts;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the news service's read-only endpoints.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted, so
/// spawned refresh tasks take their own copy.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    hours_back: Option<u32>,
    max_response_bytes: usize,
}

impl NewsClient {
    /// Build a client with pooled keep-alive connections.
    ///
    /// No request timeout is set: a hung request stays in flight until the
    /// service answers or the connection drops.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;
        Ok(Self::with_http_client(http, config))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            hours_back: config.hours_back,
            max_response_bytes: config.max_response_bytes,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/news`.
    ///
    /// Fails on transport errors, non-2xx statuses, `success: false`, and
    /// bodies that don't decode. An empty article list is a success.
    pub async fn fetch_news(&self) -> Result<NewsPayload, ApiError> {
        let url = match self.hours_back {
            Some(hours) => format!("{}/api/news?hours={}", self.base_url, hours),
            None => format!("{}/api/news", self.base_url),
        };

        let envelope: NewsEnvelope = self.get_json(&url).await?;
        let payload = envelope.into_payload()?;
        tracing::info!(
            count = payload.articles.len(),
            last_updated = ?payload.last_updated,
            "Fetched news"
        );
        Ok(payload)
    }

    /// `GET /api/categories`.
    pub async fn fetch_categories(&self) -> Result<CategoryCounts, ApiError> {
        let url = format!("{}/api/categories", self.base_url);
        let envelope: CategoriesEnvelope = self.get_json(&url).await?;
        let counts = envelope.into_counts()?;
        tracing::debug!(categories = counts.len(), "Fetched category counts");
        Ok(counts)
    }

    /// `GET /` health probe.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = format!("{}/", self.base_url);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            // The body is only inspected for an error message; a failed read
            // must not mask the status.
            let detail = read_limited_bytes(response, self.max_response_bytes)
                .await
                .ok()
                .and_then(|body| error_detail(&body));
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                detail = ?detail,
                "Unsuccessful status"
            );
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let body = read_limited_bytes(response, self.max_response_bytes).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(ApiError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
