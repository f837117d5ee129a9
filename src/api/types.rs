use crate::model::{deserialize_optional_timestamp, Article, CategoryCounts};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Fallback message when the service reports failure without an `error` field.
pub(crate) const NEWS_FAILURE_FALLBACK: &str = "Failed to fetch news";
pub(crate) const CATEGORIES_FAILURE_FALLBACK: &str = "Failed to fetch categories";

// ============================================================================
// Error Types
// ============================================================================

/// Coarse failure classification shown to callers that don't care about detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not complete.
    Network,
    /// The service was reachable but answered unsuccessfully.
    Service,
}

/// Errors from a single service request.
///
/// The `Display` text is the user-visible failure message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, connection, TLS or body transfer failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response, with the service's `error` field when it sent one
    #[error("HTTP error: status {status}{}", detail_suffix(.detail))]
    HttpStatus { status: u16, detail: Option<String> },
    /// 2xx response carrying `success: false`
    #[error("{0}")]
    Service(String),
    /// Body exceeded the configured size limit
    #[error("Response too large (exceeds {0} bytes)")]
    TooLarge(usize),
    /// Body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Network(_) => FailureKind::Network,
            ApiError::HttpStatus { .. }
            | ApiError::Service(_)
            | ApiError::TooLarge(_)
            | ApiError::Decode(_) => FailureKind::Service,
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Successful `/api/news` result.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsPayload {
    pub articles: Vec<Article>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// `/` health probe body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    error: Option<String>,
}

impl NewsEnvelope {
    pub(crate) fn into_payload(self) -> Result<NewsPayload, ApiError> {
        if !self.success {
            return Err(ApiError::Service(service_message(
                self.error,
                NEWS_FAILURE_FALLBACK,
            )));
        }

        if let Some(count) = self.count {
            if count != self.articles.len() {
                tracing::warn!(
                    reported = count,
                    received = self.articles.len(),
                    "Service article count disagrees with payload, using payload"
                );
            }
        }

        Ok(NewsPayload {
            articles: self.articles,
            last_updated: self.last_updated,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    categories: CategoryCounts,
    #[serde(default)]
    error: Option<String>,
}

impl CategoriesEnvelope {
    pub(crate) fn into_counts(self) -> Result<CategoryCounts, ApiError> {
        if !self.success {
            return Err(ApiError::Service(service_message(
                self.error,
                CATEGORIES_FAILURE_FALLBACK,
            )));
        }
        Ok(self.categories)
    }
}

/// Body shape of unsuccessful responses; only `error` is of interest.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extract the service's `error` field from a response body, if any.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}

fn service_message(error: Option<String>, fallback: &str) -> String {
    error
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
