//! Snapshot stores for fetched articles and category counts.
//!
//! Each store owns an immutable snapshot behind an `Arc` and a [`Lifecycle`].
//! A refresh is split into `begin_refresh` (take a request id, enter Loading)
//! and `apply` (record the outcome), so the network call can run on a spawned
//! task while the store stays on the owning task. Successful results replace
//! the snapshot in a single pointer swap; readers holding the previous `Arc`
//! keep seeing a complete, consistent collection.

use crate::api::{ApiError, NewsClient, NewsPayload};
use crate::lifecycle::{Completion, Lifecycle, RequestId};
use crate::model::{Article, CategoryCounts};
use chrono::{DateTime, Utc};
use std::sync::Arc;

// ============================================================================
// Article Store
// ============================================================================

/// Article collection plus the service's last-updated timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleSnapshot {
    pub articles: Vec<Article>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<NewsPayload> for ArticleSnapshot {
    fn from(payload: NewsPayload) -> Self {
        Self {
            articles: payload.articles,
            last_updated: payload.last_updated,
        }
    }
}

/// Holds the article collection and gates the user-visible loading/error state.
#[derive(Debug, Default)]
pub struct ArticleStore {
    snapshot: Arc<ArticleSnapshot>,
    lifecycle: Lifecycle,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Cloning the `Arc` is O(1).
    pub fn snapshot(&self) -> Arc<ArticleSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn articles(&self) -> &[Article] {
        &self.snapshot.articles
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot.last_updated
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Enter Loading and return the id the completion must carry.
    pub fn begin_refresh(&mut self) -> RequestId {
        let id = self.lifecycle.begin();
        tracing::debug!(request = id.value(), "Article refresh started");
        id
    }

    /// Record the outcome of request `id`.
    ///
    /// On success the snapshot is replaced wholesale. On failure the previous
    /// snapshot is kept and the lifecycle carries the error message. Stale
    /// completions change nothing.
    pub fn apply(&mut self, id: RequestId, result: Result<NewsPayload, ApiError>) -> Completion {
        match result {
            Ok(payload) => {
                let completion = self.lifecycle.succeed(id, Utc::now());
                if completion == Completion::Applied {
                    let snapshot = ArticleSnapshot::from(payload);
                    tracing::info!(
                        request = id.value(),
                        articles = snapshot.articles.len(),
                        "Article snapshot replaced"
                    );
                    self.snapshot = Arc::new(snapshot);
                }
                completion
            }
            Err(e) => {
                let completion = self.lifecycle.fail(id, e.to_string());
                if completion == Completion::Applied {
                    tracing::warn!(
                        request = id.value(),
                        kind = ?e.kind(),
                        error = %e,
                        "Article refresh failed, keeping previous articles"
                    );
                }
                completion
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn refresh(&mut self, client: &NewsClient) -> Completion {
        let id = self.begin_refresh();
        let result = client.fetch_news().await;
        self.apply(id, result)
    }
}

// ============================================================================
// Category Store
// ============================================================================

/// Holds server-reported category counts.
///
/// Failures are logged and otherwise swallowed: the counts are an optional
/// enhancement and never drive the visible error state.
#[derive(Debug, Default)]
pub struct CategoryStore {
    counts: Arc<CategoryCounts>,
    lifecycle: Lifecycle,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn begin_refresh(&mut self) -> RequestId {
        self.lifecycle.begin()
    }

    /// Record the outcome of request `id`. A failure empties the counts so the
    /// sidebar falls back to "All Articles" alone.
    pub fn apply(
        &mut self,
        id: RequestId,
        result: Result<CategoryCounts, ApiError>,
    ) -> Completion {
        match result {
            Ok(counts) => {
                let completion = self.lifecycle.succeed(id, Utc::now());
                if completion == Completion::Applied {
                    tracing::debug!(
                        request = id.value(),
                        categories = counts.len(),
                        "Category counts replaced"
                    );
                    self.counts = Arc::new(counts);
                }
                completion
            }
            Err(e) => {
                let completion = self.lifecycle.fail(id, e.to_string());
                if completion == Completion::Applied {
                    tracing::warn!(
                        error = %e,
                        "Failed to fetch categories, sidebar shows articles only"
                    );
                    self.counts = Arc::new(CategoryCounts::new());
                }
                completion
            }
        }
    }

    pub async fn refresh(&mut self, client: &NewsClient) -> Completion {
        let id = self.begin_refresh();
        let result = client.fetch_categories().await;
        self.apply(id, result)
    }
}
