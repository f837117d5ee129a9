//! Background refresh tasks.
//!
//! Each fetch runs on its own spawned task and reports back over the
//! `AppEvent` channel tagged with the request id it was started with. The
//! owner of the stores applies the event; tasks never touch state directly.

use crate::api::{ApiError, NewsClient};
use crate::app::AppEvent;
use crate::lifecycle::RequestId;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but
/// not handled), panics are converted to `Err(String)` containing the panic
/// message.
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// A panicking fetch still has to leave Loading, so it is reported as a failure.
fn panic_as_error(task: &'static str, request: RequestId, panic_msg: String) -> ApiError {
    tracing::error!(
        task,
        request = request.value(),
        error = %panic_msg,
        "Background task panicked"
    );
    ApiError::Service(format!("Internal error in {} task", task))
}

/// Spawn `GET /api/news` for `request`; the result arrives as `AppEvent::ArticlesFetched`.
pub fn spawn_article_fetch(
    client: NewsClient,
    request: RequestId,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = match catch_task_panic(client.fetch_news()).await {
            Ok(result) => result,
            Err(panic_msg) => Err(panic_as_error("articles", request, panic_msg)),
        };

        if let Err(e) = tx.send(AppEvent::ArticlesFetched { request, result }).await {
            tracing::warn!(
                error = %e,
                event = "ArticlesFetched",
                "Channel send failed (receiver dropped)"
            );
        }
    })
}

/// Spawn `GET /api/categories` for `request`; the result arrives as `AppEvent::CategoriesFetched`.
pub fn spawn_category_fetch(
    client: NewsClient,
    request: RequestId,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = match catch_task_panic(client.fetch_categories()).await {
            Ok(result) => result,
            Err(panic_msg) => Err(panic_as_error("categories", request, panic_msg)),
        };

        if let Err(e) = tx.send(AppEvent::CategoriesFetched { request, result }).await {
            tracing::warn!(
                error = %e,
                event = "CategoriesFetched",
                "Channel send failed (receiver dropped)"
            );
        }
    })
}
