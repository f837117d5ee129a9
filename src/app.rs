use crate::api::{ApiError, NewsClient, NewsPayload};
use crate::lifecycle::{Completion, RequestId};
use crate::model::{Article, CategoryCounts};
use crate::tasks::{spawn_article_fetch, spawn_category_fetch};
use crate::view::{SidebarEntry, ViewModel};
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// `/api/news` completed for the refresh started with `request`.
    ArticlesFetched {
        request: RequestId,
        result: Result<NewsPayload, ApiError>,
    },
    /// `/api/categories` completed for the refresh started with `request`.
    CategoriesFetched {
        request: RequestId,
        result: Result<CategoryCounts, ApiError>,
    },
}

/// Which pane navigation keys act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Articles,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// Owned by a single task; background fetches report through [`AppEvent`]
/// and are applied by [`App::handle_event`].
pub struct App {
    pub client: NewsClient,
    pub view: ViewModel,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub focus: Focus,
    /// Index into the visible articles; clamped on read.
    article_cursor: usize,
}

impl App {
    pub fn new(client: NewsClient) -> Self {
        Self {
            client,
            view: ViewModel::new(),
            status_message: None,
            needs_redraw: true,
            focus: Focus::default(),
            article_cursor: 0,
        }
    }

    /// Issue the article and category refreshes concurrently. Either may
    /// complete first.
    pub fn start(&mut self, tx: &mpsc::Sender<AppEvent>) {
        tracing::info!(api = %self.client.base_url(), "Starting initial refresh");
        self.refresh_articles(tx);
        self.refresh_categories(tx);
    }

    /// Manual refresh: reissues the article fetch only. An in-flight
    /// category fetch is left running.
    pub fn refresh_articles(&mut self, tx: &mpsc::Sender<AppEvent>) -> RequestId {
        let request = self.view.articles_mut().begin_refresh();
        spawn_article_fetch(self.client.clone(), request, tx.clone());
        self.needs_redraw = true;
        request
    }

    pub fn refresh_categories(&mut self, tx: &mpsc::Sender<AppEvent>) -> RequestId {
        let request = self.view.categories_mut().begin_refresh();
        spawn_category_fetch(self.client.clone(), request, tx.clone());
        request
    }

    /// Apply a background task result.
    pub fn handle_event(&mut self, event: AppEvent) -> Completion {
        self.needs_redraw = true;
        match event {
            AppEvent::ArticlesFetched { request, result } => {
                let succeeded = result.is_ok();
                let completion = self.view.articles_mut().apply(request, result);
                if completion == Completion::Applied && succeeded {
                    self.article_cursor = 0;
                    let count = self.view.articles().articles().len();
                    self.set_status(format!("Loaded {} articles", count));
                }
                completion
            }
            AppEvent::CategoriesFetched { request, result } => {
                self.view.categories_mut().apply(request, result)
            }
        }
    }

    /// Sidebar rows with the index of the row matching the selection, if shown.
    pub fn sidebar(&self) -> (Vec<SidebarEntry>, Option<usize>) {
        let entries = self.view.sidebar_entries();
        let selected = entries
            .iter()
            .position(|e| &e.selection == self.view.selection());
        (entries, selected)
    }

    /// Move the selection `delta` rows through the sidebar, clamped to its ends.
    ///
    /// When the selected category is no longer listed, movement starts from
    /// "All Articles".
    pub fn move_selection(&mut self, delta: isize) {
        let (entries, selected) = self.sidebar();
        let Some(last) = entries.len().checked_sub(1) else {
            return;
        };
        let current = selected.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        if selected != Some(next) {
            self.view.select(entries[next].selection.clone());
            self.article_cursor = 0;
            self.needs_redraw = true;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Articles,
            Focus::Articles => Focus::Sidebar,
        };
        self.needs_redraw = true;
    }

    /// Cursor position within the visible articles, or `None` when the list is empty.
    pub fn article_cursor(&self) -> Option<usize> {
        let len = self.view.visible_articles().len();
        len.checked_sub(1).map(|last| self.article_cursor.min(last))
    }

    pub fn selected_article(&self) -> Option<&Article> {
        let index = self.article_cursor()?;
        self.view.visible_articles().get(index).copied()
    }

    /// Move the article cursor `delta` rows, clamped to the visible list.
    pub fn move_article_cursor(&mut self, delta: isize) {
        let Some(current) = self.article_cursor() else {
            return;
        };
        let last = self.view.visible_articles().len() - 1;
        let next = current.saturating_add_signed(delta).min(last);
        if next != self.article_cursor {
            self.article_cursor = next;
            self.needs_redraw = true;
        }
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop the status message once it has been shown long enough.
    /// Returns true when a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, set_at)) if set_at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }
}
