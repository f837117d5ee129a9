//! View model: composes the stores and the user's selection into what the
//! dashboard renders.
//!
//! Everything here is synchronous and free of I/O so it can be exercised
//! without a terminal.

use crate::classifier::classify;
use crate::model::{Article, CategoryCounts};
use crate::store::{ArticleStore, CategoryStore};
use std::fmt;

/// Sidebar label of the unfiltered entry.
pub const ALL_ARTICLES_LABEL: &str = "All Articles";

/// The category currently chosen for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Category(String),
}

impl Selection {
    /// `"all"` selects everything; any other string names a category.
    pub fn from_name(name: &str) -> Self {
        if name == "all" {
            Self::All
        } else {
            Self::Category(name.to_string())
        }
    }
}

/// One sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub label: String,
    pub count: u64,
    pub selection: Selection,
}

impl fmt::Display for SidebarEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.count)
    }
}

/// What the main pane shows. An error replaces the list entirely.
#[derive(Debug, PartialEq)]
pub enum Panel<'a> {
    Loading,
    Error { message: &'a str },
    Articles(Vec<&'a Article>),
}

/// Articles matching `selection`, in the order received.
pub fn visible_articles<'a>(articles: &'a [Article], selection: &Selection) -> Vec<&'a Article> {
    match selection {
        Selection::All => articles.iter().collect(),
        Selection::Category(name) => articles.iter().filter(|a| classify(a, name)).collect(),
    }
}

/// "All Articles" with the local article count, then every category with a
/// non-zero server-reported count, ordered by name.
///
/// Category counts are shown as reported and are not reconciled with
/// [`classify`]; filtering by a category can show a different number.
pub fn sidebar_entries(article_count: usize, counts: &CategoryCounts) -> Vec<SidebarEntry> {
    let mut entries = Vec::with_capacity(counts.len() + 1);
    entries.push(SidebarEntry {
        label: ALL_ARTICLES_LABEL.to_string(),
        count: article_count as u64,
        selection: Selection::All,
    });
    entries.extend(
        counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, &count)| SidebarEntry {
                label: name.clone(),
                count,
                selection: Selection::Category(name.clone()),
            }),
    );
    entries
}

/// Stores plus selection. The selection survives refreshes.
#[derive(Debug, Default)]
pub struct ViewModel {
    articles: ArticleStore,
    categories: CategoryStore,
    selection: Selection,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &ArticleStore {
        &self.articles
    }

    pub fn articles_mut(&mut self) -> &mut ArticleStore {
        &mut self.articles
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryStore {
        &mut self.categories
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select(&mut self, selection: Selection) {
        tracing::debug!(selection = ?selection, "Selection changed");
        self.selection = selection;
    }

    pub fn visible_articles(&self) -> Vec<&Article> {
        visible_articles(self.articles.articles(), &self.selection)
    }

    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        sidebar_entries(self.articles.articles().len(), self.categories.counts())
    }

    pub fn is_loading(&self) -> bool {
        self.articles.lifecycle().is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.articles.lifecycle().error()
    }

    pub fn panel(&self) -> Panel<'_> {
        if self.is_loading() {
            Panel::Loading
        } else if let Some(message) = self.error() {
            Panel::Error { message }
        } else {
            Panel::Articles(self.visible_articles())
        }
    }
}
