//! Keyboard handling.

use crate::app::{App, AppEvent, Focus};
use crate::util::validate_link_for_open;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Rows moved by PageUp/PageDown in the article list
const PAGE_ROWS: isize = 10;

/// Apply one key press to the app.
///
/// `j`/`k`, the arrow keys and Home/End move within the focused pane and
/// `Tab` switches panes. `J`/`K` and PageUp/PageDown scroll the articles
/// from either pane. `o`/Enter opens the selected article's link, `r`
/// re-fetches the articles, `q`, `Esc` and `Ctrl+C` quit.
pub(super) fn handle_input(
    app: &mut App,
    key: KeyEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Windows reports both press and release
    if key.kind == KeyEventKind::Release {
        return Action::Continue;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => move_focused(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_focused(app, -1),
        KeyCode::Home | KeyCode::Char('g') => move_focused(app, isize::MIN),
        KeyCode::End | KeyCode::Char('G') => move_focused(app, isize::MAX),
        KeyCode::Char('J') => app.move_article_cursor(1),
        KeyCode::Char('K') => app.move_article_cursor(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.move_article_cursor(PAGE_ROWS),
        KeyCode::PageUp => app.move_article_cursor(-PAGE_ROWS),
        KeyCode::Char('o') | KeyCode::Enter => open_selected_article(app),
        KeyCode::Char('r') => {
            let request = app.refresh_articles(event_tx);
            tracing::info!(request = request.value(), "Manual refresh");
            app.set_status("Refreshing...");
        }
        _ => {}
    }
    Action::Continue
}

fn move_focused(app: &mut App, delta: isize) {
    match app.focus {
        Focus::Sidebar => app.move_selection(delta),
        Focus::Articles => app.move_article_cursor(delta),
    }
}

fn open_selected_article(app: &mut App) {
    let Some(link) = app.selected_article().map(|a| a.link.clone()) else {
        app.set_status("No article selected");
        return;
    };

    // Only validated http(s) URLs reach the platform opener
    match validate_link_for_open(&link) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opening article in browser..."),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NewsClient, NewsPayload};
    use crate::config::Config;
    use crate::model::Article;
    use crate::view::Selection;
    use chrono::Utc;

    fn test_app() -> App {
        let config = Config {
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        App::new(NewsClient::with_http_client(reqwest::Client::new(), &config))
    }

    fn article(id: usize, link: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Item{}", id),
            content: String::new(),
            source: "Test".to_string(),
            published: Utc::now(),
            link: link.to_string(),
            sentiment: None,
            ai_summary: None,
            summary: None,
        }
    }

    fn load(app: &mut App, articles: Vec<Article>) {
        let request = app.view.articles_mut().begin_refresh();
        app.handle_event(AppEvent::ArticlesFetched {
            request,
            result: Ok(NewsPayload {
                articles,
                last_updated: None,
            }),
        });
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn status(app: &App) -> Option<&str> {
        app.status_message.as_ref().map(|(m, _)| m.as_ref())
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        assert_eq!(handle_input(&mut app, press(KeyCode::Char('q')), &tx), Action::Quit);
        assert_eq!(handle_input(&mut app, press(KeyCode::Esc), &tx), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_input(&mut app, ctrl_c, &tx), Action::Quit);
        assert_eq!(handle_input(&mut app, press(KeyCode::Char('c')), &tx), Action::Continue);
    }

    #[tokio::test]
    async fn test_refresh_key_reissues_articles_only() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        let action = handle_input(&mut app, press(KeyCode::Char('r')), &tx);

        assert_eq!(action, Action::Continue);
        assert!(app.view.is_loading());
        assert!(!app.view.categories().lifecycle().is_loading());
        assert_eq!(status(&app), Some("Refreshing..."));
    }

    #[tokio::test]
    async fn test_navigation_with_only_all_entry_stays_put() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        handle_input(&mut app, press(KeyCode::Char('j')), &tx);
        handle_input(&mut app, press(KeyCode::End), &tx);
        assert_eq!(app.view.selection(), &Selection::All);
    }

    #[tokio::test]
    async fn test_focused_articles_take_navigation_keys() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        load(&mut app, (0..30).map(|i| article(i, "")).collect());

        handle_input(&mut app, press(KeyCode::Down), &tx);
        assert_eq!(app.article_cursor(), Some(0));

        handle_input(&mut app, press(KeyCode::Tab), &tx);
        handle_input(&mut app, press(KeyCode::Down), &tx);
        handle_input(&mut app, press(KeyCode::Char('j')), &tx);
        assert_eq!(app.article_cursor(), Some(2));

        handle_input(&mut app, press(KeyCode::End), &tx);
        assert_eq!(app.article_cursor(), Some(29));
        handle_input(&mut app, press(KeyCode::Char('g')), &tx);
        assert_eq!(app.article_cursor(), Some(0));
        assert_eq!(app.view.selection(), &Selection::All);
    }

    #[tokio::test]
    async fn test_page_keys_scroll_from_sidebar() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        load(&mut app, (0..30).map(|i| article(i, "")).collect());

        handle_input(&mut app, press(KeyCode::PageDown), &tx);
        assert_eq!(app.article_cursor(), Some(10));
        handle_input(&mut app, press(KeyCode::Char('J')), &tx);
        assert_eq!(app.article_cursor(), Some(11));
        handle_input(&mut app, press(KeyCode::PageUp), &tx);
        handle_input(&mut app, press(KeyCode::Char('K')), &tx);
        assert_eq!(app.article_cursor(), Some(0));
    }

    #[tokio::test]
    async fn test_open_refuses_non_web_link() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        load(&mut app, vec![article(0, "javascript:alert(1)")]);

        handle_input(&mut app, press(KeyCode::Char('o')), &tx);
        assert_eq!(
            status(&app),
            Some("Refusing to open javascript link (only http/https allowed)")
        );
    }

    #[tokio::test]
    async fn test_open_without_articles() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        handle_input(&mut app, press(KeyCode::Enter), &tx);
        assert_eq!(status(&app), Some("No article selected"));
    }
}
