use crate::app::{App, Focus};
use crate::model::{Article, Sentiment};
use crate::util::{single_line, strip_control_chars, strip_html_tags, truncate_to_width};
use crate::view::Panel;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Format `published` relative to `now`: minutes, hours, days, then a date.
pub fn format_relative_time(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - published).num_seconds();

    // Clock skew or future-dated items
    if diff < 60 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    published.format("%b %d").to_string()
}

fn sentiment_marker(sentiment: Option<Sentiment>) -> Span<'static> {
    match sentiment {
        Some(Sentiment::Positive) => Span::styled("+ ", Style::default().fg(Color::Green)),
        Some(Sentiment::Negative) => Span::styled("- ", Style::default().fg(Color::Red)),
        Some(Sentiment::Neutral) => Span::styled("~ ", Style::default().fg(Color::Gray)),
        None => Span::raw("  "),
    }
}

/// Text for the second line of an entry: the AI summary when present,
/// otherwise the article body, otherwise the feed summary with markup removed.
fn summary_text(article: &Article) -> String {
    let raw = article
        .ai_summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| Some(article.content.as_str()).filter(|s| !s.trim().is_empty()))
        .or(article.summary.as_deref())
        .unwrap_or_default();
    single_line(&strip_control_chars(&strip_html_tags(raw)))
}

fn article_item(article: &Article, width: usize, now: DateTime<Utc>) -> ListItem<'static> {
    let time = format_relative_time(article.published, now);
    let source = strip_control_chars(&article.source).into_owned();
    let meta = format!("  {} · {}", source, time);
    let meta_width = unicode_width::UnicodeWidthStr::width(meta.as_str());

    let title = single_line(&strip_control_chars(&article.title));
    let title_width = width.saturating_sub(2 + meta_width);
    let title = truncate_to_width(&title, title_width).into_owned();

    let header = Line::from(vec![
        sentiment_marker(article.sentiment),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(meta, Style::default().fg(Color::DarkGray)),
    ]);

    let summary = summary_text(article);
    let mut lines = vec![header];
    if !summary.is_empty() {
        let summary = truncate_to_width(&summary, width.saturating_sub(2)).into_owned();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(summary, Style::default().fg(Color::Gray)),
        ]));
    }
    ListItem::new(lines)
}

/// Render the main pane from the view model's current panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = match app.view.articles().last_updated() {
        Some(ts) => format!("Articles (updated {})", ts.format("%Y-%m-%d %H:%M UTC")),
        None => "Articles".to_string(),
    };
    let is_focused = app.focus == Focus::Articles;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner_width = area.width.saturating_sub(2) as usize;

    match app.view.panel() {
        Panel::Loading => {
            let paragraph = Paragraph::new("Loading news...")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(paragraph, area);
        }
        Panel::Error { message } => {
            let text = vec![
                Line::styled(
                    strip_control_chars(message).into_owned(),
                    Style::default().fg(Color::Red),
                ),
                Line::raw(""),
                Line::raw("press r to retry"),
            ];
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(paragraph, area);
        }
        Panel::Articles(articles) if articles.is_empty() => {
            let paragraph = Paragraph::new("No articles")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(paragraph, area);
        }
        Panel::Articles(articles) => {
            let now = Utc::now();
            let items: Vec<ListItem> = articles
                .iter()
                .map(|article| article_item(article, inner_width, now))
                .collect();
            let highlight = if is_focused {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default().add_modifier(Modifier::REVERSED)
            };
            let list = List::new(items).block(block).highlight_style(highlight);

            // The list scrolls to keep the cursor row on screen
            let mut state = ListState::default().with_selected(app.article_cursor());
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}
