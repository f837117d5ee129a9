use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const SIDEBAR_HINTS: &str = "[j/k]category [Tab]articles [J/K]scroll [o]pen [r]efresh [q]uit";
const ARTICLE_HINTS: &str = "[j/k]article [PgUp/PgDn]page [Tab]categories [o]pen [r]efresh [q]uit";

/// Render the status bar: the latest status message, or key hints for the
/// focused pane.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text = match &app.status_message {
        Some((msg, _)) => msg.as_ref(),
        None => match app.focus {
            Focus::Sidebar => SIDEBAR_HINTS,
            Focus::Articles => ARTICLE_HINTS,
        },
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
