//! Bottom status bar — focused field and last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(format!(" {} ", app.focus.label()), theme::accent_bold()));
    if let Some(id) = app.drag_owner {
        spans.push(Span::styled(
            format!("· {} ", app.selector(id).live_status()),
            theme::warning(),
        ));
    }

    spans.push(Span::raw("| "));

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::styled(msg.as_str(), theme::status(*level)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
