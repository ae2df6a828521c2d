//! Overlay widgets — parameter grid, text editor, alert.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use paramlab_core::Domain;
use paramlab_runner::PROMPT_LIMIT;

use crate::app::{AppState, EditTarget};
use crate::theme;
use crate::ui::centered_rect;

/// Every materialized ParamSet, temperature-major.
pub fn render_grid(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let sets = app.controller.materialize();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(
            " Parameter Grid ({}) [Esc]close [j/k]scroll ",
            sets.len()
        ))
        .title_style(theme::accent_bold());

    let visible = popup.height.saturating_sub(3) as usize;
    let start = app.grid_scroll.min(sets.len().saturating_sub(1));
    let rows: Vec<Row> = sets
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, s)| {
            Row::new(vec![
                Cell::from(format!("{:>3}", i + 1)).style(theme::muted()),
                Cell::from(format!("{:.2}", s.temperature))
                    .style(theme::gradient(s.temperature / Domain::TEMPERATURE.max())),
                Cell::from(format!("{:.2}", s.top_p))
                    .style(theme::gradient(s.top_p / Domain::TOP_P.max())),
                Cell::from(s.max_tokens.to_string()).style(theme::secondary()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["#", "temperature", "top_p", "max_tokens"]).style(theme::accent_bold()))
    .block(block);

    f.render_widget(table, popup);
}

/// Single-line text editor for the title or prompt.
pub fn render_edit(f: &mut Frame, area: Rect, app: &AppState, target: EditTarget) {
    let popup = centered_rect(70, 30, area);
    f.render_widget(Clear, popup);

    let (name, limit) = match target {
        EditTarget::Title => ("Title", None),
        EditTarget::Prompt => ("Prompt", Some(PROMPT_LIMIT)),
    };
    let count = app.edit_buffer.chars().count();
    let counter = match limit {
        Some(max) => format!(" {count}/{max} "),
        None => format!(" {count} "),
    };
    let over = limit.is_some_and(|max| count > max);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" Edit {name} [Enter]save [Esc]cancel "))
        .title_style(theme::accent_bold())
        .title_bottom(Line::from(Span::styled(
            counter,
            if over { theme::warning() } else { theme::muted() },
        )));

    let text = Line::from(vec![
        Span::styled(app.edit_buffer.as_str(), theme::text()),
        Span::styled("▏", theme::accent()),
    ]);
    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Modal error message.
pub fn render_alert(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(" {title} "))
        .title_style(theme::negative());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::text())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];
    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}
