//! Experiment form: title, prompt, both selectors, steps, provider, preview.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use paramlab_runner::{format_values, MAX_STEPS, MIN_STEPS};

use crate::app::{AppState, Field};
use crate::theme;
use crate::ui::FormLayout;
use crate::ui::widgets::IntervalWidget;

pub fn render(f: &mut Frame, layout: &FormLayout, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" ParamLab · New Experiment ")
        .title_style(theme::accent_bold())
        .style(theme::surface());
    f.render_widget(block, layout.form);

    let focused = |field: Field| app.focus == field;

    render_text_field(f, layout.title, "Title", &app.draft.title, focused(Field::Title), "[t]edit");
    render_text_field(
        f,
        layout.prompt,
        "Prompt",
        &app.draft.prompt,
        focused(Field::Prompt),
        "[e]edit",
    );

    f.render_widget(
        IntervalWidget::new(&app.temperature, "Temperature").focused(focused(Field::Temperature)),
        layout.temperature,
    );
    f.render_widget(
        IntervalWidget::new(&app.top_p, "Top P").focused(focused(Field::TopP)),
        layout.top_p,
    );

    let steps = app.controller.steps();
    let pips: String = (MIN_STEPS..=MAX_STEPS)
        .map(|n| if n <= steps { '■' } else { '□' })
        .collect();
    let steps_line = Line::from(vec![
        Span::styled(format!("{:<13}", "Steps"), theme::field_label(focused(Field::Steps))),
        Span::styled(pips, theme::accent()),
        Span::styled(format!(" {steps}  "), theme::text()),
        Span::styled("[h/l]adjust", theme::muted()),
    ]);
    f.render_widget(Paragraph::new(steps_line), layout.steps);

    let provider_line = Line::from(vec![
        Span::styled(
            format!("{:<13}", "Provider"),
            theme::field_label(focused(Field::Provider)),
        ),
        Span::styled(app.draft.provider.label(), theme::text()),
        Span::styled(format!(" ({})  ", app.draft.effective_model()), theme::secondary()),
        Span::styled("[v]cycle", theme::muted()),
    ]);
    f.render_widget(Paragraph::new(provider_line), layout.provider);

    render_preview(f, layout.preview, app);
}

fn render_text_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    hint: &str,
) {
    let shown = if value.trim().is_empty() {
        Span::styled("(empty)", theme::muted().add_modifier(Modifier::ITALIC))
    } else {
        Span::styled(value.to_string(), theme::text())
    };
    let line = Line::from(vec![
        Span::styled(format!("{label:<13}"), theme::field_label(focused)),
        shown,
        Span::styled(format!("  {hint}"), theme::muted()),
    ]);
    f.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), area);
}

fn render_preview(f: &mut Frame, area: Rect, app: &AppState) {
    let ctl = &app.controller;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Combinations: {}", ctl.combination_count()),
            theme::accent_bold(),
        )),
        Line::from(vec![
            Span::styled("Temperature = ", theme::secondary()),
            Span::styled(format_values(&ctl.temperature_values()), theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Top P       = ", theme::secondary()),
            Span::styled(format_values(&ctl.top_p_values()), theme::text()),
        ]),
        Line::from(Span::styled(
            format!("max_tokens  = {}", ctl.max_tokens()),
            theme::secondary(),
        )),
    ];

    if let Some(last) = app.submissions.front() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Last submission: ", theme::secondary()),
            Span::styled(last.receipt.experiment_id.clone(), theme::positive()),
            Span::styled(
                format!(
                    " ({} responses) at {}",
                    last.receipt.num_responses,
                    last.timestamp.format("%H:%M:%S")
                ),
                theme::muted(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[c/b/p]preset [g]grid [Enter]submit (dry run) [Tab]focus [q]quit",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), area);
}
