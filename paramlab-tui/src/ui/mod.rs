//! Top-level UI layout — experiment form with status bar and overlays.
//!
//! [`form_layout`] is a pure function of the terminal area. Rendering and
//! mouse hit-testing both go through it, so a click lands on exactly what
//! was drawn.

pub mod form_panel;
pub mod overlays;
pub mod status_bar;
pub mod widgets;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use paramlab_core::TrackGeometry;

use crate::app::{AppState, Overlay, SelectorId};

/// Screen regions of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    pub form: Rect,
    pub title: Rect,
    pub prompt: Rect,
    pub temperature: Rect,
    pub temperature_track: Rect,
    pub top_p: Rect,
    pub top_p_track: Rect,
    pub steps: Rect,
    pub provider: Rect,
    pub preview: Rect,
    pub status: Rect,
}

impl FormLayout {
    /// Which selector (if any) a terminal cell belongs to.
    pub fn hit_selector(&self, column: u16, row: u16) -> Option<SelectorId> {
        if contains(self.temperature, column, row) {
            Some(SelectorId::Temperature)
        } else if contains(self.top_p, column, row) {
            Some(SelectorId::TopP)
        } else {
            None
        }
    }
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// The one-row track inside a three-row selector area.
fn track_of(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1).min(area.y + area.height.saturating_sub(1)),
        area.width.saturating_sub(2),
        area.height.min(1),
    )
}

/// Split the terminal area into form regions.
pub fn form_layout(area: Rect) -> FormLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let form = chunks[0];
    let status = chunks[1];

    // Border of the form block.
    let inner = Rect::new(
        form.x.saturating_add(1),
        form.y.saturating_add(1),
        form.width.saturating_sub(2),
        form.height.saturating_sub(2),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // prompt
            Constraint::Length(1),
            Constraint::Length(3), // temperature
            Constraint::Length(3), // top_p
            Constraint::Length(1),
            Constraint::Length(1), // steps
            Constraint::Length(1), // provider
            Constraint::Length(1),
            Constraint::Min(3), // preview
        ])
        .split(inner);

    FormLayout {
        form,
        title: rows[0],
        prompt: rows[1],
        temperature: rows[3],
        temperature_track: track_of(rows[3]),
        top_p: rows[4],
        top_p_track: track_of(rows[4]),
        steps: rows[6],
        provider: rows[7],
        preview: rows[9],
        status,
    }
}

/// Map a track rect to selector geometry: the first column is the domain
/// minimum, the last column the maximum.
pub fn track_geometry(track: Rect) -> TrackGeometry {
    TrackGeometry::new(
        f64::from(track.x),
        f64::from(track.width.saturating_sub(1).max(1)),
    )
}

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let layout = form_layout(f.area());

    form_panel::render(f, &layout, app);
    status_bar::render(f, layout.status, app);

    match &app.overlay {
        Overlay::Grid => overlays::render_grid(f, layout.form, app),
        Overlay::Edit(target) => overlays::render_edit(f, layout.form, app, *target),
        Overlay::Alert { title, message } => {
            overlays::render_alert(f, layout.form, title, message)
        }
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_sit_inside_selector_rows() {
        let layout = form_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.temperature.height, 3);
        assert_eq!(layout.temperature_track.y, layout.temperature.y + 1);
        assert_eq!(layout.temperature_track.x, layout.temperature.x + 1);
        assert_eq!(layout.status.y, 39);
        assert!(layout.top_p.y > layout.temperature.y);
    }

    #[test]
    fn hit_test_distinguishes_selectors() {
        let layout = form_layout(Rect::new(0, 0, 100, 40));
        let t = layout.temperature_track;
        let p = layout.top_p_track;
        assert_eq!(layout.hit_selector(t.x + 3, t.y), Some(SelectorId::Temperature));
        assert_eq!(layout.hit_selector(p.x + 3, p.y), Some(SelectorId::TopP));
        assert_eq!(layout.hit_selector(t.x, layout.title.y), None);
    }

    #[test]
    fn geometry_spans_track_columns() {
        let track = Rect::new(2, 7, 96, 1);
        let g = track_geometry(track);
        assert_eq!(g.left, 2.0);
        assert_eq!(g.width, 95.0);
        assert_eq!(g.value_at(97.0, &paramlab_core::Domain::TOP_P), 1.0);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let layout = form_layout(Rect::new(0, 0, 3, 2));
        let _ = track_geometry(layout.temperature_track);
    }
}
