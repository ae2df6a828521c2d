//! Dual-thumb interval selector widget.
//!
//! Three rows: label and live status, the track, the domain scale.
//!
//! ```text
//! Temperature   Minimum 0.70, Maximum 1.00
//!  ─────────────────●━━━━━━━●──────────────────
//!  0.00                                    2.00
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Widget;

use paramlab_core::{IntervalSelector, Thumb};

use crate::theme;

pub struct IntervalWidget<'a> {
    selector: &'a IntervalSelector,
    label: &'a str,
    focused: bool,
}

impl<'a> IntervalWidget<'a> {
    pub fn new(selector: &'a IntervalSelector, label: &'a str) -> Self {
        Self {
            selector,
            label,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Column of a thumb at `pct` percent along a track `width` cells wide.
pub fn thumb_column(track: Rect, pct: f64) -> u16 {
    let span = f64::from(track.width.saturating_sub(1));
    track.x + ((pct / 100.0) * span).round().clamp(0.0, span) as u16
}

impl Widget for IntervalWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 3 {
            return;
        }
        let sel = self.selector;

        // Header
        let label = format!("{:<13}", self.label);
        buf.set_string(area.x, area.y, &label, theme::field_label(self.focused));
        let mut status = sel.live_status();
        if let Some(thumb) = sel.active_thumb() {
            status.push_str(&format!("  [dragging {}]", thumb.label()));
        }
        if (label.len() as u16) < area.width {
            buf.set_string(
                area.x + label.len() as u16,
                area.y,
                truncate(&status, area.width - label.len() as u16),
                theme::text(),
            );
        }
        if area.height < 2 {
            return;
        }

        // Track
        let track = Rect::new(area.x + 1, area.y + 1, area.width - 2, 1);
        let (lo_pct, hi_pct) = sel.thumb_offsets();
        let lo_col = thumb_column(track, lo_pct);
        let hi_col = thumb_column(track, hi_pct);
        for x in track.x..track.x + track.width {
            let (sym, style) = if x > lo_col && x < hi_col {
                ("━", theme::accent())
            } else {
                ("─", theme::muted())
            };
            buf.set_string(x, track.y, sym, style);
        }
        let thumb_style = |thumb: Thumb| {
            if sel.active_thumb() == Some(thumb) {
                theme::warning().add_modifier(Modifier::BOLD)
            } else if self.focused {
                theme::accent_bold()
            } else {
                theme::accent()
            }
        };
        buf.set_string(lo_col, track.y, "●", thumb_style(Thumb::Left));
        if hi_col != lo_col {
            buf.set_string(hi_col, track.y, "●", thumb_style(Thumb::Right));
        }
        if area.height < 3 {
            return;
        }

        // Scale
        let domain = sel.domain();
        let min = format!("{:.2}", domain.min());
        let max = format!("{:.2}", domain.max());
        buf.set_string(track.x, area.y + 2, &min, theme::muted());
        if track.width as usize > min.len() + max.len() {
            let x = track.x + track.width - max.len() as u16;
            buf.set_string(x, area.y + 2, &max, theme::muted());
        }
    }
}

fn truncate(s: &str, width: u16) -> String {
    s.chars().take(width as usize).collect()
}
