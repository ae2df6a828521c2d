//! Parrot/neon theme tokens for the ParamLab TUI.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, selected range)
//! - **Positive**: Neon green (accepted submissions)
//! - **Negative**: Hot pink (errors)
//! - **Warning**: Neon orange (clamped input, active thumb)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (hints, idle track)

use ratatui::style::{Color, Modifier, Style};

use crate::app::StatusLevel;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Color for a grid value by its position in the domain (0..=1).
    pub fn gradient(&self, frac: f64) -> Color {
        match frac {
            f if f >= 0.75 => self.warning,
            f if f >= 0.5 => self.neutral,
            f if f >= 0.25 => self.accent,
            _ => self.muted,
        }
    }
}

const THEME: Theme = Theme::parrot_neon();

/// Base surface for panels and overlays.
pub fn surface() -> Style {
    Style::default().bg(THEME.background).fg(THEME.text_primary)
}

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn secondary() -> Style {
    Style::default().fg(THEME.text_secondary)
}

pub fn gradient(frac: f64) -> Style {
    Style::default().fg(THEME.gradient(frac))
}

/// Label style for a form field.
pub fn field_label(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        secondary()
    }
}

pub fn panel_border(active: bool) -> Style {
    if active { accent() } else { muted() }
}

pub fn status(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => accent(),
        StatusLevel::Warning => warning(),
        StatusLevel::Error => negative(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_gradient() {
        let theme = Theme::default();
        assert_eq!(theme.gradient(0.0), theme.muted);
        assert_eq!(theme.gradient(0.3), theme.accent);
        assert_eq!(theme.gradient(0.6), theme.neutral);
        assert_eq!(theme.gradient(1.0), theme.warning);
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(status(StatusLevel::Error).fg, Some(THEME.negative));
        assert_eq!(status(StatusLevel::Warning).fg, Some(THEME.warning));
        assert_eq!(field_label(true), accent_bold());
    }
}
