//! Palette for the vendor dashboard.
//!
//! Light and dark variants, picked from the terminal background.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{ScoreBand, ScoreBands};

/// One colour per score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPalette {
    pub healthy: Color,
    pub warning: Color,
    pub critical: Color,
}

impl BandPalette {
    pub fn color(&self, band: ScoreBand) -> Color {
        match band {
            ScoreBand::Healthy => self.healthy,
            ScoreBand::Warning => self.warning,
            ScoreBand::Critical => self.critical,
        }
    }
}

/// Colours and styles for the dashboard.
///
/// Use [`Theme::auto_detect()`] to follow the terminal background, or
/// [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for the active tab, focused pane and status messages.
    pub highlight: Color,
    pub border: Color,
    pub header: Style,
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
    /// Score colours.
    pub bands: BandPalette,
    /// Missing-data flags, the equal-weight fallback and unbudgeted rows.
    pub flag: Color,
    /// Load errors.
    pub error: Color,
    /// Invoiced above budget.
    pub over_budget: Color,
    /// Invoiced below budget.
    pub under_budget: Color,
    /// Per-vendor chart series, cycled.
    pub series: [Color; 6],
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            bands: BandPalette {
                healthy: Color::Green,
                warning: Color::Yellow,
                critical: Color::Red,
            },
            flag: Color::LightYellow,
            error: Color::LightRed,
            over_budget: Color::Red,
            under_budget: Color::Green,
            series: [
                Color::Cyan,
                Color::Magenta,
                Color::LightGreen,
                Color::LightYellow,
                Color::LightBlue,
                Color::LightRed,
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            bands: BandPalette {
                healthy: Color::Green,
                // Yellow is unreadable on a light background
                warning: Color::Indexed(130),
                critical: Color::Red,
            },
            flag: Color::Indexed(130),
            error: Color::Red,
            over_budget: Color::Red,
            under_budget: Color::Green,
            series: [
                Color::Blue,
                Color::Magenta,
                Color::Green,
                Color::Red,
                Color::Cyan,
                Color::DarkGray,
            ],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a score band. Critical is bold.
    pub fn band_style(&self, band: ScoreBand) -> Style {
        let style = Style::default().fg(self.bands.color(band));
        match band {
            ScoreBand::Critical => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    /// Style for a raw 0-100 score under the given cut-offs.
    pub fn score_style(&self, score: f64, bands: &ScoreBands) -> Style {
        self.band_style(bands.classify(score))
    }

    pub fn flag_style(&self) -> Style {
        Style::default().fg(self.flag)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Color for the `index`-th chart series.
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }

    /// Budget variance: over budget, under budget, or on target.
    pub fn variance_style(&self, variance: f64) -> Style {
        if variance > 0.0 {
            Style::default().fg(self.over_budget)
        } else if variance < 0.0 {
            Style::default().fg(self.under_budget)
        } else {
            Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_color_wraps() {
        let theme = Theme::dark();
        assert_eq!(theme.series_color(0), theme.series_color(6));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_band_style() {
        let theme = Theme::light();
        assert_eq!(theme.band_style(ScoreBand::Healthy).fg, Some(Color::Green));
        let critical = theme.band_style(ScoreBand::Critical);
        assert_eq!(critical.fg, Some(Color::Red));
        assert!(critical.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_score_style_follows_cutoffs() {
        let theme = Theme::dark();
        let bands = ScoreBands::default();
        assert_eq!(theme.score_style(85.0, &bands).fg, Some(theme.bands.healthy));
        assert_eq!(theme.score_style(55.0, &bands).fg, Some(theme.bands.warning));
        assert_eq!(theme.score_style(10.0, &bands).fg, Some(theme.bands.critical));
    }

    #[test]
    fn test_variance_colours() {
        let theme = Theme::dark();
        assert_eq!(theme.variance_style(200.0).fg, Some(theme.over_budget));
        assert_eq!(theme.variance_style(-50.0).fg, Some(theme.under_budget));
        assert_eq!(theme.variance_style(0.0).fg, None);
    }
}
