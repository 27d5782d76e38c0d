//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay,
//! and the placeholders shown when there is nothing to draw.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Focus, View};
use crate::data::ScoreBand;

/// Render the header bar with the KPI line.
///
/// Displays: overall status, top vendor and score, mean score, band counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        let status = if app.load_error.is_some() {
            "| Load failed"
        } else {
            "| Loading..."
        };
        let line = Line::from(vec![
            Span::styled(
                " VENDORWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(status),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let summary = &dashboard.summary;

    let bands = &app.params.bands;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let status_style = summary
        .worst_band()
        .map(|band| app.theme.band_style(band))
        .unwrap_or(dim);

    let (top, top_style) = match (&summary.top_vendor, summary.top_score) {
        (Some(vendor), Some(score)) => (
            format!("{} {}", vendor, format_score(score)),
            app.theme.score_style(score, bands),
        ),
        _ => ("-".to_string(), dim),
    };
    let (mean, mean_style) = match summary.mean_score {
        Some(score) => (format_score(score), app.theme.score_style(score, bands)),
        None => ("-".to_string(), dim),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("VENDORWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ top "),
        Span::styled(top, top_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ avg "),
        Span::styled(mean, mean_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        band_count(app, summary.healthy, ScoreBand::Healthy),
        Span::raw(" ok "),
        band_count(app, summary.warning, ScoreBand::Warning),
        Span::raw(" warn "),
        band_count(app, summary.critical, ScoreBand::Critical),
        Span::raw(" crit │ "),
        Span::styled(
            format!("{}/{}", dashboard.ranking.len(), dashboard.universe_size),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" vendors"),
        if dashboard.weights.fallback {
            Span::styled(" │ equal weights", app.theme.flag_style())
        } else {
            Span::raw("")
        },
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn band_count(app: &App, count: usize, band: ScoreBand) -> Span<'static> {
    if count > 0 {
        Span::styled(count.to_string(), app.theme.band_style(band))
    } else {
        Span::styled("0", Style::default().add_modifier(Modifier::DIM))
    }
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{}:{}", i + 1, view.label())))
        .collect();

    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, focused pane, available controls. Temporary status
/// messages and load errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let text = format!(" Error: {} | q:quit r:retry", err);
        let paragraph = Paragraph::new(text).style(app.theme.error_style());
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.focus {
        Focus::Content => match app.current_view {
            View::Ranking => "↑↓:select Enter:detail f:focus Tab:switch r:refresh e:export ?:help q:quit",
            _ => "↑↓:select f:focus Tab:switch r:refresh e:export ?:help q:quit",
        },
        Focus::Weights => "↑↓:weight ←→/+-:adjust 0:reset f:focus Esc:content",
        Focus::Vendors => "↑↓:vendor space:toggle a:all n:none f:focus Esc:content",
    };

    let status = format!(
        " {} | {} > {} | {}",
        app.source_description(),
        app.current_view.label(),
        app.focus.label(),
        controls,
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the placeholder for a view with nothing to show.
pub fn render_no_data(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let message = if app.dashboard.is_none() {
        match &app.load_error {
            Some(err) => format!("No data loaded.\n\n{}", err),
            None => "Loading...".to_string(),
        }
    } else {
        "No data for the current selection.\n\nPress f twice to focus vendors, then a to select all."
            .to_string()
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  1-4         Jump to view"),
        Line::from("  ↑/↓ j/k     Move in focused pane"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  f           Cycle focus"),
        Line::from("  Enter       Vendor detail"),
        Line::from("  Esc         Close / back"),
        Line::from(""),
        section(" Weights pane"),
        Line::from("  ←/→ +/-     Adjust by 0.01"),
        Line::from("  0           Reset weights"),
        Line::from(""),
        section(" Vendors pane"),
        Line::from("  space       Toggle vendor"),
        Line::from("  a / n       Select all / none"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 28u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Format a 0-100 score with one decimal.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Format a dollar amount for display (e.g., 1234 -> "$1.2K", -2500000 -> "-$2.5M").
pub fn format_usd(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= 1_000_000.0 {
        format!("{}${:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}${:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}${:.0}", sign, abs)
    }
}

/// Format a fraction as a percentage.
pub fn format_pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
