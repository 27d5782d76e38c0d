//! Detail overlay rendering.
//!
//! Displays a modal overlay with the score breakdown of the selected vendor.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::common::{format_pct, format_score};
use crate::app::App;
use crate::data::{Component, VendorComposite, CPM_TARGET, VIEWABILITY_BASELINE};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the vendor detail as a modal overlay.
///
/// Shows the vendor's score, band, the five weighted terms of the formula,
/// and which source tables had no data for it.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref dashboard) = app.dashboard else {
        return;
    };
    let Some(vendor) = app.selected_vendor() else {
        return;
    };
    let composite = &vendor.composite;

    let overlay_width = (area.width * 90 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 22);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Header with score and flags
        Constraint::Min(8),    // Breakdown table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let band_style = app.theme.band_style(vendor.band);
    let rank = dashboard.rank_of(vendor.vendor_id()).map_or(0, |r| r + 1);

    let missing_line = if composite.missing.any() {
        let mut spans = vec![
            Span::raw(" Missing: "),
            Span::styled(
                composite.missing.labels().join(", "),
                app.theme.flag_style(),
            ),
        ];
        if composite.missing.optimistic() {
            spans.push(Span::styled(
                "  (filled with 0; CPM/dispute terms score as best case)",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        Line::from(spans)
    } else {
        Line::from(Span::styled(
            " All source tables present",
            Style::default().add_modifier(Modifier::DIM),
        ))
    };

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", vendor.vendor_id()),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw(" Score: "),
            Span::styled(
                format_score(vendor.health_score()),
                band_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("    Rank: {}/{}", rank, dashboard.ranking.len())),
            Span::raw("    Status: "),
            Span::styled(
                format!("{} {}", vendor.band.symbol(), vendor.band.label()),
                band_style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            " Latency: {:.1}h    Raw total: {:.3}",
            composite.avg_latency_hours,
            vendor.breakdown.raw_total()
        )),
        missing_line,
    ];

    let header_block = Block::default()
        .title(" Vendor Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== BREAKDOWN TABLE =====
    let rows: Vec<Row> = Component::ALL
        .iter()
        .map(|component| {
            let term = vendor.breakdown.term(*component);
            let term_style = if term < 0.0 {
                Style::default().fg(app.theme.bands.critical)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(component.label()),
                Cell::from(metric_value(composite, *component)),
                Cell::from(format!("{:.3}", dashboard.weights.get(*component))),
                Cell::from(format!("{:+.3}", term)).style(term_style),
                Cell::from(format!("{:+.1}", term * 100.0)).style(term_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(Row::new(vec!["Component", "Value", "Weight", "Term", "Points"]).style(app.theme.header))
    .block(
        Block::default()
            .title(" Score breakdown ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(table, chunks[1]);

    let footer = Paragraph::new(" ↑↓:next vendor  Esc:close")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}

/// The input a component is computed from, with its reference point.
fn metric_value(c: &VendorComposite, component: Component) -> String {
    match component {
        Component::MatchRate => format_pct(c.match_rate),
        Component::Overlap => format_pct(c.overlap),
        Component::Cpm => format!("{:.2} (target {})", c.cpm, CPM_TARGET),
        Component::Viewability => format!(
            "{} (base {})",
            format_pct(c.viewability),
            format_pct(VIEWABILITY_BASELINE)
        ),
        Component::Disputes => format_pct(c.dispute_rate),
    }
}
