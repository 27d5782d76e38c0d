//! Ranking view rendering.
//!
//! Displays the selected vendors ordered by health score, with the inputs
//! that fed each score and a flag for vendors scored on filled-in data.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common::{format_pct, format_score, render_no_data};
use crate::app::{App, Focus};

/// Render the Ranking view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        render_no_data(frame, app, area, "Ranking");
        return;
    };
    if dashboard.ranking.is_empty() {
        render_no_data(frame, app, area, "Ranking");
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Vendor"),
        Cell::from("Score"),
        Cell::from("Match"),
        Cell::from("Overlap"),
        Cell::from("CPM"),
        Cell::from("View"),
        Cell::from("Disputes"),
        Cell::from("Missing"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = dashboard
        .ranking
        .iter()
        .enumerate()
        .map(|(i, vendor)| {
            let c = &vendor.composite;
            let band_style = app.theme.band_style(vendor.band);
            let missing = c.missing.labels().join(",");
            let missing_style = if c.missing.optimistic() {
                app.theme.flag_style()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(vendor.vendor_id().to_string()),
                Cell::from(format_score(vendor.health_score())).style(band_style),
                Cell::from(format_pct(c.match_rate)),
                Cell::from(format_pct(c.overlap)),
                Cell::from(format!("{:.2}", c.cpm)),
                Cell::from(format_pct(c.viewability)),
                Cell::from(format_pct(c.dispute_rate)),
                Cell::from(if missing.is_empty() { "-".to_string() } else { missing })
                    .style(missing_style),
                Cell::from(vendor.band.symbol()).style(band_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Min(6),
    ];

    let selected = app.selected_index.min(dashboard.ranking.len().saturating_sub(1));
    let title = format!(
        " Vendors by health ({}/{}) [{}/{}] ",
        dashboard.ranking.len(),
        dashboard.universe_size,
        selected + 1,
        dashboard.ranking.len()
    );

    let border = if app.focus == Focus::Content {
        app.theme.highlight
    } else {
        app.theme.border
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
