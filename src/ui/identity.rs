//! Identity view rendering: match rate against overlap.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Row, Table, TableState},
    Frame,
};

use super::common::{format_pct, render_no_data};
use crate::app::{App, Focus};

/// Render the Identity view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        render_no_data(frame, app, area, "Identity");
        return;
    };
    let scatter = &dashboard.identity_scatter;
    if scatter.is_empty() {
        render_no_data(frame, app, area, "Identity");
        return;
    }

    let chunks =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);
    let selected = app.selected_index.min(scatter.len() - 1);

    // One dataset per point so every vendor gets its own colour and legend entry
    let points: Vec<[(f64, f64); 1]> = scatter
        .iter()
        .map(|p| [(p.overlap, p.match_rate)])
        .collect();
    let datasets: Vec<Dataset> = scatter
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let (marker, style) = if i == selected {
                (
                    symbols::Marker::Block,
                    Style::default()
                        .fg(app.theme.highlight)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    symbols::Marker::Dot,
                    Style::default().fg(app.theme.series_color(i)),
                )
            };
            Dataset::default()
                .name(p.vendor_id.clone())
                .marker(marker)
                .graph_type(GraphType::Scatter)
                .style(style)
                .data(&points[i])
        })
        .collect();

    let unit_labels = || vec![Span::raw("0%"), Span::raw("50%"), Span::raw("100%")];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Match rate vs overlap ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .title("overlap")
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, 1.0])
                .labels(unit_labels()),
        )
        .y_axis(
            Axis::default()
                .title("match")
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, 1.0])
                .labels(unit_labels()),
        );
    frame.render_widget(chart, chunks[0]);

    let rows: Vec<Row> = scatter
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.vendor_id.clone()),
                Cell::from(format_pct(p.match_rate)),
                Cell::from(format_pct(p.overlap)),
                Cell::from(format!("{:.1}h", p.avg_latency_hours)),
            ])
        })
        .collect();

    let border = if app.focus == Focus::Content {
        app.theme.highlight
    } else {
        app.theme.border
    };

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(Row::new(vec!["Vendor", "Match", "Overlap", "Latency"]).style(app.theme.header))
    .block(
        Block::default()
            .title(format!(" Identity ({}) ", scatter.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(border)),
    )
    .row_highlight_style(app.theme.selected)
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}
