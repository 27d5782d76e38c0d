//! Delivery view rendering.
//!
//! Daily CPM per selected vendor as a line chart, with a per-vendor table
//! underneath. The vendor under the cursor is drawn on top.

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
use crate::data::DeliverySeries;

/// Render the Delivery view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        render_no_data(frame, app, area, "Delivery");
        return;
    };
    let series = &dashboard.delivery_trend;
    if series.is_empty() {
        render_no_data(frame, app, area, "Delivery");
        return;
    }

    let table_height = (series.len() as u16 + 3).min(area.height / 3).max(4);
    let chunks =
        Layout::vertical([Constraint::Min(8), Constraint::Length(table_height)]).split(area);

    let selected = app.selected_index.min(series.len() - 1);
    render_chart(frame, app, series, selected, chunks[0]);
    render_table(frame, app, series, selected, chunks[1]);
}

fn render_chart(
    frame: &mut Frame,
    app: &App,
    series: &[DeliverySeries],
    selected: usize,
    area: Rect,
) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|p| (day_number(p.date), p.cpm))
                .collect()
        })
        .collect();

    let (mut x_min, mut x_max, mut y_max) = (f64::MAX, f64::MIN, 0.0f64);
    for (x, y) in points.iter().flatten() {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_max = y_max.max(*y);
    }
    if x_min >= x_max {
        x_max = x_min + 1.0;
    }
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    // Draw the selected series last so it is on top
    let mut order: Vec<usize> = (0..series.len()).filter(|i| *i != selected).collect();
    order.push(selected);

    let datasets: Vec<Dataset> = order
        .into_iter()
        .map(|i| {
            let mut style = Style::default().fg(app.theme.series_color(i));
            if i == selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            Dataset::default()
                .name(series[i].vendor_id.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(&points[i])
        })
        .collect();

    let first = series
        .iter()
        .filter_map(|s| s.points.first())
        .map(|p| p.date)
        .min();
    let last = series
        .iter()
        .filter_map(|s| s.points.last())
        .map(|p| p.date)
        .max();
    let x_labels = match (first, last) {
        (Some(first), Some(last)) => vec![
            Span::raw(first.format("%Y-%m-%d").to_string()),
            Span::raw(last.format("%Y-%m-%d").to_string()),
        ],
        _ => Vec::new(),
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" CPM trend ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .title("date")
                .style(Style::default().fg(app.theme.border))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("CPM")
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.1}", y_max / 2.0)),
                    Span::raw(format!("{:.1}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_table(
    frame: &mut Frame,
    app: &App,
    series: &[DeliverySeries],
    selected: usize,
    area: Rect,
) {
    let header = Row::new(vec!["Vendor", "Days", "Mean CPM", "Mean CTR", "Last CPM"])
        .style(app.theme.header);

    let rows: Vec<Row> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let n = s.points.len() as f64;
            let mean_cpm = s.points.iter().map(|p| p.cpm).sum::<f64>() / n;
            let mean_ctr = s.points.iter().map(|p| p.ctr).sum::<f64>() / n;
            let last = s.points.last().map(|p| format!("{:.2}", p.cpm));
            Row::new(vec![
                Cell::from(s.vendor_id.clone())
                    .style(Style::default().fg(app.theme.series_color(i))),
                Cell::from(s.points.len().to_string()),
                Cell::from(format!("{:.2}", mean_cpm)),
                Cell::from(format_pct(mean_ctr)),
                Cell::from(last.unwrap_or_else(|| "-".to_string())),
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
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Vendors ({}) ", series.len()))
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

/// Day number used as the chart's x coordinate.
fn day_number(date: chrono::NaiveDate) -> f64 {
    use chrono::Datelike;
    f64::from(date.num_days_from_ce())
}
