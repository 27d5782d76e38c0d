//! Finance view rendering.
//!
//! Invoiced amount against allocated budget per (month, vendor), with the
//! variance coloured by over- or underspend.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common::{format_pct, format_usd, render_no_data};
use crate::app::{App, Focus};

/// Render the Finance view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        render_no_data(frame, app, area, "Finance");
        return;
    };
    let variance = &dashboard.finance_variance;
    if variance.is_empty() {
        render_no_data(frame, app, area, "Finance");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Month"),
        Cell::from("Vendor"),
        Cell::from("Budget"),
        Cell::from("Invoiced"),
        Cell::from("Variance"),
        Cell::from("Disputes"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = variance
        .iter()
        .map(|row| {
            let budget = if row.budget_matched {
                Cell::from(format_usd(row.budget_allocated_usd))
            } else {
                Cell::from("no budget").style(app.theme.flag_style())
            };
            Row::new(vec![
                Cell::from(row.month.clone()),
                Cell::from(row.vendor_id.clone()),
                budget,
                Cell::from(format_usd(row.invoiced_usd)),
                Cell::from(format_usd(row.variance_usd))
                    .style(app.theme.variance_style(row.variance_usd)),
                Cell::from(format_pct(row.dispute_rate)),
            ])
        })
        .collect();

    let total_budget: f64 = variance.iter().map(|r| r.budget_allocated_usd).sum();
    let total_invoiced: f64 = variance.iter().map(|r| r.invoiced_usd).sum();
    let total_variance = total_invoiced - total_budget;

    let selected = app.selected_index.min(variance.len() - 1);
    let title = format!(
        " Budget variance ({} rows) | total {} [{}/{}] ",
        variance.len(),
        format_usd(total_variance),
        selected + 1,
        variance.len()
    );

    let border = if app.focus == Focus::Content {
        app.theme.highlight
    } else {
        app.theme.border
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .footer(
        Row::new(vec![
            Cell::from("Total"),
            Cell::from(""),
            Cell::from(format_usd(total_budget)),
            Cell::from(format_usd(total_invoiced)),
            Cell::from(format_usd(total_variance))
                .style(app.theme.variance_style(total_variance)),
            Cell::from(""),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
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
