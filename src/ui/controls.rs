//! Sidebar with the weight sliders and the vendor multiselect.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::data::Component;

/// Width of the slider bar in cells.
const BAR_WIDTH: usize = 10;

/// Render the sidebar: weights on top, vendors below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(Component::ALL.len() as u16 + 3),
        Constraint::Min(3),
    ])
    .split(area);

    render_weights(frame, app, chunks[0]);
    render_vendors(frame, app, chunks[1]);
}

fn pane_block(app: &App, title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(app.theme.highlight)
    } else {
        Style::default().fg(app.theme.border)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border)
}

fn render_weights(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Weights;
    let normalized = app.params.weights.normalized();

    let mut lines: Vec<Line> = Component::ALL
        .iter()
        .enumerate()
        .map(|(i, component)| {
            let raw = app.params.weights.get(*component);
            let style = if focused && i == app.weight_index {
                app.theme.selected
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<11} ", component.label()), style),
                Span::styled(slider_bar(raw), Style::default().fg(app.theme.highlight)),
                Span::styled(format!(" {:.2}", raw), style),
                Span::styled(
                    format!(" {:>3.0}%", normalized.get(*component) * 100.0),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ])
        })
        .collect();

    let note = if normalized.fallback {
        Span::styled("all zero: equal weights", app.theme.flag_style())
    } else {
        Span::styled("% = share after normalizing", Style::default().add_modifier(Modifier::DIM))
    };
    lines.push(Line::from(note));

    let paragraph = Paragraph::new(lines).block(pane_block(app, " Weights ".to_string(), focused));
    frame.render_widget(paragraph, area);
}

/// Draw a weight in `[0, 1]` as a fixed-width bar.
fn slider_bar(value: f64) -> String {
    let filled = ((value.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_vendors(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Vendors;
    let selection = &app.params.selection;

    let items: Vec<ListItem> = app
        .universe
        .iter()
        .map(|vendor| {
            let mark = if selection.contains(vendor) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}", mark, vendor))
        })
        .collect();

    let title = format!(
        " Vendors ({}/{}) ",
        selection.count_in(&app.universe),
        app.universe.len()
    );

    let mut list = List::new(items).block(pane_block(app, title, focused));
    if focused {
        list = list.highlight_style(app.theme.selected).highlight_symbol("▶ ");
    }

    let mut state = ListState::default();
    if !app.universe.is_empty() {
        state.select(Some(app.vendor_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
