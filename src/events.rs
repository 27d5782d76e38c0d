use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Focus, View, EXPORT_FILE};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through vendors while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    // Keys that depend on the focused pane
    let handled = match app.focus {
        Focus::Weights => handle_weights_key(app, key),
        Focus::Vendors => handle_vendors_key(app, key),
        Focus::Content => false,
    };
    if handled {
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Ranking),
        KeyCode::Char('2') => app.set_view(View::Delivery),
        KeyCode::Char('3') => app.set_view(View::Finance),
        KeyCode::Char('4') => app.set_view(View::Identity),

        // Navigation within the focused pane
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Char('f') => app.cycle_focus(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Explicit refresh
        KeyCode::Char('r') => app.refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Keys for the weight sliders. Returns true if the key was consumed.
fn handle_weights_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => {
            app.adjust_weight(1)
        }
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => app.adjust_weight(-1),
        KeyCode::PageUp => app.adjust_weight(10),
        KeyCode::PageDown => app.adjust_weight(-10),
        KeyCode::Char('0') => app.reset_weights(),
        _ => return false,
    }
    true
}

/// Keys for the vendor multiselect. Returns true if the key was consumed.
fn handle_vendors_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_vendor(),
        KeyCode::Char('a') => app.select_all_vendors(),
        KeyCode::Char('n') => app.clear_vendors(),
        _ => return false,
    }
    true
}

/// Handle mouse events.
///
/// `content_start_row` is the first screen row of the content pane's
/// table body; `sidebar_width` is the width of the controls sidebar.
pub fn handle_mouse_event(
    app: &mut App,
    mouse: MouseEvent,
    content_start_row: u16,
    sidebar_width: u16,
) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let mut start = 0u16;
                for view in View::ALL {
                    // "N:Label" plus the divider
                    let width = view.label().len() as u16 + 5;
                    if mouse.column < start + width {
                        app.set_view(view);
                        break;
                    }
                    start += width;
                }
                return;
            }

            if mouse.column < sidebar_width {
                // Clicks in the sidebar only move focus there
                if app.focus == Focus::Content {
                    app.focus = Focus::Weights;
                }
                return;
            }

            if clicked_row >= content_start_row {
                app.focus = Focus::Content;
                // The delivery table sits below the chart, so its rows do
                // not start at `content_start_row`
                if app.current_view == View::Delivery {
                    return;
                }
                let item_row = (clicked_row - content_start_row) as usize;
                if item_row < app.content_len() {
                    app.selected_index = item_row;
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Component, DashboardParams};
    use crate::source::{DeliveryRecord, HealthRecord, MemorySource, RowSets};
    use chrono::NaiveDate;
    use crate::ui::Theme;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let rows = RowSets {
            health: ["V1", "V2"]
                .iter()
                .map(|v| HealthRecord {
                    vendor_id: v.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        let source = MemorySource::new(rows, "test");
        let mut app = App::new(Box::new(source), DashboardParams::default(), Theme::dark());
        app.reload_data();
        app
    }

    #[test]
    fn test_view_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Finance);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Identity);
        handle_key_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.current_view, View::Ranking);
        handle_key_event(&mut app, key(KeyCode::Left));
        assert_eq!(app.current_view, View::Identity);
    }

    #[test]
    fn test_weight_keys_only_with_focus() {
        let mut app = app();
        // Content focus: '+' does nothing, Right switches view
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.params.weights.match_rate, 0.30);

        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.focus, Focus::Weights);
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_component(), Component::Overlap);

        handle_key_event(&mut app, key(KeyCode::Char('+')));
        handle_key_event(&mut app, key(KeyCode::Right));
        assert!((app.params.weights.overlap - 0.17).abs() < 1e-9);
        assert_eq!(app.current_view, View::Ranking);

        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert!((app.params.weights.overlap - 0.16).abs() < 1e-9);

        handle_key_event(&mut app, key(KeyCode::Char('0')));
        assert_eq!(app.params.weights.overlap, 0.15);
    }

    #[test]
    fn test_vendor_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.focus, Focus::Vendors);

        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.params.selection.contains("V1"));

        handle_key_event(&mut app, key(KeyCode::Char('n')));
        assert!(app.dashboard.as_ref().unwrap().is_empty());

        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.dashboard.as_ref().unwrap().ranking.len(), 2);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Content);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_detail_overlay_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_detail_overlay);
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_mouse_click_selects_row() {
        let mut app = app();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 6,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click, 5, 30);
        assert_eq!(app.selected_index, 1);

        let tab_click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 14,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, tab_click, 5, 30);
        assert_eq!(app.current_view, View::Delivery);
    }

    #[test]
    fn test_mouse_click_ignored_on_delivery_rows() {
        let rows = RowSets {
            health: vec![
                HealthRecord {
                    vendor_id: "V1".to_string(),
                },
                HealthRecord {
                    vendor_id: "V2".to_string(),
                },
            ],
            delivery: ["V1", "V2"]
                .iter()
                .map(|v| DeliveryRecord {
                    vendor_id: v.to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    cpm: 10.0,
                    viewability: 0.7,
                    ctr: 0.01,
                })
                .collect(),
            ..Default::default()
        };
        let source = MemorySource::new(rows, "test");
        let mut app = App::new(Box::new(source), DashboardParams::default(), Theme::dark());
        app.reload_data();
        app.set_view(View::Delivery);
        assert_eq!(app.content_len(), 2);
        app.focus = Focus::Weights;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 6,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click, 5, 30);
        assert_eq!(app.focus, Focus::Content);
        assert_eq!(app.selected_index, 0);
    }
}
