//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::data::{
    compute_dashboard, Component, DashboardParams, DashboardView, ExportDocument, RankedVendor,
    Weights, WEIGHT_STEP,
};
use crate::source::{DataSource, RowSets, VendorId};
use crate::ui::Theme;

/// File written by the in-app export action.
pub const EXPORT_FILE: &str = "vendorwatch_export.json";

/// The current view/tab in the TUI.
///
/// Vendor detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Vendors ranked by health score.
    Ranking,
    /// Daily CPM per selected vendor.
    Delivery,
    /// Invoiced amount against budget per month.
    Finance,
    /// Match rate against overlap per vendor.
    Identity,
}

impl View {
    pub const ALL: [View; 4] = [View::Ranking, View::Delivery, View::Finance, View::Identity];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Ranking => View::Delivery,
            View::Delivery => View::Finance,
            View::Finance => View::Identity,
            View::Identity => View::Ranking,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Ranking => View::Identity,
            View::Delivery => View::Ranking,
            View::Finance => View::Delivery,
            View::Identity => View::Finance,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Ranking => "Ranking",
            View::Delivery => "Delivery",
            View::Finance => "Finance",
            View::Identity => "Identity",
        }
    }
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Content,
    Weights,
    Vendors,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Content => Focus::Weights,
            Focus::Weights => Focus::Vendors,
            Focus::Vendors => Focus::Content,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Focus::Content => "content",
            Focus::Weights => "weights",
            Focus::Vendors => "vendors",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub focus: Focus,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    rows: Option<Arc<RowSets>>,
    /// Health universe of the current load, in first-appearance order.
    pub universe: Vec<VendorId>,
    pub dashboard: Option<DashboardView>,
    pub load_error: Option<String>,

    // Control surface
    pub params: DashboardParams,
    initial_weights: Weights,

    // Navigation state
    pub selected_index: usize,
    pub weight_index: usize,
    pub vendor_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and starting parameters.
    ///
    /// "Reset weights" returns to `params.weights`.
    pub fn new(source: Box<dyn DataSource>, params: DashboardParams, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Ranking,
            focus: Focus::Content,
            show_help: false,
            show_detail_overlay: false,
            source,
            rows: None,
            universe: Vec::new(),
            dashboard: None,
            load_error: None,
            initial_weights: params.weights,
            params,
            selected_index: 0,
            weight_index: 0,
            vendor_index: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new load.
    ///
    /// Returns true if new tables were received. A failed load clears the
    /// tables and the dashboard, so only the error state is drawn.
    pub fn reload_data(&mut self) -> bool {
        let loaded = match self.source.poll() {
            Some(rows) => {
                self.universe = rows.vendor_universe();
                self.rows = Some(rows);
                self.recompute();
                true
            }
            None => false,
        };
        self.load_error = self.source.error().map(str::to_string);
        if self.load_error.is_some() && self.rows.is_some() {
            self.rows = None;
            self.dashboard = None;
            self.universe.clear();
            self.clamp_selection();
        }
        loaded
    }

    /// Drop the memoized load and load again.
    pub fn refresh(&mut self) {
        self.source.invalidate();
        let message = if self.reload_data() {
            Some("Reloaded".to_string())
        } else {
            self.load_error
                .as_ref()
                .map(|err| format!("Reload failed: {}", err))
        };
        if let Some(message) = message {
            self.set_status_message(message);
        }
    }

    /// Recompute the dashboard from the current tables and parameters.
    pub fn recompute(&mut self) {
        let Some(rows) = &self.rows else {
            return;
        };
        let view = compute_dashboard(rows, &self.params);
        self.dashboard = Some(view);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let max = self.content_len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
        self.vendor_index = self.vendor_index.min(self.universe.len().saturating_sub(1));
        if self.show_detail_overlay && self.selected_vendor().is_none() {
            self.show_detail_overlay = false;
        }
    }

    /// Number of rows in the current view's content pane.
    pub fn content_len(&self) -> usize {
        let Some(view) = &self.dashboard else {
            return 0;
        };
        match self.current_view {
            View::Ranking => view.ranking.len(),
            View::Delivery => view.delivery_trend.len(),
            View::Finance => view.finance_variance.len(),
            View::Identity => view.identity_scatter.len(),
        }
    }

    /// The ranked vendor under the cursor on the ranking view.
    pub fn selected_vendor(&self) -> Option<&RankedVendor> {
        self.dashboard.as_ref()?.ranking.get(self.selected_index)
    }

    /// The weight component under the cursor in the weights pane.
    pub fn selected_component(&self) -> Component {
        Component::ALL[self.weight_index.min(Component::ALL.len() - 1)]
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_index = 0;
        self.show_detail_overlay = false;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move selection down by one item in the focused pane.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item in the focused pane.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.focus {
            Focus::Content => {
                let max = self.content_len().saturating_sub(1);
                self.selected_index = (self.selected_index + n).min(max);
            }
            Focus::Weights => {
                self.weight_index = (self.weight_index + n).min(Component::ALL.len() - 1);
            }
            Focus::Vendors => {
                let max = self.universe.len().saturating_sub(1);
                self.vendor_index = (self.vendor_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.focus {
            Focus::Content => self.selected_index = self.selected_index.saturating_sub(n),
            Focus::Weights => self.weight_index = self.weight_index.saturating_sub(n),
            Focus::Vendors => self.vendor_index = self.vendor_index.saturating_sub(n),
        }
    }

    /// Jump to the first item in the focused pane.
    pub fn select_first(&mut self) {
        self.select_prev_n(usize::MAX);
    }

    /// Jump to the last item in the focused pane.
    pub fn select_last(&mut self) {
        self.select_next_n(usize::MAX / 2);
    }

    /// Nudge the weight under the cursor by `steps` control steps.
    pub fn adjust_weight(&mut self, steps: i32) {
        let component = self.selected_component();
        self.params
            .weights
            .adjust(component, f64::from(steps) * WEIGHT_STEP);
        self.recompute();
    }

    /// Restore the weights the session started with.
    pub fn reset_weights(&mut self) {
        self.params.weights = self.initial_weights;
        self.recompute();
        self.set_status_message("Weights reset".to_string());
    }

    /// Toggle the vendor under the cursor in the vendors pane.
    pub fn toggle_vendor(&mut self) {
        let Some(vendor) = self.universe.get(self.vendor_index).cloned() else {
            return;
        };
        self.params.selection.toggle(&vendor, &self.universe);
        self.recompute();
    }

    pub fn select_all_vendors(&mut self) {
        self.params.selection.select_all();
        self.recompute();
    }

    pub fn clear_vendors(&mut self) {
        self.params.selection.clear();
        self.recompute();
    }

    /// Open the detail overlay for the vendor under the cursor.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Ranking
            && self.focus == Focus::Content
            && self.selected_vendor().is_some()
        {
            self.show_detail_overlay = true;
        }
    }

    /// Close overlays first, then return focus to the content pane.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.focus != Focus::Content {
            self.focus = Focus::Content;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the current dashboard and parameters as pretty JSON.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref dashboard) = self.dashboard else {
            anyhow::bail!("No data to export");
        };
        write_export(path, self.source_description(), &self.params, dashboard)
    }
}

/// Serialize an [`ExportDocument`] to `path`.
pub fn write_export(
    path: &Path,
    source: &str,
    params: &DashboardParams,
    dashboard: &DashboardView,
) -> Result<()> {
    let doc = ExportDocument::new(source, params, dashboard);
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), vendors = dashboard.ranking.len(), "export written");
    Ok(())
}
