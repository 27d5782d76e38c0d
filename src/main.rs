use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use vendorwatch::app::{write_export, App, View};
use vendorwatch::config::Settings;
use vendorwatch::data::{compute_dashboard, DashboardParams, VendorSelection};
use vendorwatch::source::{CsvDirSource, DataSource};
use vendorwatch::ui::{self, Theme};
use vendorwatch::{events, logging};

/// Width of the controls sidebar.
const SIDEBAR_WIDTH: u16 = 40;

#[derive(Parser, Debug)]
#[command(name = "vendorwatch")]
#[command(about = "Interactive vendor health scoring dashboard over CSV exports")]
struct Args {
    /// Directory containing health.csv, delivery.csv, finance.csv, identity.csv, budgets.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between checks for changed input files
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Weight of the match-rate term
    #[arg(long)]
    w_match: Option<f64>,

    /// Weight of the overlap term
    #[arg(long)]
    w_overlap: Option<f64>,

    /// Weight of the CPM term
    #[arg(long)]
    w_cpm: Option<f64>,

    /// Weight of the viewability term
    #[arg(long)]
    w_viewability: Option<f64>,

    /// Weight of the dispute-rate term
    #[arg(long)]
    w_disputes: Option<f64>,

    /// Restrict to these vendors (comma separated)
    #[arg(long, value_delimiter = ',')]
    vendors: Option<Vec<String>>,

    /// Lowest score in the healthy band
    #[arg(long)]
    healthy_min: Option<f64>,

    /// Lowest score in the warning band
    #[arg(long)]
    warning_min: Option<f64>,

    /// Write logs to this file (the TUI otherwise does not log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the computed dashboard to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    /// Layer the command line over file and environment settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref dir) = self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(secs) = self.refresh {
            settings.refresh_secs = secs;
        }
        let weights = &mut settings.weights;
        let overrides = [
            (self.w_match, &mut weights.match_rate),
            (self.w_overlap, &mut weights.overlap),
            (self.w_cpm, &mut weights.cpm),
            (self.w_viewability, &mut weights.viewability),
            (self.w_disputes, &mut weights.disputes),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(min) = self.healthy_min {
            settings.bands.healthy_min = min;
        }
        if let Some(min) = self.warning_min {
            settings.bands.warning_min = min;
        }
        if let Some(ref vendors) = self.vendors {
            settings.vendors = Some(vendors.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match (&args.export, &args.log_file) {
        (Some(_), _) => logging::init_stderr()?,
        (None, Some(path)) => logging::init_file(path)?,
        (None, None) => {}
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    tracing::debug!(?settings, "settings resolved");

    let params = settings.dashboard_params();

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings.data_dir, export_path, &params);
    }

    let source = Box::new(CsvDirSource::new(&settings.data_dir));
    run_tui(source, params, Duration::from_secs(settings.refresh_secs.max(1)))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    params: DashboardParams,
    refresh_interval: Duration,
) -> Result<()> {
    // Detect the theme before raw mode; the probe reads the terminal
    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, params, theme);
    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 90;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Sidebar and content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            let body = Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(40)])
                .split(chunks[2]);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);
            ui::controls::render(frame, app, body[0]);

            match app.current_view {
                View::Ranking => ui::ranking::render(frame, app, body[1]),
                View::Delivery => ui::delivery::render(frame, app, body[1]),
                View::Finance => ui::finance::render(frame, app, body[1]),
                View::Identity => ui::identity::render(frame, app, body[1]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Rows start after header (1) + tabs (1) + border (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 4, SIDEBAR_WIDTH);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Pick up changed input files
        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Load once, compute the dashboard and write it as JSON.
fn export_to_file(data_dir: &Path, export_path: &Path, params: &DashboardParams) -> Result<()> {
    let mut source = CsvDirSource::new(data_dir);
    let rows = match source.poll() {
        Some(rows) => rows,
        None => {
            let err = source.error().unwrap_or("no tables loaded");
            anyhow::bail!("failed to load {}: {}", data_dir.display(), err);
        }
    };

    let dashboard = compute_dashboard(&rows, params);
    if let VendorSelection::Only(ref ids) = params.selection {
        let unknown: Vec<_> = ids
            .iter()
            .filter(|id| dashboard.rank_of(id.as_str()).is_none())
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(?unknown, "selected vendors not in health.csv");
        }
    }

    write_export(export_path, source.description(), params, &dashboard)
        .with_context(|| format!("export to {} failed", export_path.display()))?;

    println!("Exported dashboard to: {}", export_path.display());
    Ok(())
}
