//! # vendorwatch
//!
//! An interactive terminal dashboard and library for scoring advertising
//! vendors from five CSV exports.
//!
//! The crate loads health, delivery, finance, identity and budget tables,
//! joins them into one composite per vendor, computes a weighted 0-100
//! health score, and lets the user re-weight the formula and filter vendors
//! live from the keyboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(scoring) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── CsvDirSource | MemorySource                 │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, control surface
//! - **[`source`]**: Load-once table handles behind the [`DataSource`] trait
//! - **[`data`]**: Aggregation, joins, scoring and ranking, all pure
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]** and **[`logging`]**: layered settings and tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive dashboard over ./data
//! vendorwatch --data-dir data
//!
//! # One-shot JSON export with custom weights
//! vendorwatch --data-dir data --w-cpm 0.5 --export scores.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use vendorwatch::{compute_dashboard, DashboardParams, HealthRecord, RowSets};
//!
//! let rows = RowSets {
//!     health: vec![HealthRecord { vendor_id: "V1".to_string() }],
//!     ..Default::default()
//! };
//! let view = compute_dashboard(&rows, &DashboardParams::default());
//! assert_eq!(view.ranking.len(), 1);
//! // No identity, delivery or finance rows: every metric is filled with zero
//! assert!(view.ranking[0].composite.missing.any());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    compute_dashboard, DashboardParams, DashboardView, RankedVendor, ScoreBand, ScoreBands,
    VendorComposite, VendorSelection, Weights,
};
pub use source::{
    CsvDirSource, DataSource, HealthRecord, LoadError, MemorySource, RowSets, VendorId,
};
