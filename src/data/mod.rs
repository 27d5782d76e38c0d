//! Scoring pipeline over the loaded tables.
//!
//! This module turns the raw row-sets into the ranked, band-annotated data
//! the dashboard displays.
//!
//! ## Submodules
//!
//! - [`aggregate`]: Per-vendor means of delivery and finance metrics
//! - [`join`]: Vendor composites and the finance variance table, with the zero-fill policy
//! - [`score`]: Weights, normalization and the health-score formula
//! - [`health`]: Score bands ([`ScoreBands`], [`ScoreBand`])
//! - [`rank`]: Vendor selection and stable ranking
//! - [`dashboard`]: The full recomputation ([`compute_dashboard`])
//!
//! ## Data Flow
//!
//! ```text
//! RowSets
//!    │
//!    ├──▶ Aggregates::from_rowsets()      (mean CPM, viewability, disputes)
//!    │
//!    ├──▶ join_vendor_composites()        (health universe ⟕ identity ⟕ means)
//!    │
//!    ├──▶ rank_vendors()                  (score, band, filter, sort)
//!    │
//!    └──▶ DashboardView                   (+ finance variance, trends, scatter)
//! ```

pub mod aggregate;
pub mod dashboard;
pub mod health;
pub mod join;
pub mod rank;
pub mod score;

pub use dashboard::{
    compute_dashboard, DashboardParams, DashboardView, DeliveryPoint, DeliverySeries,
    ExportDocument, IdentityPoint, ScoreSummary,
};
pub use health::{ScoreBand, ScoreBands};
pub use join::{FinanceVarianceRow, MissingMetrics, VendorComposite, FILL_VALUE};
pub use rank::{rank_vendors, RankedVendor, VendorSelection};
pub use score::{
    clip01, health_score, score_breakdown, Component, NormalizedWeights, ScoreBreakdown,
    VendorScore, Weights, CPM_TARGET, VIEWABILITY_BASELINE, WEIGHT_STEP,
};
