//! One full recomputation of everything the dashboard shows.
//!
//! [`compute_dashboard`] is a pure function of the loaded tables and the
//! control parameters. The TUI calls it on every parameter change and the
//! export mode calls it once.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::health::{ScoreBand, ScoreBands};
use super::join::{join_finance_variance, join_vendor_composites, Aggregates, FinanceVarianceRow};
use super::rank::{rank_vendors, RankedVendor, VendorSelection};
use super::score::{NormalizedWeights, Weights};
use crate::source::{RowSets, VendorId};

/// Control-surface parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardParams {
    pub weights: Weights,
    pub selection: VendorSelection,
    pub bands: ScoreBands,
}

/// Headline numbers over the ranked set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoreSummary {
    pub top_vendor: Option<VendorId>,
    pub top_score: Option<f64>,
    pub mean_score: Option<f64>,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl ScoreSummary {
    fn from_ranking(ranking: &[RankedVendor]) -> Self {
        let mut summary = Self {
            top_vendor: ranking.first().map(|r| r.score.vendor_id.clone()),
            top_score: ranking.first().map(RankedVendor::health_score),
            ..Default::default()
        };
        if !ranking.is_empty() {
            let total: f64 = ranking.iter().map(RankedVendor::health_score).sum();
            summary.mean_score = Some(total / ranking.len() as f64);
        }
        for vendor in ranking {
            match vendor.band {
                ScoreBand::Healthy => summary.healthy += 1,
                ScoreBand::Warning => summary.warning += 1,
                ScoreBand::Critical => summary.critical += 1,
            }
        }
        summary
    }

    /// The worst band present in the ranking, if any vendor is ranked.
    pub fn worst_band(&self) -> Option<ScoreBand> {
        if self.critical > 0 {
            Some(ScoreBand::Critical)
        } else if self.warning > 0 {
            Some(ScoreBand::Warning)
        } else if self.healthy > 0 {
            Some(ScoreBand::Healthy)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPoint {
    pub date: NaiveDate,
    pub cpm: f64,
    pub ctr: f64,
}

/// Daily delivery points for one vendor, sorted by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverySeries {
    pub vendor_id: VendorId,
    pub points: Vec<DeliveryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityPoint {
    pub vendor_id: VendorId,
    pub match_rate: f64,
    pub overlap: f64,
    pub avg_latency_hours: f64,
}

/// Everything the renderer consumes for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub weights: NormalizedWeights,
    pub ranking: Vec<RankedVendor>,
    pub summary: ScoreSummary,
    pub finance_variance: Vec<FinanceVarianceRow>,
    pub delivery_trend: Vec<DeliverySeries>,
    pub identity_scatter: Vec<IdentityPoint>,
    /// Size of the health universe, regardless of selection.
    pub universe_size: usize,
}

impl DashboardView {
    /// True when the selection matched nothing.
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Position of a vendor in the ranking.
    pub fn rank_of(&self, vendor: &str) -> Option<usize> {
        self.ranking.iter().position(|r| r.vendor_id() == vendor)
    }
}

/// Run the whole pipeline: aggregate, join, score, filter and rank.
pub fn compute_dashboard(rows: &RowSets, params: &DashboardParams) -> DashboardView {
    let universe = rows.vendor_universe();
    // Selection resolved against the universe; vendors missing from
    // health.csv never reach any output.
    let selected: HashSet<&str> = universe
        .iter()
        .map(String::as_str)
        .filter(|v| params.selection.contains(v))
        .collect();
    let aggregates = Aggregates::from_rowsets(rows);
    let composites = join_vendor_composites(&universe, &rows.identity, &aggregates);

    let weights = params.weights.normalized();
    if weights.fallback {
        tracing::debug!("all weights are zero; using equal weights");
    }
    let ranking = rank_vendors(&composites, &weights, &params.selection, &params.bands);
    let summary = ScoreSummary::from_ranking(&ranking);

    let finance_variance = join_finance_variance(&rows.finance, &rows.budgets)
        .into_iter()
        .filter(|row| selected.contains(row.vendor_id.as_str()))
        .collect();

    let delivery_trend = universe
        .iter()
        .filter(|v| selected.contains(v.as_str()))
        .filter_map(|vendor| {
            let mut points: Vec<DeliveryPoint> = rows
                .delivery
                .iter()
                .filter(|r| &r.vendor_id == vendor)
                .map(|r| DeliveryPoint {
                    date: r.date,
                    cpm: r.cpm,
                    ctr: r.ctr,
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by_key(|p| p.date);
            Some(DeliverySeries {
                vendor_id: vendor.clone(),
                points,
            })
        })
        .collect();

    let identity_scatter = rows
        .identity
        .iter()
        .filter(|r| selected.contains(r.vendor_id.as_str()))
        .map(|r| IdentityPoint {
            vendor_id: r.vendor_id.clone(),
            match_rate: r.match_rate,
            overlap: r.overlap,
            avg_latency_hours: r.avg_latency_hours,
        })
        .collect();

    DashboardView {
        weights,
        ranking,
        summary,
        finance_variance,
        delivery_trend,
        identity_scatter,
        universe_size: universe.len(),
    }
}

/// The JSON document written by the export action.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub generated_at: String,
    pub source: &'a str,
    pub params: &'a DashboardParams,
    pub dashboard: &'a DashboardView,
}

impl<'a> ExportDocument<'a> {
    pub fn new(source: &'a str, params: &'a DashboardParams, dashboard: &'a DashboardView) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source,
            params,
            dashboard,
        }
    }
}
