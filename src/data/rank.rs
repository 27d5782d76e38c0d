//! Vendor selection and ranking.

use std::collections::BTreeSet;

use serde::Serialize;

use super::health::{ScoreBand, ScoreBands};
use super::join::VendorComposite;
use super::score::{score_breakdown, NormalizedWeights, ScoreBreakdown, VendorScore};
use crate::source::VendorId;

/// The set of vendors the dashboard is restricted to.
///
/// `All` tracks whatever the current universe is, so vendors appearing after
/// a reload are selected without user action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "vendors")]
pub enum VendorSelection {
    #[default]
    All,
    Only(BTreeSet<VendorId>),
}

impl VendorSelection {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<VendorId>,
    {
        Self::Only(ids.into_iter().map(Into::into).collect())
    }

    /// The empty selection.
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    pub fn contains(&self, vendor: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(vendor),
        }
    }

    /// Flip one vendor in or out. Toggling out of `All` materializes the
    /// selection against `universe` first.
    pub fn toggle(&mut self, vendor: &str, universe: &[VendorId]) {
        if let Self::All = self {
            *self = Self::Only(universe.iter().cloned().collect());
        }
        if let Self::Only(ids) = self {
            if !ids.remove(vendor) {
                ids.insert(vendor.to_string());
            }
        }
    }

    pub fn select_all(&mut self) {
        *self = Self::All;
    }

    pub fn clear(&mut self) {
        *self = Self::none();
    }

    /// Number of universe vendors that are selected.
    pub fn count_in(&self, universe: &[VendorId]) -> usize {
        universe.iter().filter(|v| self.contains(v)).count()
    }
}

/// A scored vendor ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVendor {
    #[serde(flatten)]
    pub score: VendorScore,
    pub band: ScoreBand,
    pub composite: VendorComposite,
    pub breakdown: ScoreBreakdown,
}

impl RankedVendor {
    pub fn vendor_id(&self) -> &str {
        &self.score.vendor_id
    }

    pub fn health_score(&self) -> f64 {
        self.score.health_score
    }
}

/// Score the selected composites and sort them by score, highest first.
///
/// The sort is stable: vendors with equal scores keep their input order.
pub fn rank_vendors(
    composites: &[VendorComposite],
    weights: &NormalizedWeights,
    selection: &VendorSelection,
    bands: &ScoreBands,
) -> Vec<RankedVendor> {
    let mut ranked: Vec<RankedVendor> = composites
        .iter()
        .filter(|c| selection.contains(&c.vendor_id))
        .map(|c| {
            let breakdown = score_breakdown(c, weights);
            let health_score = breakdown.score();
            RankedVendor {
                score: VendorScore {
                    vendor_id: c.vendor_id.clone(),
                    health_score,
                },
                band: bands.classify(health_score),
                composite: c.clone(),
                breakdown,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.health_score().total_cmp(&a.health_score()));
    ranked
}
