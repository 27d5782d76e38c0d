//! Joins the tables into per-vendor composites and the finance variance table.
//!
//! ## Fill policy
//!
//! Every value a join cannot find is filled with [`FILL_VALUE`] (zero) and
//! the gap is recorded in [`MissingMetrics`]. Zero CPM and zero dispute rate
//! score as the best possible values, so vendors missing delivery or finance
//! data rank optimistically. That bias is kept on purpose and surfaced
//! through the missing-metric flags rather than hidden.

use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::{mean_delivery_by_vendor, mean_dispute_rate_by_vendor, DeliveryMeans};
use crate::source::{BudgetRecord, FinanceRecord, IdentityRecord, RowSets, VendorId};

/// Value substituted for any metric a join could not find.
pub const FILL_VALUE: f64 = 0.0;

/// Which source tables had no row for a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MissingMetrics {
    pub identity: bool,
    pub delivery: bool,
    pub finance: bool,
}

impl MissingMetrics {
    /// True if any source was missing.
    pub fn any(&self) -> bool {
        self.identity || self.delivery || self.finance
    }

    /// True if the vendor benefits from the zero fill (missing CPM or
    /// dispute data).
    pub fn optimistic(&self) -> bool {
        self.delivery || self.finance
    }

    /// Short labels of the missing sources, for display.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.identity {
            labels.push("identity");
        }
        if self.delivery {
            labels.push("delivery");
        }
        if self.finance {
            labels.push("finance");
        }
        labels
    }
}

/// One vendor's joined metrics, ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorComposite {
    pub vendor_id: VendorId,
    pub match_rate: f64,
    pub overlap: f64,
    pub avg_latency_hours: f64,
    /// Mean dispute rate over the vendor's finance rows.
    pub dispute_rate: f64,
    /// Mean CPM over the vendor's delivery rows.
    pub cpm: f64,
    /// Mean viewability over the vendor's delivery rows.
    pub viewability: f64,
    pub missing: MissingMetrics,
}

/// Per-vendor aggregates feeding the composite join.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub delivery: HashMap<VendorId, DeliveryMeans>,
    pub disputes: HashMap<VendorId, f64>,
}

impl Aggregates {
    pub fn from_rowsets(rows: &RowSets) -> Self {
        Self {
            delivery: mean_delivery_by_vendor(&rows.delivery),
            disputes: mean_dispute_rate_by_vendor(&rows.finance),
        }
    }
}

/// Build one composite per vendor of `universe`, in universe order.
///
/// Identity is right-joined onto the universe (the first identity row of a
/// vendor wins), then the dispute and delivery means are left-joined.
/// Identity rows for vendors outside the universe are dropped.
pub fn join_vendor_composites(
    universe: &[VendorId],
    identity: &[IdentityRecord],
    aggregates: &Aggregates,
) -> Vec<VendorComposite> {
    let mut identity_by_vendor: HashMap<&str, &IdentityRecord> = HashMap::new();
    for record in identity {
        identity_by_vendor
            .entry(record.vendor_id.as_str())
            .or_insert(record);
    }

    universe
        .iter()
        .map(|vendor| {
            let id = identity_by_vendor.get(vendor.as_str());
            let delivery = aggregates.delivery.get(vendor);
            let dispute = aggregates.disputes.get(vendor);

            VendorComposite {
                vendor_id: vendor.clone(),
                match_rate: id.map_or(FILL_VALUE, |r| r.match_rate),
                overlap: id.map_or(FILL_VALUE, |r| r.overlap),
                avg_latency_hours: id.map_or(FILL_VALUE, |r| r.avg_latency_hours),
                dispute_rate: dispute.copied().unwrap_or(FILL_VALUE),
                cpm: delivery.map_or(FILL_VALUE, |d| d.cpm),
                viewability: delivery.map_or(FILL_VALUE, |d| d.viewability),
                missing: MissingMetrics {
                    identity: id.is_none(),
                    delivery: delivery.is_none(),
                    finance: dispute.is_none(),
                },
            }
        })
        .collect()
}

/// A finance row joined with its budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceVarianceRow {
    pub month: String,
    pub vendor_id: VendorId,
    pub budget_allocated_usd: f64,
    pub invoiced_usd: f64,
    /// `invoiced_usd - budget_allocated_usd`; positive means overspend.
    pub variance_usd: f64,
    pub dispute_rate: f64,
    /// False when no budget row matched and the budget was filled with zero.
    pub budget_matched: bool,
}

/// Left-join finance with budgets on (month, vendor), in finance order.
///
/// An unmatched budget is filled with zero, so its variance equals the
/// invoiced amount. The first budget row of a key wins.
pub fn join_finance_variance(
    finance: &[FinanceRecord],
    budgets: &[BudgetRecord],
) -> Vec<FinanceVarianceRow> {
    let mut budget_by_key: HashMap<(&str, &str), f64> = HashMap::new();
    for budget in budgets {
        budget_by_key
            .entry((budget.month.as_str(), budget.vendor_id.as_str()))
            .or_insert(budget.budget_allocated_usd);
    }

    finance
        .iter()
        .map(|row| {
            let budget = budget_by_key
                .get(&(row.month.as_str(), row.vendor_id.as_str()))
                .copied();
            let budget_allocated_usd = budget.unwrap_or(FILL_VALUE);
            FinanceVarianceRow {
                month: row.month.clone(),
                vendor_id: row.vendor_id.clone(),
                budget_allocated_usd,
                invoiced_usd: row.invoiced_usd,
                variance_usd: row.invoiced_usd - budget_allocated_usd,
                dispute_rate: row.dispute_rate,
                budget_matched: budget.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(vendor: &str, match_rate: f64, overlap: f64) -> IdentityRecord {
        IdentityRecord {
            vendor_id: vendor.to_string(),
            match_rate,
            overlap,
            avg_latency_hours: 3.0,
        }
    }

    fn universe(ids: &[&str]) -> Vec<VendorId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_right_join_keeps_every_universe_vendor() {
        let ids = universe(&["V1", "V2"]);
        let identity = vec![identity("V1", 0.8, 0.5), identity("V9", 0.9, 0.9)];
        let composites = join_vendor_composites(&ids, &identity, &Aggregates::default());

        assert_eq!(composites.len(), 2);
        assert_eq!(composites[0].vendor_id, "V1");
        assert_eq!(composites[0].match_rate, 0.8);
        assert!(!composites[0].missing.identity);

        // Unmatched identity fields are filled, not dropped
        assert_eq!(composites[1].vendor_id, "V2");
        assert_eq!(composites[1].match_rate, FILL_VALUE);
        assert_eq!(composites[1].overlap, FILL_VALUE);
        assert_eq!(composites[1].avg_latency_hours, FILL_VALUE);
        assert!(composites[1].missing.identity);
    }

    #[test]
    fn test_left_join_fills_missing_aggregates() {
        let ids = universe(&["V1", "V2"]);
        let mut aggregates = Aggregates::default();
        aggregates.delivery.insert(
            "V1".to_string(),
            DeliveryMeans {
                cpm: 10.0,
                viewability: 0.7,
            },
        );
        aggregates.disputes.insert("V2".to_string(), 0.2);

        let composites = join_vendor_composites(&ids, &[], &aggregates);

        assert_eq!(composites[0].cpm, 10.0);
        assert_eq!(composites[0].dispute_rate, FILL_VALUE);
        assert!(composites[0].missing.finance);
        assert!(!composites[0].missing.delivery);

        assert_eq!(composites[1].cpm, FILL_VALUE);
        assert_eq!(composites[1].viewability, FILL_VALUE);
        assert_eq!(composites[1].dispute_rate, 0.2);
        assert!(composites[1].missing.optimistic());
    }

    #[test]
    fn test_first_identity_row_wins() {
        let ids = universe(&["V1"]);
        let identity = vec![identity("V1", 0.8, 0.5), identity("V1", 0.1, 0.1)];
        let composites = join_vendor_composites(&ids, &identity, &Aggregates::default());
        assert_eq!(composites[0].match_rate, 0.8);
    }

    #[test]
    fn test_missing_labels() {
        let missing = MissingMetrics {
            identity: false,
            delivery: true,
            finance: true,
        };
        assert_eq!(missing.labels(), vec!["delivery", "finance"]);
        assert!(missing.any());
        assert!(!MissingMetrics::default().any());
    }

    #[test]
    fn test_finance_variance() {
        let finance = vec![FinanceRecord {
            month: "2024-01".to_string(),
            vendor_id: "V1".to_string(),
            invoiced_usd: 1200.0,
            dispute_rate: 0.05,
        }];
        let budgets = vec![BudgetRecord {
            month: "2024-01".to_string(),
            vendor_id: "V1".to_string(),
            budget_allocated_usd: 1000.0,
        }];
        let rows = join_finance_variance(&finance, &budgets);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].variance_usd - 200.0).abs() < 1e-9);
        assert!(rows[0].budget_matched);
        assert_eq!(rows[0].dispute_rate, 0.05);
    }

    #[test]
    fn test_finance_variance_unmatched_budget() {
        let finance = vec![FinanceRecord {
            month: "2024-02".to_string(),
            vendor_id: "V1".to_string(),
            invoiced_usd: 750.0,
            dispute_rate: 0.0,
        }];
        let budgets = vec![BudgetRecord {
            month: "2024-01".to_string(),
            vendor_id: "V1".to_string(),
            budget_allocated_usd: 1000.0,
        }];
        let rows = join_finance_variance(&finance, &budgets);
        assert_eq!(rows[0].budget_allocated_usd, FILL_VALUE);
        assert_eq!(rows[0].variance_usd, 750.0);
        assert!(!rows[0].budget_matched);
    }
}
