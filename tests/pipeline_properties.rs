use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use vendorwatch::data::{compute_dashboard, DashboardParams, ScoreBands, VendorSelection, Weights};
use vendorwatch::source::{
    BudgetRecord, DeliveryRecord, FinanceRecord, HealthRecord, IdentityRecord, RowSets,
};

const VENDORS: [&str; 6] = ["V1", "V2", "V3", "V4", "V5", "V6"];

fn vendor() -> impl Strategy<Value = String> {
    prop::sample::select(VENDORS.to_vec()).prop_map(str::to_string)
}

fn weight() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

fn weights() -> impl Strategy<Value = Weights> {
    (weight(), weight(), weight(), weight(), weight()).prop_map(
        |(match_rate, overlap, cpm, viewability, disputes)| Weights {
            match_rate,
            overlap,
            cpm,
            viewability,
            disputes,
        },
    )
}

fn delivery() -> impl Strategy<Value = DeliveryRecord> {
    (vendor(), 1u32..=28, 0.0f64..40.0, 0.0f64..=1.0, 0.0f64..0.1).prop_map(
        |(vendor_id, day, cpm, viewability, ctr)| DeliveryRecord {
            vendor_id,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            cpm,
            viewability,
            ctr,
        },
    )
}

fn finance() -> impl Strategy<Value = FinanceRecord> {
    (vendor(), 1u32..=3, 0.0f64..10_000.0, 0.0f64..=1.0).prop_map(
        |(vendor_id, month, invoiced_usd, dispute_rate)| FinanceRecord {
            month: format!("2024-0{}", month),
            vendor_id,
            invoiced_usd,
            dispute_rate,
        },
    )
}

fn identity() -> impl Strategy<Value = IdentityRecord> {
    (vendor(), 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..48.0).prop_map(
        |(vendor_id, match_rate, overlap, avg_latency_hours)| IdentityRecord {
            vendor_id,
            match_rate,
            overlap,
            avg_latency_hours,
        },
    )
}

fn budget() -> impl Strategy<Value = BudgetRecord> {
    (vendor(), 1u32..=3, 0.0f64..10_000.0).prop_map(|(vendor_id, month, budget_allocated_usd)| {
        BudgetRecord {
            month: format!("2024-0{}", month),
            vendor_id,
            budget_allocated_usd,
        }
    })
}

fn rowsets() -> impl Strategy<Value = RowSets> {
    (
        prop::collection::vec(vendor(), 0..8),
        prop::collection::vec(delivery(), 0..20),
        prop::collection::vec(finance(), 0..10),
        prop::collection::vec(identity(), 0..8),
        prop::collection::vec(budget(), 0..10),
    )
        .prop_map(|(health, delivery, finance, identity, budgets)| RowSets {
            health: health
                .into_iter()
                .map(|vendor_id| HealthRecord { vendor_id })
                .collect(),
            delivery,
            finance,
            identity,
            budgets,
        })
}

fn selection() -> impl Strategy<Value = VendorSelection> {
    prop_oneof![
        Just(VendorSelection::All),
        prop::collection::btree_set(vendor(), 0..6).prop_map(VendorSelection::Only),
    ]
}

proptest! {
    #[test]
    fn positive_weights_normalize_to_one(w in weights()) {
        prop_assume!(w.as_array().iter().sum::<f64>() > 0.0);
        let normalized = w.normalized();
        let sum: f64 = normalized.weights.iter().sum();
        prop_assert!(!normalized.fallback);
        prop_assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn scores_stay_in_range(rows in rowsets(), w in weights(), sel in selection()) {
        let params = DashboardParams { weights: w, selection: sel, bands: ScoreBands::default() };
        let view = compute_dashboard(&rows, &params);
        for vendor in &view.ranking {
            let score = vendor.health_score();
            prop_assert!((0.0..=100.0).contains(&score), "{} scored {}", vendor.vendor_id(), score);
        }
    }

    #[test]
    fn recomputation_is_idempotent(rows in rowsets(), w in weights(), sel in selection()) {
        let params = DashboardParams { weights: w, selection: sel, bands: ScoreBands::default() };
        let first = compute_dashboard(&rows, &params);
        let second = compute_dashboard(&rows, &params);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranked_set_is_selection_within_universe(rows in rowsets(), sel in selection()) {
        let params = DashboardParams { selection: sel.clone(), ..Default::default() };
        let view = compute_dashboard(&rows, &params);

        let ranked: BTreeSet<&str> = view.ranking.iter().map(|r| r.vendor_id()).collect();
        let expected: BTreeSet<&str> = rows
            .health
            .iter()
            .map(|h| h.vendor_id.as_str())
            .filter(|v| sel.contains(v))
            .collect();
        prop_assert_eq!(ranked.len(), view.ranking.len(), "vendor ranked twice");
        prop_assert_eq!(ranked, expected);
    }

    #[test]
    fn all_matches_explicit_universe(rows in rowsets(), w in weights()) {
        let all = DashboardParams { weights: w, ..Default::default() };
        let explicit = DashboardParams {
            weights: w,
            selection: VendorSelection::from_ids(rows.vendor_universe()),
            ..Default::default()
        };
        prop_assert_eq!(compute_dashboard(&rows, &all), compute_dashboard(&rows, &explicit));
    }

    #[test]
    fn ranking_is_descending(rows in rowsets(), w in weights()) {
        let params = DashboardParams { weights: w, ..Default::default() };
        let view = compute_dashboard(&rows, &params);
        for pair in view.ranking.windows(2) {
            prop_assert!(pair[0].health_score() >= pair[1].health_score());
        }
    }

    #[test]
    fn zero_weights_score_with_equal_weights(rows in rowsets()) {
        let zero = Weights { match_rate: 0.0, overlap: 0.0, cpm: 0.0, viewability: 0.0, disputes: 0.0 };
        let params = DashboardParams { weights: zero, ..Default::default() };
        let view = compute_dashboard(&rows, &params);
        prop_assert!(view.weights.fallback);
        for vendor in &view.ranking {
            prop_assert!(vendor.health_score().is_finite());
        }
    }

    #[test]
    fn variance_is_invoiced_minus_budget(rows in rowsets()) {
        let view = compute_dashboard(&rows, &DashboardParams::default());
        let known = rows
            .finance
            .iter()
            .filter(|f| rows.health.iter().any(|h| h.vendor_id == f.vendor_id))
            .count();
        prop_assert_eq!(view.finance_variance.len(), known);
        for row in &view.finance_variance {
            let expected = row.invoiced_usd - row.budget_allocated_usd;
            prop_assert!((row.variance_usd - expected).abs() < 1e-9);
        }
    }
}
