//! Per-vendor means over the delivery and finance tables.

use std::collections::HashMap;

use crate::source::{DeliveryRecord, FinanceRecord, VendorId};

/// Mean delivery metrics for one vendor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeliveryMeans {
    pub cpm: f64,
    pub viewability: f64,
}

/// Mean CPM and viewability per vendor over all delivery rows.
///
/// Vendors with no delivery rows are absent from the result.
pub fn mean_delivery_by_vendor(rows: &[DeliveryRecord]) -> HashMap<VendorId, DeliveryMeans> {
    mean_by_vendor(rows, |r| &r.vendor_id, |r| [r.cpm, r.viewability])
        .into_iter()
        .map(|(vendor, [cpm, viewability])| (vendor, DeliveryMeans { cpm, viewability }))
        .collect()
}

/// Mean dispute rate per vendor over all finance rows.
///
/// Vendors with no finance rows are absent from the result.
pub fn mean_dispute_rate_by_vendor(rows: &[FinanceRecord]) -> HashMap<VendorId, f64> {
    mean_by_vendor(rows, |r| &r.vendor_id, |r| [r.dispute_rate])
        .into_iter()
        .map(|(vendor, [dispute_rate])| (vendor, dispute_rate))
        .collect()
}

/// Arithmetic mean of `N` fields per vendor.
fn mean_by_vendor<T, const N: usize>(
    rows: &[T],
    vendor: impl Fn(&T) -> &VendorId,
    values: impl Fn(&T) -> [f64; N],
) -> HashMap<VendorId, [f64; N]> {
    let mut sums: HashMap<&VendorId, ([f64; N], usize)> = HashMap::new();

    for row in rows {
        let (acc, count) = sums.entry(vendor(row)).or_insert(([0.0; N], 0));
        for (slot, value) in acc.iter_mut().zip(values(row)) {
            *slot += value;
        }
        *count += 1;
    }

    sums.into_iter()
        .map(|(vendor, (acc, count))| (vendor.clone(), acc.map(|sum| sum / count as f64)))
        .collect()
}
