//! Record types for the five input tables and their CSV parsing.
//!
//! Each table is read by header name, so column order does not matter and
//! columns the dashboard does not use are ignored. A table that is missing a
//! required column, or has a value that does not parse, fails the whole load.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::LoadError;

/// Opaque vendor identifier shared by every table.
pub type VendorId = String;

/// File names expected inside a data directory, in load order.
pub const HEALTH_FILE: &str = "health.csv";
pub const DELIVERY_FILE: &str = "delivery.csv";
pub const FINANCE_FILE: &str = "finance.csv";
pub const IDENTITY_FILE: &str = "identity.csv";
pub const BUDGETS_FILE: &str = "budgets.csv";

pub const TABLE_FILES: [&str; 5] = [
    HEALTH_FILE,
    DELIVERY_FILE,
    FINANCE_FILE,
    IDENTITY_FILE,
    BUDGETS_FILE,
];

/// A row of `health.csv`. Only the vendor id is used; it defines the
/// universe of known vendors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    #[serde(rename = "VENDOR_ID")]
    pub vendor_id: VendorId,
}

/// A row of `delivery.csv` (one per vendor per day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(rename = "VENDOR_ID")]
    pub vendor_id: VendorId,
    #[serde(rename = "DT", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "CPM")]
    pub cpm: f64,
    #[serde(rename = "VIEWABILITY")]
    pub viewability: f64,
    #[serde(rename = "CTR")]
    pub ctr: f64,
}

/// A row of `finance.csv` (one per vendor per month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceRecord {
    #[serde(rename = "MONTH")]
    pub month: String,
    #[serde(rename = "VENDOR_ID")]
    pub vendor_id: VendorId,
    #[serde(rename = "INVOICED_USD")]
    pub invoiced_usd: f64,
    #[serde(rename = "DISPUTE_RATE")]
    pub dispute_rate: f64,
}

/// A row of `identity.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(rename = "VENDOR_ID")]
    pub vendor_id: VendorId,
    #[serde(rename = "MATCH_RATE")]
    pub match_rate: f64,
    #[serde(rename = "OVERLAP")]
    pub overlap: f64,
    #[serde(rename = "AVG_LATENCY_HOURS")]
    pub avg_latency_hours: f64,
}

/// A row of `budgets.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    #[serde(rename = "MONTH")]
    pub month: String,
    #[serde(rename = "VENDOR_ID")]
    pub vendor_id: VendorId,
    #[serde(rename = "BUDGET_ALLOCATED_USD")]
    pub budget_allocated_usd: f64,
}

/// The five tables of one complete load.
///
/// A `RowSets` value only exists when every table loaded; there is no
/// partially populated state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSets {
    pub health: Vec<HealthRecord>,
    pub delivery: Vec<DeliveryRecord>,
    pub finance: Vec<FinanceRecord>,
    pub identity: Vec<IdentityRecord>,
    pub budgets: Vec<BudgetRecord>,
}

impl RowSets {
    /// Load all five tables from `dir`.
    ///
    /// Any missing or malformed file aborts the load.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            health: read_table(&dir.join(HEALTH_FILE))?,
            delivery: read_table(&dir.join(DELIVERY_FILE))?,
            finance: read_table(&dir.join(FINANCE_FILE))?,
            identity: read_table(&dir.join(IDENTITY_FILE))?,
            budgets: read_table(&dir.join(BUDGETS_FILE))?,
        })
    }

    /// Distinct vendor ids of the health table, in first-appearance order.
    pub fn vendor_universe(&self) -> Vec<VendorId> {
        let mut seen = HashSet::new();
        self.health
            .iter()
            .filter(|r| seen.insert(r.vendor_id.as_str()))
            .map(|r| r.vendor_id.clone())
            .collect()
    }

    /// Row counts per table, in [`TABLE_FILES`] order.
    pub fn row_counts(&self) -> [usize; 5] {
        [
            self.health.len(),
            self.delivery.len(),
            self.finance.len(),
            self.identity.len(),
            self.budgets.len(),
        ]
    }
}

/// Read one CSV file into typed records.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_table(file, &name)
}

/// Parse CSV content with a header row into typed records.
///
/// `file` names the table in error messages.
pub fn parse_table<T: DeserializeOwned, R: Read>(reader: R, file: &str) -> Result<Vec<T>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })
}

/// Parse a delivery date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps;
/// timestamps are truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw:?}")))
}
