//! Data source abstraction for the five input tables.
//!
//! A data source is a memoized handle: it loads the tables once, keeps the
//! complete result, and only loads again when it is invalidated. Sources
//! decide what invalidates them (file changes, explicit refresh, a producer
//! replacing the tables).

mod error;
mod file;
mod memory;
mod rowsets;

pub use error::LoadError;
pub use file::CsvDirSource;
pub use memory::MemorySource;
pub use rowsets::{
    parse_date, parse_table, read_table, BudgetRecord, DeliveryRecord, FinanceRecord,
    HealthRecord, IdentityRecord, RowSets, VendorId, BUDGETS_FILE, DELIVERY_FILE, FINANCE_FILE,
    HEALTH_FILE, IDENTITY_FILE, TABLE_FILES,
};

use std::fmt::Debug;
use std::sync::Arc;

/// Trait for loading the input tables from various backends.
///
/// # Example
///
/// ```
/// use vendorwatch::{CsvDirSource, DataSource};
///
/// let mut source = CsvDirSource::new("data");
/// if let Some(rows) = source.poll() {
///     println!("Loaded {} vendors", rows.vendor_universe().len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for a new complete load.
    ///
    /// Returns `Some(rows)` only when the tables were (re)loaded since the
    /// previous poll, `None` otherwise. A failed load returns `None`, drops
    /// the previous load and records the error.
    fn poll(&mut self) -> Option<Arc<RowSets>>;

    /// The most recent complete load, if any.
    fn current(&self) -> Option<Arc<RowSets>>;

    /// Drop the memoized load so the next poll loads again.
    fn invalidate(&mut self);

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error message of the last failed load, if the last
    /// attempt failed.
    fn error(&self) -> Option<&str>;
}
