//! In-memory data source.
//!
//! Holds tables that were produced in-process, for embedding the dashboard
//! in another program or driving it from tests.

use std::sync::Arc;

use super::{DataSource, RowSets};

/// A data source backed by tables already in memory.
///
/// The tables are handed out on the first poll and again after every
/// [`MemorySource::replace`] or [`DataSource::invalidate`].
///
/// # Example
///
/// ```
/// use vendorwatch::{DataSource, MemorySource, RowSets};
///
/// let mut source = MemorySource::new(RowSets::default(), "fixture");
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
/// ```
#[derive(Debug)]
pub struct MemorySource {
    rows: Arc<RowSets>,
    description: String,
    changed: bool,
}

impl MemorySource {
    /// Create a new in-memory source.
    ///
    /// `source_description` says where the tables came from (shown in the
    /// status bar).
    pub fn new(rows: RowSets, source_description: &str) -> Self {
        Self {
            rows: Arc::new(rows),
            description: format!("memory: {}", source_description),
            changed: true,
        }
    }

    /// Swap in a new set of tables; the next poll returns them.
    pub fn replace(&mut self, rows: RowSets) {
        self.rows = Arc::new(rows);
        self.changed = true;
    }
}

impl DataSource for MemorySource {
    fn poll(&mut self) -> Option<Arc<RowSets>> {
        if self.changed {
            self.changed = false;
            Some(Arc::clone(&self.rows))
        } else {
            None
        }
    }

    fn current(&self) -> Option<Arc<RowSets>> {
        Some(Arc::clone(&self.rows))
    }

    fn invalidate(&mut self) {
        self.changed = true;
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // In-memory tables are complete by construction
        None
    }
}
