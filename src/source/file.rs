//! CSV directory data source.
//!
//! Loads the five tables from a directory and reloads them when any of the
//! files changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::{DataSource, RowSets, TABLE_FILES};

/// Modification times of the five files, in [`TABLE_FILES`] order.
type Fingerprint = [Option<SystemTime>; 5];

/// A data source that reads the five tables from a directory of CSV files.
///
/// The source tracks the modification time of every file and only loads
/// again when one of them has changed, or after [`DataSource::invalidate`].
/// A load is all-or-nothing: if any file fails, nothing is served until the
/// files load cleanly again, and the error is reported through
/// [`DataSource::error`].
#[derive(Debug)]
pub struct CsvDirSource {
    dir: PathBuf,
    description: String,
    last_error: Option<String>,
    last_fingerprint: Option<Fingerprint>,
    cached: Option<Arc<RowSets>>,
}

impl CsvDirSource {
    /// Create a new source for the given data directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("dir: {}", dir.display());
        Self {
            dir,
            description,
            last_error: None,
            last_fingerprint: None,
            cached: None,
        }
    }

    /// Returns the directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn fingerprint(&self) -> Fingerprint {
        TABLE_FILES.map(|name| {
            fs::metadata(self.dir.join(name))
                .and_then(|m| m.modified())
                .ok()
        })
    }
}

impl DataSource for CsvDirSource {
    fn poll(&mut self) -> Option<Arc<RowSets>> {
        let fingerprint = self.fingerprint();

        let changed = match &self.last_fingerprint {
            None => true, // First poll or invalidated, always load
            Some(last) => *last != fingerprint,
        };
        if !changed {
            return None;
        }

        // Record the attempt either way so a broken file is not re-read on
        // every tick; it is retried when it changes or on explicit refresh.
        self.last_fingerprint = Some(fingerprint);

        tracing::info!(dir = %self.dir.display(), "loading tables");
        match RowSets::load_dir(&self.dir) {
            Ok(rows) => {
                let [health, delivery, finance, identity, budgets] = rows.row_counts();
                tracing::info!(
                    health,
                    delivery,
                    finance,
                    identity,
                    budgets,
                    "tables loaded"
                );
                let rows = Arc::new(rows);
                self.last_error = None;
                self.cached = Some(Arc::clone(&rows));
                Some(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed; dropping tables");
                self.last_error = Some(e.to_string());
                self.cached = None;
                None
            }
        }
    }

    fn current(&self) -> Option<Arc<RowSets>> {
        self.cached.clone()
    }

    fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BUDGETS_FILE, DELIVERY_FILE, FINANCE_FILE, HEALTH_FILE, IDENTITY_FILE};
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join(HEALTH_FILE), "VENDOR_ID,NAME\nV1,Acme\nV2,Globex\n").unwrap();
        fs::write(
            dir.join(DELIVERY_FILE),
            "VENDOR_ID,DT,CPM,VIEWABILITY,CTR\nV1,2024-01-01,10,0.7,0.01\nV2,2024-01-01,12,0.6,0.02\n",
        )
        .unwrap();
        fs::write(
            dir.join(FINANCE_FILE),
            "MONTH,VENDOR_ID,INVOICED_USD,DISPUTE_RATE\n2024-01,V1,1200,0.05\n",
        )
        .unwrap();
        fs::write(
            dir.join(IDENTITY_FILE),
            "VENDOR_ID,MATCH_RATE,OVERLAP,AVG_LATENCY_HOURS\nV1,0.8,0.5,2\n",
        )
        .unwrap();
        fs::write(
            dir.join(BUDGETS_FILE),
            "MONTH,VENDOR_ID,BUDGET_ALLOCATED_USD\n2024-01,V1,1000\n",
        )
        .unwrap();
    }

    #[test]
    fn test_csv_dir_source_new() {
        let source = CsvDirSource::new("/tmp/vendors");
        assert_eq!(source.dir(), Path::new("/tmp/vendors"));
        assert_eq!(source.description(), "dir: /tmp/vendors");
        assert!(source.error().is_none());
        assert!(source.current().is_none());
    }

    #[test]
    fn test_poll_loads_once() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let mut source = CsvDirSource::new(dir.path());

        let rows = source.poll().expect("first poll loads");
        assert_eq!(rows.row_counts(), [2, 2, 1, 1, 1]);

        // Unchanged files: nothing new
        assert!(source.poll().is_none());
        assert!(source.current().is_some());
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let mut source = CsvDirSource::new(dir.path());

        assert!(source.poll().is_some());
        source.invalidate();
        assert!(source.poll().is_some());
    }

    #[test]
    fn test_missing_file_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        fs::remove_file(dir.path().join(BUDGETS_FILE)).unwrap();

        let mut source = CsvDirSource::new(dir.path());
        assert!(source.poll().is_none());
        assert!(source.current().is_none());
        assert!(source.error().unwrap().contains("budgets.csv"));
    }

    #[test]
    fn test_failed_reload_drops_previous_load() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let mut source = CsvDirSource::new(dir.path());
        assert!(source.poll().is_some());

        fs::write(dir.path().join(IDENTITY_FILE), "VENDOR_ID\nV1\n").unwrap();
        source.invalidate();

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("identity.csv"));
        assert!(source.current().is_none());
    }

    #[test]
    fn test_recovers_after_fix() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join(FINANCE_FILE),
            "MONTH,VENDOR_ID,INVOICED_USD,DISPUTE_RATE\n2024-01,V1,abc,0.05\n",
        )
        .unwrap();

        let mut source = CsvDirSource::new(dir.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        write_fixture(dir.path());
        source.invalidate();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
