//! Layered settings.
//!
//! Values come from, lowest priority first: built-in defaults, an optional
//! TOML file, `VENDORWATCH_*` environment variables, and command line flags
//! (applied by the binary on top of the result).
//!
//! ```toml
//! data_dir = "data"
//! refresh_secs = 2
//! vendors = ["V1", "V3"]
//!
//! [weights]
//! match_rate = 0.3
//! cpm = 0.25
//!
//! [bands]
//! healthy_min = 75.0
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::{DashboardParams, ScoreBands, VendorSelection, Weights};

/// Environment variable prefix, e.g. `VENDORWATCH_DATA_DIR`.
pub const ENV_PREFIX: &str = "VENDORWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub refresh_secs: u64,
    pub weights: Weights,
    pub bands: ScoreBands,
    /// Initial vendor selection; `None` selects every vendor.
    pub vendors: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            refresh_secs: 2,
            weights: Weights::default(),
            bands: ScoreBands::default(),
            vendors: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Initial control parameters derived from these settings.
    pub fn dashboard_params(&self) -> DashboardParams {
        DashboardParams {
            weights: self.weights,
            selection: match &self.vendors {
                Some(ids) => VendorSelection::from_ids(ids.iter().cloned()),
                None => VendorSelection::All,
            },
            bands: self.bands,
        }
    }
}
