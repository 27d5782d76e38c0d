//! Classification of health scores into bands.

use serde::{Deserialize, Serialize};

/// Score cutoffs for the health bands.
///
/// A score at or above `healthy_min` is healthy; at or above `warning_min`
/// it is a warning; anything lower is critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBands {
    pub healthy_min: f64,
    pub warning_min: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            healthy_min: 70.0,
            warning_min: 40.0,
        }
    }
}

impl ScoreBands {
    pub fn classify(&self, score: f64) -> ScoreBand {
        if score >= self.healthy_min {
            ScoreBand::Healthy
        } else if score >= self.warning_min {
            ScoreBand::Warning
        } else {
            ScoreBand::Critical
        }
    }
}

/// Health band of a vendor score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Healthy,
    Warning,
    Critical,
}

impl ScoreBand {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ScoreBand::Healthy => "OK",
            ScoreBand::Warning => "WARN",
            ScoreBand::Critical => "CRIT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Healthy => "Healthy",
            ScoreBand::Warning => "Warning",
            ScoreBand::Critical => "Critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let bands = ScoreBands::default();
        assert_eq!(bands.classify(100.0), ScoreBand::Healthy);
        assert_eq!(bands.classify(70.0), ScoreBand::Healthy);
        assert_eq!(bands.classify(69.99), ScoreBand::Warning);
        assert_eq!(bands.classify(40.0), ScoreBand::Warning);
        assert_eq!(bands.classify(39.9), ScoreBand::Critical);
        assert_eq!(bands.classify(0.0), ScoreBand::Critical);
    }

    #[test]
    fn test_custom_bands() {
        let bands = ScoreBands {
            healthy_min: 50.0,
            warning_min: 20.0,
        };
        assert_eq!(bands.classify(57.3), ScoreBand::Healthy);
        assert_eq!(bands.classify(25.0), ScoreBand::Warning);
    }

    #[test]
    fn test_band_ordering() {
        assert!(ScoreBand::Healthy < ScoreBand::Warning);
        assert!(ScoreBand::Warning < ScoreBand::Critical);
        assert_eq!(ScoreBand::Critical.symbol(), "CRIT");
    }
}
