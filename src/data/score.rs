//! Weighted health-score formula.
//!
//! ```text
//! score = clip01(
//!     w_match       * match_rate
//!   + w_overlap     * overlap
//!   + w_cpm         * (1 - cpm / CPM_TARGET)
//!   + w_viewability * ((viewability - VIEWABILITY_BASELINE) / VIEWABILITY_BASELINE)
//!   + w_disputes    * (1 - dispute_rate)
//! ) * 100
//! ```
//!
//! Weights are normalized to sum to one before use. Clipping applies to the
//! sum, never to individual terms.

use serde::{Deserialize, Serialize};

use super::join::VendorComposite;
use crate::source::VendorId;

/// CPM at which the CPM term contributes zero.
pub const CPM_TARGET: f64 = 15.0;

/// Viewability at which the viewability term contributes zero.
pub const VIEWABILITY_BASELINE: f64 = 0.5;

/// Step used by the interactive weight controls.
pub const WEIGHT_STEP: f64 = 0.01;

/// One of the five weighted components of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    MatchRate,
    Overlap,
    Cpm,
    Viewability,
    Disputes,
}

impl Component {
    /// All components in formula order.
    pub const ALL: [Component; 5] = [
        Component::MatchRate,
        Component::Overlap,
        Component::Cpm,
        Component::Viewability,
        Component::Disputes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Component::MatchRate => "Match rate",
            Component::Overlap => "Overlap",
            Component::Cpm => "CPM",
            Component::Viewability => "Viewability",
            Component::Disputes => "Disputes",
        }
    }

    /// Position in [`Component::ALL`] and in weight/term arrays.
    pub fn index(&self) -> usize {
        match self {
            Component::MatchRate => 0,
            Component::Overlap => 1,
            Component::Cpm => 2,
            Component::Viewability => 3,
            Component::Disputes => 4,
        }
    }
}

/// Raw, user-facing weights. Each is expected in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub match_rate: f64,
    pub overlap: f64,
    pub cpm: f64,
    pub viewability: f64,
    pub disputes: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            match_rate: 0.30,
            overlap: 0.15,
            cpm: 0.25,
            viewability: 0.20,
            disputes: 0.10,
        }
    }
}

impl Weights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.match_rate,
            self.overlap,
            self.cpm,
            self.viewability,
            self.disputes,
        ]
    }

    pub fn get(&self, component: Component) -> f64 {
        self.as_array()[component.index()]
    }

    pub fn set(&mut self, component: Component, value: f64) {
        let slot = match component {
            Component::MatchRate => &mut self.match_rate,
            Component::Overlap => &mut self.overlap,
            Component::Cpm => &mut self.cpm,
            Component::Viewability => &mut self.viewability,
            Component::Disputes => &mut self.disputes,
        };
        *slot = sanitize(value);
    }

    /// Move one weight by `delta`, clamped to `[0, 1]` and rounded to the
    /// control step so repeated presses don't accumulate float drift.
    pub fn adjust(&mut self, component: Component, delta: f64) {
        let value = self.get(component) + delta;
        let rounded = (value / WEIGHT_STEP).round() * WEIGHT_STEP;
        self.set(component, rounded);
    }

    /// Weights clamped to `[0, 1]`, with NaN treated as zero.
    pub fn sanitized(&self) -> [f64; 5] {
        self.as_array().map(sanitize)
    }

    /// Normalize the sanitized weights to sum to one.
    ///
    /// When every weight is zero the result is equal weights of 0.2 and
    /// `fallback` is set.
    pub fn normalized(&self) -> NormalizedWeights {
        let raw = self.sanitized();
        let sum: f64 = raw.iter().sum();
        if sum > 0.0 {
            NormalizedWeights {
                weights: raw.map(|w| w / sum),
                fallback: false,
            }
        } else {
            NormalizedWeights {
                weights: [1.0 / Component::ALL.len() as f64; 5],
                fallback: true,
            }
        }
    }
}

fn sanitize(w: f64) -> f64 {
    if w.is_nan() {
        0.0
    } else {
        w.clamp(0.0, 1.0)
    }
}

/// Weights that sum to one, in [`Component::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedWeights {
    pub weights: [f64; 5],
    /// True when the raw weights were all zero and equal weights were used.
    pub fallback: bool,
}

impl NormalizedWeights {
    pub fn get(&self, component: Component) -> f64 {
        self.weights[component.index()]
    }
}

/// The five weighted terms for one vendor, before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub terms: [f64; 5],
}

impl ScoreBreakdown {
    pub fn term(&self, component: Component) -> f64 {
        self.terms[component.index()]
    }

    /// Sum of the terms, unclipped.
    pub fn raw_total(&self) -> f64 {
        self.terms.iter().sum()
    }

    /// The final 0-100 score.
    pub fn score(&self) -> f64 {
        clip01(self.raw_total()) * 100.0
    }
}

/// Clamp to `[0, 1]`. NaN maps to zero.
pub fn clip01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

pub fn score_breakdown(composite: &VendorComposite, weights: &NormalizedWeights) -> ScoreBreakdown {
    let w = weights.weights;
    ScoreBreakdown {
        terms: [
            w[0] * composite.match_rate,
            w[1] * composite.overlap,
            w[2] * (1.0 - composite.cpm / CPM_TARGET),
            w[3] * ((composite.viewability - VIEWABILITY_BASELINE) / VIEWABILITY_BASELINE),
            w[4] * (1.0 - composite.dispute_rate),
        ],
    }
}

/// Health score in `[0, 100]` for one composite.
pub fn health_score(composite: &VendorComposite, weights: &NormalizedWeights) -> f64 {
    score_breakdown(composite, weights).score()
}

/// A vendor with its dynamic health score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorScore {
    pub vendor_id: VendorId,
    pub health_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::join::MissingMetrics;

    fn v1() -> VendorComposite {
        VendorComposite {
            vendor_id: "V1".to_string(),
            match_rate: 0.8,
            overlap: 0.5,
            avg_latency_hours: 2.0,
            dispute_rate: 0.05,
            cpm: 10.0,
            viewability: 0.7,
            missing: MissingMetrics::default(),
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let sum: f64 = Weights::default().as_array().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_vendor_score() {
        let weights = Weights::default().normalized();
        let score = health_score(&v1(), &weights);
        assert!((score - 57.333).abs() < 0.01, "score was {score}");
    }

    #[test]
    fn test_normalization_scales_weights() {
        let weights = Weights {
            match_rate: 1.0,
            overlap: 1.0,
            cpm: 0.0,
            viewability: 0.0,
            disputes: 0.0,
        }
        .normalized();
        assert!(!weights.fallback);
        assert_eq!(weights.weights, [0.5, 0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_equal() {
        let weights = Weights {
            match_rate: 0.0,
            overlap: 0.0,
            cpm: 0.0,
            viewability: 0.0,
            disputes: 0.0,
        }
        .normalized();
        assert!(weights.fallback);
        assert_eq!(weights.weights, [0.2; 5]);

        let score = health_score(&v1(), &weights);
        assert!(score.is_finite());
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_out_of_range_weights_are_sanitized() {
        let weights = Weights {
            match_rate: f64::NAN,
            overlap: 3.0,
            cpm: -1.0,
            viewability: 0.0,
            disputes: 0.0,
        };
        assert_eq!(weights.sanitized(), [0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(weights.normalized().weights, [0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_clip_applies_to_sum() {
        let mut composite = v1();
        composite.cpm = 60.0; // CPM term goes strongly negative
        let weights = Weights::default().normalized();
        let breakdown = score_breakdown(&composite, &weights);
        assert!(breakdown.term(Component::Cpm) < 0.0);
        assert!((0.0..=100.0).contains(&breakdown.score()));
    }

    #[test]
    fn test_missing_metrics_score_optimistically() {
        let mut composite = v1();
        composite.cpm = 0.0;
        composite.dispute_rate = 0.0;
        let weights = Weights::default().normalized();
        let breakdown = score_breakdown(&composite, &weights);
        assert!((breakdown.term(Component::Cpm) - 0.25).abs() < 1e-12);
        assert!((breakdown.term(Component::Disputes) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_clip01() {
        assert_eq!(clip01(-0.5), 0.0);
        assert_eq!(clip01(1.5), 1.0);
        assert_eq!(clip01(0.25), 0.25);
        assert_eq!(clip01(f64::NAN), 0.0);
    }

    #[test]
    fn test_adjust_steps_and_clamps() {
        let mut weights = Weights::default();
        weights.adjust(Component::Cpm, WEIGHT_STEP);
        assert!((weights.cpm - 0.26).abs() < 1e-12);

        for _ in 0..200 {
            weights.adjust(Component::Cpm, WEIGHT_STEP);
        }
        assert_eq!(weights.cpm, 1.0);

        for _ in 0..200 {
            weights.adjust(Component::Disputes, -WEIGHT_STEP);
        }
        assert_eq!(weights.disputes, 0.0);
    }

    #[test]
    fn test_component_order_matches_weights() {
        let weights = Weights::default();
        for component in Component::ALL {
            assert_eq!(weights.get(component), weights.as_array()[component.index()]);
        }
    }
}
