//! Effect-size measures and their magnitude buckets
//!
//! Buckets follow Cohen's conventions. The label is always derived from the
//! value here and never stored independently of it.

use super::estimate::Estimate;
use serde::Serialize;
use std::fmt;

/// Effect-size measure attached to a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMeasure {
    /// Association strength between two categorical variables, in [0, 1]
    CramersV,
    /// Standardized mean difference between two samples
    CohensD,
    /// Share of variance explained by group membership, in [0, 1]
    EtaSquared,
}

impl EffectMeasure {
    /// Upper bounds of the negligible, small and medium buckets
    fn thresholds(self) -> [f64; 3] {
        match self {
            EffectMeasure::CramersV => [0.1, 0.3, 0.5],
            EffectMeasure::CohensD => [0.2, 0.5, 0.8],
            EffectMeasure::EtaSquared => [0.01, 0.06, 0.14],
        }
    }

    /// Bucket a value. Cohen's d is bucketed on its absolute value.
    pub fn classify(self, value: f64) -> Magnitude {
        let v = match self {
            EffectMeasure::CohensD => value.abs(),
            EffectMeasure::CramersV | EffectMeasure::EtaSquared => value,
        };
        let [negligible, small, medium] = self.thresholds();
        if v < negligible {
            Magnitude::Negligible
        } else if v < small {
            Magnitude::Small
        } else if v < medium {
            Magnitude::Medium
        } else {
            Magnitude::Large
        }
    }
}

impl fmt::Display for EffectMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectMeasure::CramersV => "Cramér's V",
            EffectMeasure::CohensD => "Cohen's d",
            EffectMeasure::EtaSquared => "eta-squared",
        };
        f.write_str(name)
    }
}

/// Qualitative effect magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl Magnitude {
    /// Bare bucket name, e.g. "large"
    pub fn as_str(self) -> &'static str {
        match self {
            Magnitude::Negligible => "negligible",
            Magnitude::Small => "small",
            Magnitude::Medium => "medium",
            Magnitude::Large => "large",
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Magnitude::Negligible => "negligible effect",
            Magnitude::Small => "small effect",
            Magnitude::Medium => "medium effect",
            Magnitude::Large => "large effect",
        };
        f.write_str(label)
    }
}

/// Effect-size value together with its bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSize {
    pub measure: EffectMeasure,
    pub estimate: Estimate,
    /// `None` exactly when the estimate is undefined
    pub magnitude: Option<Magnitude>,
}

impl EffectSize {
    pub fn new(measure: EffectMeasure, estimate: Estimate) -> Self {
        Self {
            measure,
            estimate,
            magnitude: estimate.value().map(|v| measure.classify(v)),
        }
    }
}

/// Five-level label for feature importance scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ImportanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.1 {
            ImportanceLevel::VeryLow
        } else if score < 0.3 {
            ImportanceLevel::Low
        } else if score < 0.5 {
            ImportanceLevel::Moderate
        } else if score < 0.7 {
            ImportanceLevel::High
        } else {
            ImportanceLevel::VeryHigh
        }
    }
}

impl fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportanceLevel::VeryLow => "very low",
            ImportanceLevel::Low => "low",
            ImportanceLevel::Moderate => "moderate",
            ImportanceLevel::High => "high",
            ImportanceLevel::VeryHigh => "very high",
        };
        f.write_str(label)
    }
}
