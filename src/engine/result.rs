//! The common test result record

use super::effect::EffectSize;
use super::estimate::Estimate;
use serde::Serialize;
use std::fmt;

/// Significance threshold (alpha) shared by every test
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Hypothesis test that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    /// Pearson's chi-square test of independence
    ChiSquare,
    /// Two-sample t-test assuming equal variances
    StudentT,
    /// Two-sample t-test without the equal-variance assumption
    WelchT,
    /// Rank-based two-sample comparison
    MannWhitneyU,
    /// One-way analysis of variance
    OneWayAnova,
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestMethod::ChiSquare => "Chi-square test of independence",
            TestMethod::StudentT => "Student's t-test (equal variances)",
            TestMethod::WelchT => "Welch's t-test (unequal variances)",
            TestMethod::MannWhitneyU => "Mann-Whitney U",
            TestMethod::OneWayAnova => "One-way ANOVA",
        };
        f.write_str(name)
    }
}

/// Outcome of a single hypothesis test
///
/// `significant` is `p_value < SIGNIFICANCE_LEVEL` for a defined p-value and
/// `false` otherwise. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub method: TestMethod,
    pub statistic: Estimate,
    pub p_value: Estimate,
    pub effect: EffectSize,
    pub significant: bool,
    pub interpretation: String,
}

impl TestResult {
    /// Build a result and its interpretation
    ///
    /// `subject` names what was tested, e.g. "association between hotel and
    /// is_canceled".
    pub fn new(
        method: TestMethod,
        statistic: Estimate,
        p_value: Estimate,
        effect: EffectSize,
        subject: &str,
    ) -> Self {
        let significant = p_value.value().is_some_and(|p| p < SIGNIFICANCE_LEVEL);
        let interpretation = match p_value {
            Estimate::Value(p) if significant => format!("Significant {} (p={:.4})", subject, p),
            Estimate::Value(p) => format!("No significant {} (p={:.4})", subject, p),
            Estimate::Undefined(reason) => {
                format!("Could not assess {} ({})", subject, reason)
            }
        };

        Self {
            method,
            statistic,
            p_value,
            effect,
            significant,
            interpretation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effect::EffectMeasure;
    use crate::engine::estimate::Undefined;

    fn effect() -> EffectSize {
        EffectSize::new(EffectMeasure::CramersV, Estimate::Value(0.2))
    }

    #[test]
    fn test_significant_interpretation() {
        let r = TestResult::new(
            TestMethod::ChiSquare,
            Estimate::Value(12.0),
            Estimate::Value(0.0004),
            effect(),
            "association between a and b",
        );
        assert!(r.significant);
        assert_eq!(
            r.interpretation,
            "Significant association between a and b (p=0.0004)"
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let r = TestResult::new(
            TestMethod::ChiSquare,
            Estimate::Value(3.84),
            Estimate::Value(0.05),
            effect(),
            "association between a and b",
        );
        assert!(!r.significant);
        assert!(r.interpretation.starts_with("No significant"));
    }

    #[test]
    fn test_undefined_p_value_is_not_significant() {
        let r = TestResult::new(
            TestMethod::OneWayAnova,
            Estimate::Undefined(Undefined::SingleGroup),
            Estimate::Undefined(Undefined::SingleGroup),
            effect(),
            "difference between groups",
        );
        assert!(!r.significant);
        assert_eq!(
            r.interpretation,
            "Could not assess difference between groups (single group)"
        );
    }
}
