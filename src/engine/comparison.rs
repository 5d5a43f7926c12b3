//! Two-group comparison with automatic test selection
//!
//! Normality is checked per group with Shapiro-Wilk and equality of
//! variances with Levene (median-centred). Normal groups with equal
//! variances get Student's t-test, normal groups otherwise get Welch's
//! t-test, and everything else falls back to Mann-Whitney U.

use super::descriptive::{mean, sample_std};
use super::effect::{EffectMeasure, EffectSize};
use super::estimate::{Estimate, Undefined};
use super::hypothesis::{levene_median, mann_whitney_u, shapiro_wilk, ttest_independent};
use super::result::{TestMethod, TestResult, SIGNIFICANCE_LEVEL};
use super::samples::partition;
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::{Result, StatsError};
use serde::Serialize;

/// Shapiro-Wilk outcome for one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalityCheck {
    Tested { w: f64, p_value: f64 },
    /// Sample at or above the configured limit, assumed normal
    Skipped,
    /// Fewer than three observations, treated as non-normal
    TooFewObservations,
}

impl NormalityCheck {
    fn run(sample: &[f64], config: &EngineConfig) -> Result<Self> {
        if sample.len() >= config.normality_sample_limit {
            return Ok(NormalityCheck::Skipped);
        }
        Ok(match shapiro_wilk(sample)? {
            Some(sw) => NormalityCheck::Tested {
                w: sw.w,
                p_value: sw.p_value,
            },
            None => NormalityCheck::TooFewObservations,
        })
    }

    /// Whether the group may be treated as normally distributed
    pub fn passes(&self) -> bool {
        match self {
            NormalityCheck::Tested { p_value, .. } => *p_value > SIGNIFICANCE_LEVEL,
            NormalityCheck::Skipped => true,
            NormalityCheck::TooFewObservations => false,
        }
    }
}

/// Size and location of one compared group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: Estimate,
    pub std: Estimate,
}

impl GroupSummary {
    fn new(label: &str, sample: &[f64]) -> Self {
        Self {
            label: label.to_string(),
            n: sample.len(),
            mean: Estimate::from_option(mean(sample), Undefined::NoObservations),
            std: Estimate::from_option(
                sample_std(sample),
                if sample.is_empty() {
                    Undefined::NoObservations
                } else {
                    Undefined::ZeroVariance
                },
            ),
        }
    }
}

/// Result of [`compare_groups`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub test: TestResult,
    pub first: GroupSummary,
    pub second: GroupSummary,
    pub first_normality: NormalityCheck,
    pub second_normality: NormalityCheck,
    pub levene_p_value: Estimate,
}

impl ComparisonResult {
    /// Cohen's d (first minus second)
    pub fn cohens_d(&self) -> Estimate {
        self.test.effect.estimate
    }
}

/// Compare `value` between two levels of `group`
///
/// Both labels must be observed levels of the grouping column.
pub fn compare_groups(
    ds: &Dataset,
    value: &str,
    group: &str,
    first: &str,
    second: &str,
    config: &EngineConfig,
) -> Result<ComparisonResult> {
    let values = ds.numeric(value, "group comparison")?;
    let factor = ds.factor(group, "group comparison")?;

    let level = |label: &str| {
        factor
            .level_index(label)
            .ok_or_else(|| StatsError::UnknownLevel {
                column: group.to_string(),
                level: label.to_string(),
            })
    };
    let (a, b) = (level(first)?, level(second)?);

    let groups = partition(&values, &factor);
    compare_samples(first, &groups[a], second, &groups[b], config)
}

/// Compare two already extracted samples
pub fn compare_samples(
    first_label: &str,
    first: &[f64],
    second_label: &str,
    second: &[f64],
    config: &EngineConfig,
) -> Result<ComparisonResult> {
    let subject = format!("difference between {} and {}", first_label, second_label);
    let first_summary = GroupSummary::new(first_label, first);
    let second_summary = GroupSummary::new(second_label, second);

    if first.is_empty() || second.is_empty() {
        tracing::warn!(
            "Comparison {} vs {}: empty group ({} / {} observations)",
            first_label,
            second_label,
            first.len(),
            second.len()
        );
        let undefined = Estimate::Undefined(Undefined::NoObservations);
        return Ok(ComparisonResult {
            test: TestResult::new(
                TestMethod::MannWhitneyU,
                undefined,
                undefined,
                EffectSize::new(EffectMeasure::CohensD, undefined),
                &subject,
            ),
            first: first_summary,
            second: second_summary,
            first_normality: NormalityCheck::TooFewObservations,
            second_normality: NormalityCheck::TooFewObservations,
            levene_p_value: undefined,
        });
    }

    let first_normality = NormalityCheck::run(first, config)?;
    let second_normality = NormalityCheck::run(second, config)?;
    let levene_p_value = Estimate::from_option(
        levene_median(&[first, second])?.map(|l| l.p_value),
        Undefined::ZeroVariance,
    );

    let both_normal = first_normality.passes() && second_normality.passes();
    let equal_variances = levene_p_value
        .value()
        .is_some_and(|p| p > SIGNIFICANCE_LEVEL);

    let method = match (both_normal, equal_variances) {
        (true, true) => TestMethod::StudentT,
        (true, false) => TestMethod::WelchT,
        (false, _) => TestMethod::MannWhitneyU,
    };
    tracing::debug!(
        "Comparison {} vs {}: normal={} levene_p={} -> {}",
        first_label,
        second_label,
        both_normal,
        levene_p_value,
        method
    );

    let (statistic, p_value) = match method {
        TestMethod::MannWhitneyU => match mann_whitney_u(first, second)? {
            Some(mw) => (
                Estimate::Value(mw.u),
                Estimate::from_option(mw.p_value, Undefined::ZeroVariance),
            ),
            None => (
                Estimate::Undefined(Undefined::NoObservations),
                Estimate::Undefined(Undefined::NoObservations),
            ),
        },
        _ => t_statistic(first, second, method == TestMethod::StudentT)?,
    };

    Ok(ComparisonResult {
        test: TestResult::new(
            method,
            statistic,
            p_value,
            EffectSize::new(EffectMeasure::CohensD, cohens_d(first, second)),
            &subject,
        ),
        first: first_summary,
        second: second_summary,
        first_normality,
        second_normality,
        levene_p_value,
    })
}

fn t_statistic(first: &[f64], second: &[f64], equal_var: bool) -> Result<(Estimate, Estimate)> {
    let zero_spread = |s: &[f64]| sample_std(s).map_or(true, |sd| sd == 0.0);
    if (zero_spread(first) && zero_spread(second)) || first.len() < 2 || second.len() < 2 {
        let undefined = Estimate::Undefined(Undefined::ZeroVariance);
        return Ok((undefined, undefined));
    }

    let t = ttest_independent(first, second, equal_var)?;
    if !t.statistic.is_finite() {
        let undefined = Estimate::Undefined(Undefined::ZeroVariance);
        return Ok((undefined, undefined));
    }
    Ok((
        Estimate::Value(t.statistic),
        Estimate::Value(t.p_value.clamp(0.0, 1.0)),
    ))
}

/// Mean difference over the root mean of the two sample variances
pub fn cohens_d(first: &[f64], second: &[f64]) -> Estimate {
    let (Some(m1), Some(m2)) = (mean(first), mean(second)) else {
        return Estimate::Undefined(Undefined::NoObservations);
    };
    match (sample_std(first), sample_std(second)) {
        (Some(s1), Some(s2)) => {
            let pooled = ((s1 * s1 + s2 * s2) / 2.0).sqrt();
            Estimate::ratio(m1 - m2, pooled, Undefined::ZeroVariance)
        }
        _ => Estimate::Undefined(Undefined::ZeroVariance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_cohens_d_pooled_sd() {
        // s1 = s2 = 1, mean difference -2
        let d = cohens_d(&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0]);
        assert_eq!(d, Estimate::Value(-2.0));
    }

    #[test]
    fn test_cohens_d_zero_variance_undefined() {
        let d = cohens_d(&[5.0, 5.0, 5.0], &[5.0, 5.0]);
        assert_eq!(d, Estimate::Undefined(Undefined::ZeroVariance));
        assert_eq!(d.value_or_zero(), 0.0);
    }

    #[test]
    fn test_unknown_level_is_error() {
        let ds = DatasetBuilder::new()
            .float("adr", vec![Some(80.0), Some(90.0)])
            .categorical("hotel", vec![Some("City Hotel"), Some("Resort Hotel")])
            .build()
            .unwrap();
        let err = compare_groups(&ds, "adr", "hotel", "City Hotel", "Beach Hotel", &config())
            .unwrap_err();
        assert!(matches!(err, StatsError::UnknownLevel { .. }));
    }

    #[test]
    fn test_empty_group_is_all_undefined() {
        let result = compare_samples("a", &[1.0, 2.0, 3.0], "b", &[], &config()).unwrap();
        assert_eq!(
            result.test.p_value,
            Estimate::Undefined(Undefined::NoObservations)
        );
        assert!(!result.test.significant);
        assert_eq!(result.second.n, 0);
    }

    #[test]
    fn test_small_groups_fall_back_to_mann_whitney() {
        let result = compare_samples("a", &[1.0, 2.0], "b", &[3.0, 4.0], &config()).unwrap();
        assert_eq!(result.first_normality, NormalityCheck::TooFewObservations);
        assert_eq!(result.test.method, TestMethod::MannWhitneyU);
        assert_eq!(result.test.statistic, Estimate::Value(0.0));
    }

    #[test]
    fn test_unequal_spread_selects_welch() {
        let tight: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
        let wide: Vec<f64> = (0..30)
            .map(|i| 100.0 + if i % 2 == 0 { 40.0 } else { -40.0 } + (i % 5) as f64)
            .collect();
        // Force both groups to be treated as normal
        let config = EngineConfig {
            normality_sample_limit: 3,
            ..EngineConfig::default()
        };

        let result = compare_samples("tight", &tight, "wide", &wide, &config).unwrap();
        assert_eq!(result.first_normality, NormalityCheck::Skipped);
        assert!(result.levene_p_value.value().unwrap() < 0.05);
        assert_eq!(result.test.method, TestMethod::WelchT);
    }

    #[test]
    fn test_constant_normal_groups_have_undefined_t() {
        let config = EngineConfig {
            normality_sample_limit: 3,
            ..EngineConfig::default()
        };
        let result = compare_samples("a", &[2.0; 4], "b", &[2.0; 4], &config).unwrap();
        assert_eq!(result.test.method, TestMethod::WelchT);
        assert_eq!(
            result.test.statistic,
            Estimate::Undefined(Undefined::ZeroVariance)
        );
        assert!(!result.test.significant);
    }
}
