//! One-way ANOVA across every level of a grouping column

use super::descriptive::{mean, median, sample_std, sum_squares};
use super::effect::{EffectMeasure, EffectSize};
use super::estimate::{Estimate, Undefined};
use super::hypothesis::f_survival;
use super::result::{TestMethod, TestResult};
use super::samples::partition;
use crate::dataset::Dataset;
use crate::error::Result;
use serde::Serialize;

/// Descriptive statistics for one ANOVA group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub label: String,
    pub n: usize,
    pub mean: f64,
    /// Undefined for single-observation groups
    pub std: Estimate,
    pub median: f64,
}

/// Result of [`anova`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub test: TestResult,
    pub groups: Vec<GroupStats>,
    pub n_groups: usize,
    pub df_between: usize,
    pub df_within: usize,
}

impl AnovaResult {
    pub fn eta_squared(&self) -> Estimate {
        self.test.effect.estimate
    }
}

/// One-way ANOVA of `value` across the levels of `group`
pub fn anova(ds: &Dataset, value: &str, group: &str) -> Result<AnovaResult> {
    let values = ds.numeric(value, "ANOVA")?;
    let factor = ds.factor(group, "ANOVA")?;

    let labelled: Vec<(String, Vec<f64>)> = factor
        .labels()
        .iter()
        .cloned()
        .zip(partition(&values, &factor))
        .filter(|(_, sample)| !sample.is_empty())
        .collect();

    anova_samples(&labelled)
}

/// One-way ANOVA over labelled samples; empty samples are ignored
pub fn anova_samples(samples: &[(String, Vec<f64>)]) -> Result<AnovaResult> {
    let groups: Vec<(&str, &[f64])> = samples
        .iter()
        .filter(|(_, s)| !s.is_empty())
        .map(|(label, s)| (label.as_str(), s.as_slice()))
        .collect();

    let stats: Vec<GroupStats> = groups
        .iter()
        .map(|(label, sample)| GroupStats {
            label: label.to_string(),
            n: sample.len(),
            mean: mean(sample).unwrap_or_default(),
            std: Estimate::from_option(sample_std(sample), Undefined::ZeroVariance),
            median: median(sample).unwrap_or_default(),
        })
        .collect();

    let k = groups.len();
    let n_total: usize = groups.iter().map(|(_, s)| s.len()).sum();
    let pooled: Vec<f64> = groups.iter().flat_map(|(_, s)| s.iter().copied()).collect();

    let Some(grand_mean) = mean(&pooled) else {
        tracing::warn!("ANOVA: no observations");
        let undefined = Estimate::Undefined(Undefined::NoObservations);
        return Ok(AnovaResult {
            test: TestResult::new(
                TestMethod::OneWayAnova,
                undefined,
                undefined,
                EffectSize::new(EffectMeasure::EtaSquared, undefined),
                "difference between groups",
            ),
            groups: stats,
            n_groups: 0,
            df_between: 0,
            df_within: 0,
        });
    };

    let ss_total = sum_squares(&pooled, grand_mean);
    let ss_between: f64 = stats
        .iter()
        .map(|g| g.n as f64 * (g.mean - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&stats)
        .map(|((_, sample), g)| sum_squares(sample, g.mean))
        .sum();

    let eta_squared = Estimate::ratio(ss_between, ss_total, Undefined::ZeroVariance)
        .map(|eta| eta.clamp(0.0, 1.0));

    let df_between = k.saturating_sub(1);
    let df_within = n_total.saturating_sub(k);

    let (statistic, p_value) = if k < 2 {
        tracing::warn!("ANOVA: fewer than two non-empty groups ({})", k);
        let undefined = Estimate::Undefined(Undefined::SingleGroup);
        (undefined, undefined)
    } else if df_within == 0 {
        let undefined = Estimate::Undefined(Undefined::NoObservations);
        (undefined, undefined)
    } else if ss_within == 0.0 {
        if ss_between > 0.0 {
            (Estimate::Value(f64::INFINITY), Estimate::Value(0.0))
        } else {
            let undefined = Estimate::Undefined(Undefined::ZeroVariance);
            (undefined, undefined)
        }
    } else {
        let f = (ss_between / df_between as f64) / (ss_within / df_within as f64);
        let p = f_survival(f, df_between as f64, df_within as f64)?;
        (Estimate::Value(f), Estimate::Value(p))
    };

    tracing::debug!(
        "ANOVA over {} groups: F={} p={} eta2={}",
        k,
        statistic,
        p_value,
        eta_squared
    );

    Ok(AnovaResult {
        test: TestResult::new(
            TestMethod::OneWayAnova,
            statistic,
            p_value,
            EffectSize::new(EffectMeasure::EtaSquared, eta_squared),
            "difference between groups",
        ),
        groups: stats,
        n_groups: k,
        df_between,
        df_within,
    })
}
