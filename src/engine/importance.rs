//! Ranking of candidate predictors of a binary target

use super::association::association_test;
use super::descriptive::{mean, median};
use super::effect::ImportanceLevel;
use super::estimate::{Estimate, Undefined};
use crate::dataset::{ColumnKind, Dataset};
use crate::error::{Result, StatsError};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// How a feature's score was measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceMethod {
    CramersV,
    PointBiserial,
}

impl fmt::Display for ImportanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportanceMethod::CramersV => f.write_str("Cramér's V"),
            ImportanceMethod::PointBiserial => f.write_str("point-biserial |r|"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// In [0, 1]
    pub score: Estimate,
    pub method: ImportanceMethod,
    /// `None` when the score is undefined
    pub level: Option<ImportanceLevel>,
}

/// Pearson correlation of two equally long samples
fn pearson(x: &[f64], y: &[f64]) -> Estimate {
    let (Some(mx), Some(my)) = (mean(x), mean(y)) else {
        return Estimate::Undefined(Undefined::NoObservations);
    };
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    Estimate::ratio(sxy, (sxx * syy).sqrt(), Undefined::ZeroVariance).map(|r| r.clamp(-1.0, 1.0))
}

/// Absolute point-biserial correlation, missing feature values imputed by
/// the column median
fn point_biserial(ds: &Dataset, target: &[Option<bool>], feature: &str) -> Result<Estimate> {
    let values = ds.numeric(feature, "feature importance")?;
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    let Some(fill) = median(&observed) else {
        return Ok(Estimate::Undefined(Undefined::NoObservations));
    };

    let (x, y): (Vec<f64>, Vec<f64>) = target
        .iter()
        .zip(&values)
        .filter_map(|(t, v)| t.map(|t| (f64::from(u8::from(t)), v.unwrap_or(fill))))
        .unzip();

    Ok(pearson(&x, &y).map(f64::abs))
}

/// Score each feature against `target` and rank them, strongest first
///
/// Categorical features are scored with Cramér's V, numeric ones with the
/// absolute point-biserial correlation. Undefined scores sort last.
pub fn feature_importance(
    ds: &Dataset,
    target: &str,
    features: &[&str],
) -> Result<Vec<FeatureImportance>> {
    let target_values = ds.binary(target, "feature importance")?;

    let mut ranked = features
        .iter()
        .map(|&feature| {
            let column = ds.column(feature)?;
            let (score, method) = match column.kind() {
                ColumnKind::Categorical => (
                    association_test(ds, feature, target)?.cramers_v(),
                    ImportanceMethod::CramersV,
                ),
                ColumnKind::Integer | ColumnKind::Float => (
                    point_biserial(ds, &target_values, feature)?,
                    ImportanceMethod::PointBiserial,
                ),
                kind @ ColumnKind::Date => {
                    return Err(StatsError::UnsupportedColumnKind {
                        column: feature.to_string(),
                        kind,
                        operation: "feature importance",
                    })
                }
            };
            tracing::debug!("Importance of {}: {} ({})", feature, score, method);
            Ok(FeatureImportance {
                feature: feature.to_string(),
                score,
                method,
                level: score.value().map(ImportanceLevel::from_score),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|a, b| match (a.score.value(), b.score.value()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    Ok(ranked)
}
