// Data quality profile: one row per column
//
// Missing and unique counts for every column, plus location and spread for
// numeric columns. Numeric summaries use trueno::Vector for mean, variance
// and range, and aprender's DescriptiveStats for the median.

use crate::dataset::{Column, ColumnKind, Dataset};
use crate::error::{Result, StatsError};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

/// Quality summary of a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub kind: ColumnKind,
    pub n_missing: usize,
    /// Percent of rows, 0-100
    pub pct_missing: f64,
    pub n_unique: usize,
    pub pct_unique: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    /// Sample standard deviation (n - 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Default)]
struct NumericSummary {
    mean: Option<f64>,
    median: Option<f64>,
    std: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

fn computation(what: &str, e: impl std::fmt::Display) -> StatsError {
    StatsError::Computation(format!("Failed to compute {}: {}", what, e))
}

fn summarize(values: &[f32]) -> Result<NumericSummary> {
    if values.is_empty() {
        return Ok(NumericSummary::default());
    }

    let vector = Vector::from_slice(values);
    let n = values.len() as f64;

    // trueno's variance divides by n
    let population_variance = f64::from(vector.variance().map_err(|e| computation("variance", e))?);
    let std = (values.len() > 1).then(|| (population_variance * n / (n - 1.0)).sqrt());

    let median = DescriptiveStats::new(&vector)
        .quantile(0.5)
        .map_err(|e| computation("median", e))?;

    Ok(NumericSummary {
        mean: Some(f64::from(vector.mean().map_err(|e| computation("mean", e))?)),
        median: Some(f64::from(median)),
        std,
        min: Some(f64::from(vector.min().map_err(|e| computation("min", e))?)),
        max: Some(f64::from(vector.max().map_err(|e| computation("max", e))?)),
    })
}

fn profile_column(name: &str, column: &Column, n_rows: usize) -> Result<ColumnProfile> {
    let pct = |count: usize| {
        if n_rows == 0 {
            0.0
        } else {
            count as f64 / n_rows as f64 * 100.0
        }
    };

    let summary = match column.numeric_values() {
        Some(values) => {
            let observed: Vec<f32> = values.iter().flatten().map(|&v| v as f32).collect();
            summarize(&observed)?
        }
        None => NumericSummary::default(),
    };

    let n_missing = column.missing_count();
    let n_unique = column.distinct_count();
    Ok(ColumnProfile {
        column: name.to_string(),
        kind: column.kind(),
        n_missing,
        pct_missing: pct(n_missing),
        n_unique,
        pct_unique: pct(n_unique),
        mean: summary.mean,
        median: summary.median,
        std: summary.std,
        min: summary.min,
        max: summary.max,
    })
}

/// Profile every column, most incomplete first
pub fn profile(ds: &Dataset) -> Result<Vec<ColumnProfile>> {
    let mut profiles = ds
        .iter()
        .map(|(name, column)| profile_column(name, column, ds.n_rows()))
        .collect::<Result<Vec<_>>>()?;

    profiles.sort_by(|a, b| b.pct_missing.total_cmp(&a.pct_missing));
    tracing::debug!("Profiled {} columns", profiles.len());
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;

    #[test]
    fn test_numeric_summary() {
        let s = summarize(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(s.mean, Some(5.0));
        assert_eq!(s.median, Some(5.0));
        assert_eq!(s.min, Some(2.0));
        assert_eq!(s.max, Some(8.0));
        let std = s.std.unwrap();
        assert!((std - (20.0f64 / 3.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let s = summarize(&[7.0]).unwrap();
        assert_eq!(s.mean, Some(7.0));
        assert!(s.std.is_none());
    }

    #[test]
    fn test_profile_sorted_by_missing() {
        let ds = DatasetBuilder::new()
            .categorical("hotel", vec![Some("City Hotel"), Some("Resort Hotel"), Some("City Hotel"), Some("City Hotel")])
            .float("children", vec![Some(0.0), None, Some(2.0), Some(0.0)])
            .categorical("company", vec![None, None, None, Some("40")])
            .build()
            .unwrap();

        let profiles = profile(&ds).unwrap();
        let order: Vec<&str> = profiles.iter().map(|p| p.column.as_str()).collect();
        assert_eq!(order, vec!["company", "children", "hotel"]);

        assert_eq!(profiles[0].n_missing, 3);
        assert_eq!(profiles[0].pct_missing, 75.0);
        assert!(profiles[0].mean.is_none());

        let children = &profiles[1];
        assert_eq!(children.n_unique, 2);
        assert_eq!(children.pct_unique, 50.0);
        assert_eq!(children.median, Some(0.0));
        assert_eq!(children.max, Some(2.0));

        assert_eq!(profiles[2].n_unique, 2);
        assert_eq!(profiles[2].kind, ColumnKind::Categorical);
    }
}
