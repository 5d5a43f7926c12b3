// Statistical test engine for hotel-booking analysis
//
// Every operation is a stateless function over a read-only Dataset. Tests
// are selected from the data (normality, equality of variances), effect
// sizes are bucketed through fixed thresholds, and each result carries a
// plain-language interpretation.
//
// Degenerate inputs (empty tables, a single category, zero variance) do not
// raise: they produce Estimate::Undefined with the reason attached. Errors
// are reserved for lookup and usage failures.
//
// Implementation:
// - statrs for chi-square, F and normal distribution functions
// - aprender's ttest_ind for Student's and Welch's t-tests
// - Shapiro-Wilk (Royston), Levene (Brown-Forsythe) and Mann-Whitney U
//   built on top of those distributions

mod anova;
mod association;
mod comparison;
mod contingency;
mod descriptive;
mod effect;
mod estimate;
mod hypothesis;
mod importance;
mod metrics;
mod proportion;
mod result;
mod samples;

pub use anova::{anova, anova_samples, AnovaResult, GroupStats};
pub use association::{association_from_table, association_test, AssociationResult};
pub use comparison::{
    cohens_d, compare_groups, compare_samples, ComparisonResult, GroupSummary, NormalityCheck,
};
pub use contingency::ContingencyTable;
pub use effect::{EffectMeasure, EffectSize, ImportanceLevel, Magnitude};
pub use estimate::{Estimate, Undefined};
pub use hypothesis::{
    chi_square_independence, levene_median, mann_whitney_u, shapiro_wilk, ttest_independent,
    ChiSquare, Levene, MannWhitney, ShapiroWilk, TTest,
};
pub use importance::{feature_importance, FeatureImportance, ImportanceMethod};
pub use metrics::{
    business_metrics, cancellation_metrics, BusinessMetrics, CancellationMetrics,
    GroupCancellation, SegmentMetrics,
};
pub use proportion::{proportion_ci, ConfidenceInterval, DEFAULT_CONFIDENCE};
pub use result::{TestMethod, TestResult, SIGNIFICANCE_LEVEL};
