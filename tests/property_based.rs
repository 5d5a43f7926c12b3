//! Property-based tests for the statistical engine
//!
//! Properties covered:
//! 1. Significance flag is exactly p < 0.05
//! 2. Cramér's V stays in [0, 1]
//! 3. Cohen's d sign follows the mean difference, bucket follows |d|
//! 4. Proportion intervals stay in [0, 1] and contain the estimate
//! 5. Eta-squared stays in [0, 1]
//! 6. Occupancy stays in [0, 1]
//! 7. Grouped metrics are sorted by rate

use hotelstat::config::{ColumnRoles, EngineConfig};
use hotelstat::dataset::DatasetBuilder;
use hotelstat::engine::{
    anova_samples, association_from_table, business_metrics, cancellation_metrics, cohens_d,
    compare_samples, proportion_ci, shapiro_wilk, ContingencyTable, EffectMeasure,
    SIGNIFICANCE_LEVEL,
};
use proptest::prelude::*;

fn table_strategy() -> impl Strategy<Value = Vec<Vec<u64>>> {
    (2usize..5, 2usize..5).prop_flat_map(|(r, c)| {
        prop::collection::vec(prop::collection::vec(0u64..60, c), r)
    })
}

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_association_bounds_and_significance(counts in table_strategy()) {
        let rows = labels("r", counts.len());
        let cols = labels("c", counts[0].len());
        let table = ContingencyTable::from_counts(rows, cols, counts).unwrap();
        let result = association_from_table("a", "b", table).unwrap();

        let v = result.cramers_v().value_or_zero();
        prop_assert!((0.0..=1.0).contains(&v));

        match result.test.p_value.value() {
            Some(p) => {
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert_eq!(result.test.significant, p < SIGNIFICANCE_LEVEL);
            }
            None => prop_assert!(!result.test.significant),
        }
    }

    #[test]
    fn prop_cohens_d_sign_and_bucket(
        a in prop::collection::vec(-100.0f64..100.0, 2..30),
        b in prop::collection::vec(-100.0f64..100.0, 2..30),
    ) {
        if let Some(d) = cohens_d(&a, &b).value() {
            let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
            let diff = mean(&a) - mean(&b);
            if diff.abs() > 1e-9 {
                prop_assert_eq!(d > 0.0, diff > 0.0);
            }
            let bucket = EffectMeasure::CohensD.classify(d);
            prop_assert_eq!(bucket, EffectMeasure::CohensD.classify(d.abs()));
        }
    }

    #[test]
    fn prop_comparison_significance_invariant(
        a in prop::collection::vec(0.0f64..500.0, 1..25),
        b in prop::collection::vec(0.0f64..500.0, 1..25),
    ) {
        let result = compare_samples("a", &a, "b", &b, &EngineConfig::default()).unwrap();
        match result.test.p_value.value() {
            Some(p) => {
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert_eq!(result.test.significant, p < SIGNIFICANCE_LEVEL);
            }
            None => prop_assert!(!result.test.significant),
        }
    }

    #[test]
    fn prop_proportion_ci_bounds(total in 0u64..10_000, frac in 0.0f64..=1.0, confidence in 0.5f64..0.999) {
        let successes = (total as f64 * frac).floor() as u64;
        let ci = proportion_ci(successes, total, confidence).unwrap();
        prop_assert!(0.0 <= ci.lower && ci.lower <= ci.upper && ci.upper <= 1.0);
        if total > 0 {
            prop_assert!(ci.contains(successes as f64 / total as f64));
        } else {
            prop_assert_eq!((ci.lower, ci.upper), (0.0, 0.0));
        }
    }

    #[test]
    fn prop_eta_squared_bounds(
        groups in prop::collection::vec(prop::collection::vec(0.0f64..1000.0, 0..15), 1..6)
    ) {
        let samples: Vec<(String, Vec<f64>)> = groups
            .into_iter()
            .enumerate()
            .map(|(i, g)| (format!("g{}", i), g))
            .collect();
        let result = anova_samples(&samples).unwrap();
        if let Some(eta) = result.eta_squared().value() {
            prop_assert!((0.0..=1.0).contains(&eta));
        }
        if result.n_groups < 2 {
            prop_assert!(!result.test.significant);
        }
    }

    #[test]
    fn prop_shapiro_wilk_ranges(sample in prop::collection::vec(-1e3f64..1e3, 3..200)) {
        if let Some(sw) = shapiro_wilk(&sample).unwrap() {
            prop_assert!(sw.w > 0.0 && sw.w <= 1.0 + 1e-12);
            prop_assert!((0.0..=1.0).contains(&sw.p_value));
        }
    }

    #[test]
    fn prop_occupancy_and_metric_order(
        rows in prop::collection::vec((0usize..3, 0i32..2, 0i32..5, 0i32..10, 0.0f64..300.0), 1..60)
    ) {
        let hotels = ["City Hotel", "Resort Hotel", "Airport Hotel"];
        let ds = DatasetBuilder::new()
            .categorical("hotel", rows.iter().map(|r| Some(hotels[r.0])).collect())
            .integer("is_canceled", rows.iter().map(|r| Some(r.1)).collect())
            .float("lead_time", rows.iter().map(|r| Some(r.4)).collect())
            .float("adr", rows.iter().map(|r| Some(r.4)).collect())
            .integer("stays_in_weekend_nights", rows.iter().map(|r| Some(r.2)).collect())
            .integer("stays_in_week_nights", rows.iter().map(|r| Some(r.3)).collect())
            .build()
            .unwrap();

        let snapshot = business_metrics(&ds, &ColumnRoles::default()).unwrap();
        let total_nights: i32 = rows.iter().map(|r| r.2 + r.3).sum();
        match snapshot.occupancy_rate.value() {
            Some(rate) => prop_assert!((0.0..=1.0).contains(&rate)),
            None => prop_assert_eq!(total_nights, 0),
        }

        let metrics = cancellation_metrics(&ds, "is_canceled", &["hotel"], 0.95).unwrap();
        for pair in metrics.rows.windows(2) {
            prop_assert!(pair[0].cancellation_rate >= pair[1].cancellation_rate);
        }
        for row in &metrics.rows {
            prop_assert!(row.ci.contains(row.cancellation_rate));
        }
    }
}
