//! Association between two categorical variables (chi-square + Cramér's V)

use super::contingency::ContingencyTable;
use super::effect::{EffectMeasure, EffectSize};
use super::estimate::{Estimate, Undefined};
use super::hypothesis::chi_square_independence;
use super::result::{TestMethod, TestResult};
use crate::dataset::Dataset;
use crate::error::Result;
use serde::Serialize;

/// Chi-square association test between two variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationResult {
    pub var1: String,
    pub var2: String,
    pub test: TestResult,
    pub degrees_of_freedom: usize,
    /// Observations counted in the table
    pub n: u64,
    pub table: ContingencyTable,
}

impl AssociationResult {
    /// Cramér's V
    pub fn cramers_v(&self) -> Estimate {
        self.test.effect.estimate
    }
}

/// Test whether two discrete columns are associated
///
/// # Example
/// ```
/// use hotelstat::dataset::DatasetBuilder;
/// use hotelstat::engine::association_test;
///
/// let ds = DatasetBuilder::new()
///     .categorical("deposit_type", vec![Some("No Deposit"), Some("Non Refund"), Some("No Deposit")])
///     .integer("is_canceled", vec![Some(0), Some(1), Some(0)])
///     .build()
///     .unwrap();
///
/// let result = association_test(&ds, "deposit_type", "is_canceled").unwrap();
/// assert_eq!(result.n, 3);
/// ```
pub fn association_test(ds: &Dataset, var1: &str, var2: &str) -> Result<AssociationResult> {
    let rows = ds.factor(var1, "association test")?;
    let cols = ds.factor(var2, "association test")?;
    let table = ContingencyTable::from_factors(&rows, &cols);
    association_from_table(var1, var2, table)
}

/// Chi-square association test over an already built table
pub fn association_from_table(
    var1: &str,
    var2: &str,
    table: ContingencyTable,
) -> Result<AssociationResult> {
    let subject = format!("association between {} and {}", var1, var2);
    let n = table.total();
    let (rows, cols) = table.shape();

    if n == 0 {
        tracing::warn!("Association {} x {}: no complete observations", var1, var2);
        let undefined = Estimate::Undefined(Undefined::NoObservations);
        return Ok(AssociationResult {
            var1: var1.to_string(),
            var2: var2.to_string(),
            test: TestResult::new(
                TestMethod::ChiSquare,
                undefined,
                undefined,
                EffectSize::new(EffectMeasure::CramersV, undefined),
                &subject,
            ),
            degrees_of_freedom: 0,
            n,
            table,
        });
    }

    let min_dim = rows.min(cols) - 1;
    let (statistic, p_value, cramers_v, degrees_of_freedom) = match chi_square_independence(
        &table.counts,
    )? {
        Some(chi2) if min_dim > 0 => {
            let v = (chi2.statistic / (n as f64 * min_dim as f64)).sqrt().min(1.0);
            (
                Estimate::Value(chi2.statistic),
                Estimate::Value(chi2.p_value),
                Estimate::Value(v),
                chi2.degrees_of_freedom,
            )
        }
        _ => {
            tracing::warn!(
                "Association {} x {}: single observed category ({}x{} table)",
                var1,
                var2,
                rows,
                cols
            );
            let undefined = Estimate::Undefined(Undefined::SingleCategory);
            (Estimate::Value(0.0), undefined, undefined, 0)
        }
    };

    tracing::debug!(
        "Chi-square {} x {}: chi2={} p={} V={} dof={}",
        var1,
        var2,
        statistic,
        p_value,
        cramers_v,
        degrees_of_freedom
    );

    Ok(AssociationResult {
        var1: var1.to_string(),
        var2: var2.to_string(),
        test: TestResult::new(
            TestMethod::ChiSquare,
            statistic,
            p_value,
            EffectSize::new(EffectMeasure::CramersV, cramers_v),
            &subject,
        ),
        degrees_of_freedom,
        n,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;
    use crate::engine::effect::Magnitude;

    #[test]
    fn test_single_category_is_undefined_not_error() {
        let ds = DatasetBuilder::new()
            .categorical("hotel", vec![Some("City Hotel"); 4])
            .integer("is_canceled", vec![Some(0), Some(1), Some(1), Some(0)])
            .build()
            .unwrap();

        let result = association_test(&ds, "hotel", "is_canceled").unwrap();
        assert_eq!(
            result.cramers_v(),
            Estimate::Undefined(Undefined::SingleCategory)
        );
        assert_eq!(result.cramers_v().value_or_zero(), 0.0);
        assert_eq!(result.test.statistic, Estimate::Value(0.0));
        assert!(!result.test.significant);
        assert!(result.test.effect.magnitude.is_none());
    }

    #[test]
    fn test_all_missing_is_no_observations() {
        let ds = DatasetBuilder::new()
            .categorical::<&str>("a", vec![None, None])
            .categorical("b", vec![Some("X"), Some("Y")])
            .build()
            .unwrap();
        let result = association_test(&ds, "a", "b").unwrap();
        assert_eq!(result.n, 0);
        assert_eq!(
            result.test.p_value,
            Estimate::Undefined(Undefined::NoObservations)
        );
    }

    #[test]
    fn test_float_column_rejected() {
        let ds = DatasetBuilder::new()
            .float("adr", vec![Some(1.0)])
            .categorical("hotel", vec![Some("City Hotel")])
            .build()
            .unwrap();
        assert!(association_test(&ds, "adr", "hotel").is_err());
    }

    #[test]
    fn test_strong_association_from_table() {
        let table = ContingencyTable::from_counts(
            vec!["A".into(), "B".into()],
            vec!["X".into(), "Y".into()],
            vec![vec![40, 10], vec![10, 40]],
        )
        .unwrap();
        let result = association_from_table("var1", "var2", table).unwrap();
        let v = result.cramers_v().value().unwrap();
        assert!((v - 0.58).abs() < 1e-9);
        assert_eq!(result.test.effect.magnitude, Some(Magnitude::Large));
        assert!(result.test.significant);
    }
}
