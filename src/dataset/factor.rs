//! Discrete view of a column, used for grouping and cross-tabulation

use super::column::Column;
use std::collections::BTreeSet;

/// Ordered level labels plus the level index of every row
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    labels: Vec<String>,
    codes: Vec<Option<usize>>,
}

impl Factor {
    /// Build a factor from a column. Float columns have no discrete levels.
    pub fn from_column(column: &Column) -> Option<Self> {
        match column {
            Column::Categorical(c) => Some(Self {
                labels: c.levels().to_vec(),
                codes: c.codes().iter().map(|c| c.map(|x| x as usize)).collect(),
            }),
            Column::Integer(values) => Some(Self::from_ordered(values, |v| v.to_string())),
            Column::Date(values) => {
                Some(Self::from_ordered(values, |d| d.format("%Y-%m-%d").to_string()))
            }
            Column::Float(_) => None,
        }
    }

    fn from_ordered<T, F>(values: &[Option<T>], render: F) -> Self
    where
        T: Ord + Copy,
        F: Fn(&T) -> String,
    {
        let distinct: Vec<T> = values
            .iter()
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let codes = values
            .iter()
            .map(|v| v.and_then(|v| distinct.binary_search(&v).ok()))
            .collect();

        Self {
            labels: distinct.iter().map(render).collect(),
            codes,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn codes(&self) -> &[Option<usize>] {
        &self.codes
    }

    pub fn n_levels(&self) -> usize {
        self.labels.len()
    }

    /// Index of a level by its label
    pub fn level_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::column::CategoricalColumn;
    use chrono::NaiveDate;

    #[test]
    fn test_integer_factor_orders_numerically() {
        let col = Column::Integer(vec![Some(10), Some(2), None, Some(10)]);
        let factor = Factor::from_column(&col).unwrap();
        assert_eq!(factor.labels(), &["2", "10"]);
        assert_eq!(factor.codes(), &[Some(1), Some(0), None, Some(1)]);
    }

    #[test]
    fn test_date_factor_labels() {
        let d = NaiveDate::from_ymd_opt(2017, 7, 1).unwrap();
        let col = Column::Date(vec![Some(d), None]);
        let factor = Factor::from_column(&col).unwrap();
        assert_eq!(factor.labels(), &["2017-07-01"]);
    }

    #[test]
    fn test_categorical_factor_lookup() {
        let col = Column::Categorical(CategoricalColumn::from_labels(vec![
            Some("No Deposit"),
            Some("Non Refund"),
        ]));
        let factor = Factor::from_column(&col).unwrap();
        assert_eq!(factor.n_levels(), 2);
        assert_eq!(factor.level_index("Non Refund"), Some(1));
        assert_eq!(factor.level_index("Refundable"), None);
    }

    #[test]
    fn test_float_has_no_factor() {
        let col = Column::Float(vec![Some(1.5)]);
        assert!(Factor::from_column(&col).is_none());
    }
}
