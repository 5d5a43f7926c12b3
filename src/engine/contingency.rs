//! Cross-tabulated counts of two discrete variables

use crate::dataset::Factor;
use crate::error::{Result, StatsError};
use serde::Serialize;

/// Count matrix indexed by the observed levels of two variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Cross-tabulate two factors over the same rows
    ///
    /// Rows missing either value are not counted; levels that end up with no
    /// counts are dropped.
    pub fn from_factors(rows: &Factor, cols: &Factor) -> Self {
        let mut counts = vec![vec![0u64; cols.n_levels()]; rows.n_levels()];
        for (r, c) in rows.codes().iter().zip(cols.codes()) {
            if let (Some(r), Some(c)) = (r, c) {
                counts[*r][*c] += 1;
            }
        }

        Self {
            row_labels: rows.labels().to_vec(),
            col_labels: cols.labels().to_vec(),
            counts,
        }
        .compacted()
    }

    /// Build from explicit counts; all-zero rows and columns are dropped
    pub fn from_counts(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Result<Self> {
        if counts.len() != row_labels.len() || counts.iter().any(|r| r.len() != col_labels.len()) {
            return Err(StatsError::InvalidParameter(format!(
                "contingency counts must be {}x{}",
                row_labels.len(),
                col_labels.len()
            )));
        }
        Ok(Self {
            row_labels,
            col_labels,
            counts,
        }
        .compacted())
    }

    fn compacted(self) -> Self {
        let keep_rows: Vec<usize> = (0..self.counts.len())
            .filter(|&i| self.counts[i].iter().any(|&c| c > 0))
            .collect();
        let keep_cols: Vec<usize> = (0..self.col_labels.len())
            .filter(|&j| self.counts.iter().any(|r| r[j] > 0))
            .collect();

        Self {
            row_labels: keep_rows.iter().map(|&i| self.row_labels[i].clone()).collect(),
            col_labels: keep_cols.iter().map(|&j| self.col_labels[j].clone()).collect(),
            counts: keep_rows
                .iter()
                .map(|&i| keep_cols.iter().map(|&j| self.counts[i][j]).collect())
                .collect(),
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    /// Total number of counted observations
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CategoricalColumn, Column};

    fn factor(labels: Vec<Option<&str>>) -> Factor {
        Factor::from_column(&Column::Categorical(CategoricalColumn::from_labels(labels))).unwrap()
    }

    #[test]
    fn test_cross_tabulation() {
        let deposit = factor(vec![
            Some("No Deposit"),
            Some("Non Refund"),
            Some("No Deposit"),
            Some("Non Refund"),
            Some("No Deposit"),
        ]);
        let canceled = factor(vec![Some("0"), Some("1"), Some("1"), Some("1"), Some("0")]);

        let table = ContingencyTable::from_factors(&deposit, &canceled);
        assert_eq!(table.row_labels, vec!["No Deposit", "Non Refund"]);
        assert_eq!(table.col_labels, vec!["0", "1"]);
        assert_eq!(table.counts, vec![vec![2, 1], vec![0, 2]]);
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn test_missing_rows_skipped_and_empty_levels_dropped() {
        let a = factor(vec![Some("A"), Some("B"), Some("C")]);
        let b = factor(vec![Some("X"), Some("Y"), None]);
        let table = ContingencyTable::from_factors(&a, &b);
        // "C" only co-occurs with a missing value
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.row_labels, vec!["A", "B"]);
    }

    #[test]
    fn test_from_counts_validates_shape() {
        let bad = ContingencyTable::from_counts(
            vec!["A".into(), "B".into()],
            vec!["X".into()],
            vec![vec![1, 2], vec![3, 4]],
        );
        assert!(bad.is_err());
    }
}
