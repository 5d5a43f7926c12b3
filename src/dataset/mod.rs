//! Read-only, column-oriented booking dataset
//!
//! Columns are typed once when the dataset is built (either in memory through
//! [`DatasetBuilder`] or from a delimited file through the loader). The
//! engine only ever borrows a `Dataset`.

mod column;
mod factor;
mod loader;

pub use column::{CategoricalColumn, Column, ColumnKind};
pub use factor::Factor;
pub use loader::MISSING_MARKERS;

use crate::error::{Result, StatsError};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Typed tabular dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Iterate `(name, column)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| StatsError::ColumnNotFound(name.to_string()))
    }

    /// Numeric view of an Integer or Float column
    pub fn numeric(&self, name: &str, operation: &'static str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        column
            .numeric_values()
            .ok_or_else(|| StatsError::UnsupportedColumnKind {
                column: name.to_string(),
                kind: column.kind(),
                operation,
            })
    }

    /// Discrete view of a Categorical, Integer or Date column
    pub fn factor(&self, name: &str, operation: &'static str) -> Result<Factor> {
        let column = self.column(name)?;
        Factor::from_column(column).ok_or_else(|| StatsError::UnsupportedColumnKind {
            column: name.to_string(),
            kind: column.kind(),
            operation,
        })
    }

    /// 0/1 outcome column as booleans; any other value is rejected
    pub fn binary(&self, name: &str, operation: &'static str) -> Result<Vec<Option<bool>>> {
        self.numeric(name, operation)?
            .into_iter()
            .map(|cell| match cell {
                None => Ok(None),
                Some(v) if v == 0.0 => Ok(Some(false)),
                Some(v) if v == 1.0 => Ok(Some(true)),
                Some(v) => Err(StatsError::NotBinary {
                    column: name.to_string(),
                    value: v,
                }),
            })
            .collect()
    }
}

/// Incremental in-memory construction of a [`Dataset`]
///
/// # Example
/// ```
/// use hotelstat::dataset::DatasetBuilder;
///
/// let ds = DatasetBuilder::new()
///     .categorical("hotel", vec![Some("City Hotel"), Some("Resort Hotel")])
///     .integer("is_canceled", vec![Some(1), Some(0)])
///     .build()
///     .unwrap();
/// assert_eq!(ds.n_rows(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<(String, Column)>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: &str, column: Column) -> Self {
        self.columns.push((name.to_string(), column));
        self
    }

    pub fn categorical<S: AsRef<str>>(self, name: &str, labels: Vec<Option<S>>) -> Self {
        self.column(
            name,
            Column::Categorical(CategoricalColumn::from_labels(labels)),
        )
    }

    pub fn integer(self, name: &str, values: Vec<Option<i32>>) -> Self {
        self.column(name, Column::Integer(values))
    }

    pub fn float(self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.column(name, Column::Float(values))
    }

    pub fn date(self, name: &str, values: Vec<Option<NaiveDate>>) -> Self {
        self.column(name, Column::Date(values))
    }

    /// Validate lengths and names, then freeze the dataset
    pub fn build(self) -> Result<Dataset> {
        let n_rows = self.columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut dataset = Dataset {
            n_rows,
            ..Dataset::default()
        };

        for (name, column) in self.columns {
            if column.len() != n_rows {
                return Err(StatsError::LengthMismatch {
                    column: name,
                    expected: n_rows,
                    actual: column.len(),
                });
            }
            if dataset.index.contains_key(&name) {
                return Err(StatsError::DuplicateColumn(name));
            }
            dataset.index.insert(name.clone(), dataset.columns.len());
            dataset.names.push(name);
            dataset.columns.push(column);
        }

        Ok(dataset)
    }
}
