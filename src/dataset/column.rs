//! Typed columns
//!
//! Each column's semantic kind is decided once, when the dataset is built,
//! and carried as an enum variant. Operations dispatch on the variant instead
//! of sniffing values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Declared semantic kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Label drawn from a finite set (hotel, deposit_type, ...)
    Categorical,
    /// 32-bit integer count or flag (is_canceled, adults, ...)
    Integer,
    /// Continuous value (adr, lead_time, ...)
    Float,
    /// Calendar date (reservation_status_date)
    Date,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Categorical => "categorical",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// Dictionary-encoded categorical column
///
/// Levels are kept sorted so every derived table lists categories in the
/// same order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalColumn {
    levels: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl CategoricalColumn {
    /// Encode raw labels; `None` marks a missing cell
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let raw: Vec<Option<String>> = labels
            .into_iter()
            .map(|l| l.map(|s| s.as_ref().to_string()))
            .collect();

        let levels: Vec<String> = raw
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let codes = raw
            .iter()
            .map(|cell| {
                cell.as_ref()
                    .and_then(|label| levels.binary_search(label).ok())
                    .map(|idx| idx as u32)
            })
            .collect();

        Self { levels, codes }
    }

    /// Sorted distinct labels
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Per-row level index
    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }
}

/// A single dataset column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Categorical(CategoricalColumn),
    Integer(Vec<Option<i32>>),
    Float(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDate>>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Categorical(_) => ColumnKind::Categorical,
            Column::Integer(_) => ColumnKind::Integer,
            Column::Float(_) => ColumnKind::Float,
            Column::Date(_) => ColumnKind::Date,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Categorical(c) => c.codes.len(),
            Column::Integer(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the cell at `row` holds no value
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Categorical(c) => c.codes[row].is_none(),
            Column::Integer(v) => v[row].is_none(),
            Column::Float(v) => v[row].is_none(),
            Column::Date(v) => v[row].is_none(),
        }
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    /// Number of distinct non-missing values
    pub fn distinct_count(&self) -> usize {
        match self {
            Column::Categorical(c) => c.codes.iter().flatten().collect::<BTreeSet<_>>().len(),
            Column::Integer(v) => v.iter().flatten().collect::<BTreeSet<_>>().len(),
            Column::Float(v) => v
                .iter()
                .flatten()
                .map(|x| x.to_bits())
                .collect::<BTreeSet<_>>()
                .len(),
            Column::Date(v) => v.iter().flatten().collect::<BTreeSet<_>>().len(),
        }
    }

    /// Numeric view of Integer and Float columns, `None` for other kinds
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Column::Integer(v) => Some(v.iter().map(|x| x.map(f64::from)).collect()),
            Column::Float(v) => Some(v.clone()),
            Column::Categorical(_) | Column::Date(_) => None,
        }
    }
}
