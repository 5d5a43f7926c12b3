//! Schema-driven reader for delimited booking files
//!
//! No cleaning happens here: cells that cannot be parsed as the declared
//! kind become missing, everything else is kept as-is.

use super::column::{CategoricalColumn, Column, ColumnKind};
use super::{Dataset, DatasetBuilder};
use crate::config::SchemaConfig;
use crate::error::Result;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell contents treated as missing, whatever the column kind
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan"];

const DATE_FORMAT: &str = "%Y-%m-%d";

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

fn parse_integer(cell: &str) -> Option<i32> {
    if let Ok(v) = cell.parse::<i32>() {
        return Some(v);
    }
    // "2.0" style integers written by spreadsheet exports
    let v = cell.parse::<f64>().ok()?;
    if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v as i32)
    } else {
        None
    }
}

fn parse_float(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, DATE_FORMAT).ok()
}

/// Convert raw cells into a typed column, returning it with the count of
/// non-missing cells that failed to parse
fn build_column(kind: ColumnKind, cells: &[Option<String>]) -> (Column, usize) {
    fn typed<T>(cells: &[Option<String>], parse: fn(&str) -> Option<T>) -> (Vec<Option<T>>, usize) {
        let mut rejected = 0;
        let values = cells
            .iter()
            .map(|cell| {
                let cell = cell.as_deref()?;
                let parsed = parse(cell);
                if parsed.is_none() {
                    rejected += 1;
                }
                parsed
            })
            .collect();
        (values, rejected)
    }

    match kind {
        ColumnKind::Categorical => (
            Column::Categorical(CategoricalColumn::from_labels(cells.iter().map(|c| c.as_deref()))),
            0,
        ),
        ColumnKind::Integer => {
            let (values, rejected) = typed(cells, parse_integer);
            (Column::Integer(values), rejected)
        }
        ColumnKind::Float => {
            let (values, rejected) = typed(cells, parse_float);
            (Column::Float(values), rejected)
        }
        ColumnKind::Date => {
            let (values, rejected) = typed(cells, parse_date);
            (Column::Date(values), rejected)
        }
    }
}

impl Dataset {
    /// Load a delimited file with a header row
    ///
    /// # Example
    /// ```no_run
    /// use hotelstat::config::AnalysisConfig;
    /// use hotelstat::dataset::Dataset;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::default_hotel_bookings()?;
    /// let ds = Dataset::from_csv_path("data/hotel_bookings.csv", &config.schema)?;
    /// println!("{} bookings", ds.n_rows());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_csv_path<P: AsRef<Path>>(path: P, schema: &SchemaConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        tracing::debug!("Loading dataset from {}", path.as_ref().display());
        Self::from_csv_reader(file, schema)
    }

    /// Load delimited data from any reader
    pub fn from_csv_reader<R: Read>(reader: R, schema: &SchemaConfig) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(schema.delimiter_byte())
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for record in csv_reader.records() {
            let record = record?;
            for (i, field) in record.iter().enumerate() {
                let cell = (!is_missing(field)).then(|| field.to_string());
                cells[i].push(cell);
            }
        }

        let mut builder = DatasetBuilder::new();
        for (name, raw) in headers.iter().zip(cells.iter()) {
            let kind = schema.kind_of(name);
            let (column, rejected) = build_column(kind, raw);
            if rejected > 0 {
                tracing::warn!(
                    "Column '{}': {} cells could not be read as {} and are treated as missing",
                    name,
                    rejected,
                    kind
                );
            }
            builder = builder.column(name, column);
        }

        let dataset = builder.build()?;
        tracing::debug!(
            "Loaded {} rows x {} columns",
            dataset.n_rows(),
            dataset.n_columns()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn schema() -> SchemaConfig {
        let mut columns = BTreeMap::new();
        columns.insert("is_canceled".to_string(), ColumnKind::Integer);
        columns.insert("adr".to_string(), ColumnKind::Float);
        columns.insert("reservation_status_date".to_string(), ColumnKind::Date);
        SchemaConfig {
            delimiter: ',',
            default_kind: ColumnKind::Categorical,
            columns,
        }
    }

    const CSV: &str = "\
hotel,is_canceled,adr,country,reservation_status_date
Resort Hotel,0,75.5,PRT,2015-07-01
City Hotel,1,NA,NULL,2015-07-02
City Hotel,2.0,abc,GBR,not-a-date
";

    #[test]
    fn test_loads_declared_kinds() {
        let ds = Dataset::from_csv_reader(CSV.as_bytes(), &schema()).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column("hotel").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(ds.column("is_canceled").unwrap().kind(), ColumnKind::Integer);
        assert_eq!(ds.column("adr").unwrap().kind(), ColumnKind::Float);
        assert_eq!(
            ds.column("reservation_status_date").unwrap().kind(),
            ColumnKind::Date
        );
    }

    #[test]
    fn test_missing_markers_and_parse_failures() {
        let ds = Dataset::from_csv_reader(CSV.as_bytes(), &schema()).unwrap();
        assert_eq!(
            ds.numeric("adr", "test").unwrap(),
            vec![Some(75.5), None, None]
        );
        assert_eq!(
            ds.numeric("is_canceled", "test").unwrap(),
            vec![Some(0.0), Some(1.0), Some(2.0)]
        );
        assert_eq!(ds.column("country").unwrap().missing_count(), 1);
        assert_eq!(
            ds.column("reservation_status_date").unwrap().missing_count(),
            1
        );
    }

    #[test]
    fn test_semicolon_delimiter() {
        let mut schema = schema();
        schema.delimiter = ';';
        let ds = Dataset::from_csv_reader("hotel;adr\nCity Hotel;10\n".as_bytes(), &schema).unwrap();
        assert_eq!(ds.numeric("adr", "test").unwrap(), vec![Some(10.0)]);
    }

    #[test]
    fn test_non_finite_floats_are_missing() {
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("-Infinity"), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("1e3"), Some(1000.0));

        let csv = "hotel,adr\nCity Hotel,inf\nCity Hotel,infinity\nResort Hotel,80\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes(), &schema()).unwrap();
        assert_eq!(
            ds.numeric("adr", "test").unwrap(),
            vec![None, None, Some(80.0)]
        );
    }

    #[test]
    fn test_parse_integer_variants() {
        assert_eq!(parse_integer("7"), Some(7));
        assert_eq!(parse_integer("7.0"), Some(7));
        assert_eq!(parse_integer("7.5"), None);
        assert_eq!(parse_integer("x"), None);
    }
}
