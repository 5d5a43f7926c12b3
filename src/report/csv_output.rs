//! CSV output for tabular results (spreadsheet analysis and machine parsing)

use crate::engine::Estimate;
use crate::error::{Result, StatsError};

/// Header plus rows, rendered as RFC 4180 CSV
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(header: Vec<&'static str>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render with the `csv` writer, which quotes fields holding the
    /// delimiter, quotes or line breaks
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StatsError::Computation(format!("Failed to flush CSV output: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| StatsError::Computation(format!("CSV output is not UTF-8: {}", e)))
    }
}

/// Defined values as numbers, undefined ones as an empty field
pub fn estimate_field(estimate: &Estimate) -> String {
    estimate.value().map(|v| v.to_string()).unwrap_or_default()
}

pub fn optional_field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Undefined;

    #[test]
    fn test_header_and_rows() {
        let mut table = CsvTable::new(vec!["group", "rate"]);
        table.add_row(vec!["City Hotel".to_string(), "0.41".to_string()]);
        assert_eq!(table.to_csv().unwrap(), "group,rate\nCity Hotel,0.41\n");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_quotes_delimiters_quotes_and_line_breaks() {
        let mut table = CsvTable::new(vec!["group", "note"]);
        table.add_row(vec!["a,b".to_string(), "say \"hi\"".to_string()]);
        table.add_row(vec!["carriage\rreturn".to_string(), "line\nbreak".to_string()]);
        table.add_row(vec!["plain".to_string(), String::new()]);
        assert_eq!(
            table.to_csv().unwrap(),
            "group,note\n\"a,b\",\"say \"\"hi\"\"\"\n\"carriage\rreturn\",\"line\nbreak\"\nplain,\n"
        );
    }

    #[test]
    fn test_row_width_must_match_header() {
        let mut table = CsvTable::new(vec!["group", "rate"]);
        table.add_row(vec!["City Hotel".to_string()]);
        assert!(matches!(table.to_csv(), Err(StatsError::Csv(_))));
    }

    #[test]
    fn test_undefined_estimate_is_empty() {
        assert_eq!(estimate_field(&Estimate::Value(0.5)), "0.5");
        assert_eq!(
            estimate_field(&Estimate::Undefined(Undefined::ZeroVariance)),
            ""
        );
    }
}
