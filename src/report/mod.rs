//! Rendering of engine results as text, JSON or CSV

mod csv_output;
mod json_output;
mod results;

pub use csv_output::{estimate_field, optional_field, CsvTable};
pub use json_output::JsonReport;
pub use results::{CiReport, ImportanceReport, ProfileReport};

use crate::cli::OutputFormat;
use serde::Serialize;

/// A result that can be printed in every output format
pub trait Report: Serialize {
    /// Result kind recorded in the JSON envelope
    const KIND: &'static str;

    /// Human-readable report
    fn to_report_string(&self) -> String;

    /// Tabular form for CSV output
    fn csv_table(&self) -> CsvTable;
}

/// Render `report` in the requested format
pub fn render<R: Report>(report: &R, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_report_string()),
        OutputFormat::Json => JsonReport::new(R::KIND, report).to_json(),
        OutputFormat::Csv => Ok(report.csv_table().to_csv()?),
    }
}
