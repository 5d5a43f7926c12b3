//! JSON envelope for every command's result

use serde::Serialize;

/// Versioned wrapper around a serialized result
#[derive(Debug, Serialize)]
pub struct JsonReport<'a, T: Serialize> {
    /// Crate version that produced the report
    pub version: &'static str,
    /// Format name
    pub format: &'static str,
    /// Result kind, e.g. "association"
    pub kind: &'static str,
    pub result: &'a T,
}

impl<'a, T: Serialize> JsonReport<'a, T> {
    pub fn new(kind: &'static str, result: &'a T) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            format: "hotelstat-json-v1",
            kind,
            result,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
