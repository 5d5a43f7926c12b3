//! Analysis configuration
//!
//! A single TOML document describes the dataset schema, which columns play
//! which business role, and the engine's tunables. The hotel-bookings
//! defaults are compiled into the binary.
//!
//! # Example TOML
//!
//! ```toml
//! [schema]
//! delimiter = ","
//!
//! [schema.columns]
//! hotel = "categorical"
//! is_canceled = "integer"
//! adr = "float"
//!
//! [roles]
//! outcome = "is_canceled"
//! price = "adr"
//! segment = "hotel"
//! nights = ["stays_in_weekend_nights", "stays_in_week_nights"]
//!
//! [engine]
//! normality_sample_limit = 5000
//! confidence_level = 0.95
//! ```

use crate::dataset::ColumnKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../hotelstat-default.toml");

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub roles: ColumnRoles,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub importance: ImportanceConfig,
}

/// Declared column kinds for the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Field separator (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Kind assigned to columns missing from `columns`
    #[serde(default = "default_kind")]
    pub default_kind: ColumnKind,

    /// Column name → declared kind
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnKind>,
}

fn default_delimiter() -> char {
    ','
}

fn default_kind() -> ColumnKind {
    ColumnKind::Categorical
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            default_kind: default_kind(),
            columns: BTreeMap::new(),
        }
    }
}

impl SchemaConfig {
    /// Declared kind of a column, falling back to `default_kind`
    pub fn kind_of(&self, column: &str) -> ColumnKind {
        self.columns
            .get(column)
            .copied()
            .unwrap_or(self.default_kind)
    }

    /// Delimiter as the byte the CSV reader expects
    ///
    /// `validate()` guarantees the delimiter is ASCII.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

/// Which columns carry the business quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRoles {
    /// Binary 0/1 cancellation flag
    #[serde(default = "default_outcome")]
    pub outcome: String,

    /// Days between booking and arrival
    #[serde(default = "default_lead_time")]
    pub lead_time: String,

    /// Average daily rate; price metrics are skipped when absent
    #[serde(default = "default_price")]
    pub price: Option<String>,

    /// Segment reported separately in the business snapshot (hotel type)
    #[serde(default = "default_segment")]
    pub segment: String,

    /// Columns summed into nights per booking
    #[serde(default = "default_nights")]
    pub nights: Vec<String>,
}

fn default_outcome() -> String {
    "is_canceled".to_string()
}

fn default_lead_time() -> String {
    "lead_time".to_string()
}

fn default_price() -> Option<String> {
    Some("adr".to_string())
}

fn default_segment() -> String {
    "hotel".to_string()
}

fn default_nights() -> Vec<String> {
    vec![
        "stays_in_weekend_nights".to_string(),
        "stays_in_week_nights".to_string(),
    ]
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            outcome: default_outcome(),
            lead_time: default_lead_time(),
            price: default_price(),
            segment: default_segment(),
            nights: default_nights(),
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Samples at or above this size skip the Shapiro-Wilk check and are
    /// assumed normal
    ///
    /// Default: 5000
    #[serde(default = "default_normality_sample_limit")]
    pub normality_sample_limit: usize,

    /// Confidence level for proportion intervals
    ///
    /// Default: 0.95
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

fn default_normality_sample_limit() -> usize {
    5000
}

fn default_confidence_level() -> f64 {
    0.95
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normality_sample_limit: default_normality_sample_limit(),
            confidence_level: default_confidence_level(),
        }
    }
}

/// Candidate predictors for the importance ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceConfig {
    #[serde(default = "default_outcome")]
    pub target: String,

    #[serde(default)]
    pub features: Vec<String>,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        Self {
            target: default_outcome(),
            features: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Embedded defaults for the hotel booking demand dataset
    pub fn default_hotel_bookings() -> Result<Self> {
        Self::from_toml_str(DEFAULT_TOML).context("Failed to parse embedded hotelstat-default.toml")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.schema.delimiter.is_ascii() {
            return Err(format!(
                "schema.delimiter must be an ASCII character, got '{}'",
                self.schema.delimiter
            ));
        }

        if !(self.engine.confidence_level > 0.0 && self.engine.confidence_level < 1.0) {
            return Err(format!(
                "engine.confidence_level must be in (0, 1), got {}",
                self.engine.confidence_level
            ));
        }

        if self.engine.normality_sample_limit < 3 {
            return Err(format!(
                "engine.normality_sample_limit must be >= 3 for Shapiro-Wilk, got {}",
                self.engine.normality_sample_limit
            ));
        }

        if self.roles.nights.is_empty() {
            return Err("roles.nights must name at least one column".to_string());
        }

        Ok(())
    }
}
