//! hotelstat - statistical test engine for hotel booking analysis
//!
//! This library loads a typed bookings dataset, selects and runs hypothesis
//! tests (chi-square, t-tests, Mann-Whitney U, one-way ANOVA), computes
//! effect sizes with plain-language interpretations, and summarizes
//! cancellation and business metrics.
//!
//! # Example
//! ```
//! use hotelstat::dataset::DatasetBuilder;
//! use hotelstat::engine::{proportion_ci, cancellation_metrics};
//!
//! let ds = DatasetBuilder::new()
//!     .categorical("hotel", vec![Some("City Hotel"), Some("City Hotel"), Some("Resort Hotel")])
//!     .integer("is_canceled", vec![Some(1), Some(0), Some(0)])
//!     .build()
//!     .unwrap();
//!
//! let metrics = cancellation_metrics(&ds, "is_canceled", &["hotel"], 0.95).unwrap();
//! assert_eq!(metrics.rows[0].group, vec!["City Hotel"]);
//!
//! let ci = proportion_ci(0, 0, 0.95).unwrap();
//! assert_eq!((ci.lower, ci.upper), (0.0, 0.0));
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod profile;
pub mod report;

pub use error::{Result, StatsError};
