//! Normal-approximation confidence interval for a proportion

use super::hypothesis::standard_normal;
use crate::error::{Result, StatsError};
use serde::Serialize;
use statrs::distribution::ContinuousCDF;

/// Confidence level used when none is configured
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Closed interval within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Wald interval `p ± z * sqrt(p(1-p)/n)`, clipped to [0, 1]
///
/// A zero total yields (0, 0).
///
/// # Example
/// ```
/// use hotelstat::engine::proportion_ci;
///
/// let ci = proportion_ci(50, 100, 0.95).unwrap();
/// assert!((ci.lower - 0.402).abs() < 1e-3);
/// assert!((ci.upper - 0.598).abs() < 1e-3);
/// ```
pub fn proportion_ci(successes: u64, total: u64, confidence: f64) -> Result<ConfidenceInterval> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {}",
            confidence
        )));
    }
    if successes > total {
        return Err(StatsError::InvalidParameter(format!(
            "successes ({}) exceed total ({})",
            successes, total
        )));
    }
    if total == 0 {
        return Ok(ConfidenceInterval {
            lower: 0.0,
            upper: 0.0,
        });
    }

    let n = total as f64;
    let p = successes as f64 / n;
    let z = standard_normal()?.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
    let margin = z * (p * (1.0 - p) / n).sqrt();

    Ok(ConfidenceInterval {
        lower: (p - margin).max(0.0),
        upper: (p + margin).min(1.0),
    })
}
