//! Computed-or-undefined scalar values

use serde::Serialize;
use std::fmt;

/// Why a quantity could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Undefined {
    /// The sample or table is empty
    NoObservations,
    /// A denominator built from a variance or standard deviation is zero
    ZeroVariance,
    /// A categorical variable shows a single observed value
    SingleCategory,
    /// Fewer than two groups are available for comparison
    SingleGroup,
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Undefined::NoObservations => "no observations",
            Undefined::ZeroVariance => "zero variance",
            Undefined::SingleCategory => "single category",
            Undefined::SingleGroup => "single group",
        };
        f.write_str(reason)
    }
}

/// A statistic that is either computed or explicitly undefined
///
/// Serializes as a bare number, or as the snake_case reason string when
/// undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Estimate {
    Value(f64),
    Undefined(Undefined),
}

impl Estimate {
    /// `numerator / denominator`, undefined when the denominator is not positive
    pub fn ratio(numerator: f64, denominator: f64, reason: Undefined) -> Self {
        if denominator > 0.0 {
            Estimate::Value(numerator / denominator)
        } else {
            Estimate::Undefined(reason)
        }
    }

    /// Wrap an optional value, using `reason` for `None`
    pub fn from_option(value: Option<f64>, reason: Undefined) -> Self {
        value.map_or(Estimate::Undefined(reason), Estimate::Value)
    }

    /// Apply `f` to a computed value; undefined passes through unchanged
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Estimate::Value(v) => Estimate::Value(f(v)),
            undefined => undefined,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            Estimate::Value(v) => Some(v),
            Estimate::Undefined(_) => None,
        }
    }

    /// Computed value, or 0.0 when undefined
    pub fn value_or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn undefined_reason(&self) -> Option<Undefined> {
        match *self {
            Estimate::Value(_) => None,
            Estimate::Undefined(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Estimate {
    /// Precision applies to defined values; width, fill and alignment to
    /// both forms (left-aligned by default, never truncated)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Estimate::Value(v) => match f.precision() {
                Some(p) => format!("{:.*}", p, v),
                None => v.to_string(),
            },
            Estimate::Undefined(reason) => format!("undefined ({})", reason),
        };

        let len = text.chars().count();
        let padding = f.width().map_or(0, |w| w.saturating_sub(len));
        let (before, after) = match f.align() {
            Some(fmt::Alignment::Right) => (padding, 0),
            Some(fmt::Alignment::Center) => (padding / 2, padding - padding / 2),
            Some(fmt::Alignment::Left) | None => (0, padding),
        };
        let fill = f.fill();
        for _ in 0..before {
            write!(f, "{}", fill)?;
        }
        f.write_str(&text)?;
        for _ in 0..after {
            write!(f, "{}", fill)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(
            Estimate::ratio(3.0, 4.0, Undefined::NoObservations),
            Estimate::Value(0.75)
        );
        let guarded = Estimate::ratio(3.0, 0.0, Undefined::NoObservations);
        assert_eq!(guarded, Estimate::Undefined(Undefined::NoObservations));
        assert_eq!(guarded.value_or_zero(), 0.0);
        assert_eq!(guarded.value(), None);
    }

    #[test]
    fn test_display_precision() {
        assert_eq!(format!("{:.3}", Estimate::Value(0.12345)), "0.123");
        assert_eq!(
            Estimate::Undefined(Undefined::ZeroVariance).to_string(),
            "undefined (zero variance)"
        );
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&Estimate::Value(0.5)).unwrap();
        assert_eq!(json, "0.5");
        let json = serde_json::to_string(&Estimate::Undefined(Undefined::SingleCategory)).unwrap();
        assert_eq!(json, "\"single_category\"");
    }

    #[test]
    fn test_display_honors_width_and_alignment() {
        assert_eq!(format!("{:<12.4}|", Estimate::Value(0.5)), "0.5000      |");
        assert_eq!(format!("{:>10.2}", Estimate::Value(1.0)), "      1.00");
        assert_eq!(format!("{:*^7.1}", Estimate::Value(2.0)), "**2.0**");
        assert_eq!(
            format!("{:<12.4}|", Estimate::Undefined(Undefined::NoObservations)),
            "undefined (no observations)|"
        );
        assert_eq!(
            format!("{:>20}", Estimate::Undefined(Undefined::SingleGroup)),
            "undefined (single group)"
        );
    }
}
