//! Cancellation metrics by group and the business snapshot

use super::descriptive::mean;
use super::estimate::{Estimate, Undefined};
use super::proportion::{proportion_ci, ConfidenceInterval};
use crate::config::ColumnRoles;
use crate::dataset::{Dataset, Factor};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cancellation counts for one combination of group levels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCancellation {
    /// One label per grouping column
    pub group: Vec<String>,
    pub cancellations: u64,
    pub cancellation_rate: f64,
    pub total: u64,
    pub not_canceled: u64,
    pub confirmation_rate: f64,
    pub ci: ConfidenceInterval,
}

/// Result of [`cancellation_metrics`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationMetrics {
    pub outcome: String,
    pub group_vars: Vec<String>,
    pub confidence: f64,
    /// Sorted by cancellation rate, highest first
    pub rows: Vec<GroupCancellation>,
}

/// Cancellation rate per group with confidence intervals
///
/// Rows missing the outcome or any grouping key are skipped.
pub fn cancellation_metrics(
    ds: &Dataset,
    outcome: &str,
    group_vars: &[&str],
    confidence: f64,
) -> Result<CancellationMetrics> {
    let canceled = ds.binary(outcome, "cancellation metrics")?;
    let factors: Vec<Factor> = group_vars
        .iter()
        .map(|name| ds.factor(name, "cancellation metrics"))
        .collect::<Result<_>>()?;

    // Keyed by level indices so groups come out in level order
    let mut tallies: BTreeMap<Vec<usize>, (u64, u64)> = BTreeMap::new();
    'rows: for (row, flag) in canceled.iter().enumerate() {
        let Some(flag) = flag else { continue };
        let mut key = Vec::with_capacity(factors.len());
        for factor in &factors {
            match factor.codes()[row] {
                Some(code) => key.push(code),
                None => continue 'rows,
            }
        }
        let entry = tallies.entry(key).or_insert((0, 0));
        entry.0 += u64::from(*flag);
        entry.1 += 1;
    }

    let mut rows = tallies
        .into_iter()
        .map(|(key, (cancellations, total))| {
            let cancellation_rate = cancellations as f64 / total as f64;
            Ok(GroupCancellation {
                group: key
                    .iter()
                    .zip(&factors)
                    .map(|(&code, factor)| factor.labels()[code].clone())
                    .collect(),
                cancellations,
                cancellation_rate,
                total,
                not_canceled: total - cancellations,
                confirmation_rate: 1.0 - cancellation_rate,
                ci: proportion_ci(cancellations, total, confidence)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by(|a, b| b.cancellation_rate.total_cmp(&a.cancellation_rate));
    tracing::debug!(
        "Cancellation metrics for {:?}: {} groups",
        group_vars,
        rows.len()
    );

    Ok(CancellationMetrics {
        outcome: outcome.to_string(),
        group_vars: group_vars.iter().map(|s| s.to_string()).collect(),
        confidence,
        rows,
    })
}

/// Cancellation and price figures for one segment (hotel type)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMetrics {
    pub segment: String,
    pub cancellation_rate: Estimate,
    /// `None` when no price column is configured
    pub avg_price: Option<Estimate>,
}

/// Headline business figures for the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessMetrics {
    pub total_bookings: usize,
    pub cancellation_rate: Estimate,
    pub avg_lead_time: Estimate,
    /// Mean price over bookings with a positive price
    pub avg_price: Option<Estimate>,
    pub segments: Vec<SegmentMetrics>,
    /// Price x nights summed over canceled bookings
    pub potential_revenue_loss: Option<f64>,
    pub occupancy_rate: Estimate,
}

impl BusinessMetrics {
    /// Flat `name -> value` view, segment figures keyed by segment label
    pub fn to_map(&self) -> BTreeMap<String, Estimate> {
        let mut map = BTreeMap::new();
        map.insert(
            "total_bookings".to_string(),
            Estimate::Value(self.total_bookings as f64),
        );
        map.insert("cancellation_rate".to_string(), self.cancellation_rate);
        map.insert("avg_lead_time".to_string(), self.avg_lead_time);
        if let Some(avg) = self.avg_price {
            map.insert("avg_adr".to_string(), avg);
        }
        for seg in &self.segments {
            map.insert(
                format!("{}_cancellation_rate", seg.segment),
                seg.cancellation_rate,
            );
            if let Some(avg) = seg.avg_price {
                map.insert(format!("{}_avg_adr", seg.segment), avg);
            }
        }
        if let Some(loss) = self.potential_revenue_loss {
            map.insert("potential_revenue_loss".to_string(), Estimate::Value(loss));
        }
        map.insert("estimated_occupancy_rate".to_string(), self.occupancy_rate);
        map
    }
}

fn rate(flags: impl Iterator<Item = Option<bool>>) -> Estimate {
    let observed: Vec<f64> = flags.flatten().map(|f| f64::from(u8::from(f))).collect();
    Estimate::from_option(mean(&observed), Undefined::NoObservations)
}

fn positive_mean(values: impl Iterator<Item = Option<f64>>) -> Estimate {
    let positive: Vec<f64> = values.flatten().filter(|&v| v > 0.0).collect();
    Estimate::from_option(mean(&positive), Undefined::NoObservations)
}

/// Compute the business snapshot using the configured column roles
pub fn business_metrics(ds: &Dataset, roles: &ColumnRoles) -> Result<BusinessMetrics> {
    let canceled = ds.binary(&roles.outcome, "business metrics")?;
    let lead_time = ds.numeric(&roles.lead_time, "business metrics")?;
    let price = roles
        .price
        .as_deref()
        .map(|name| ds.numeric(name, "business metrics"))
        .transpose()?;
    let segment = ds.factor(&roles.segment, "business metrics")?;

    let mut nights = vec![0.0; ds.n_rows()];
    for column in &roles.nights {
        for (total, value) in nights.iter_mut().zip(ds.numeric(column, "business metrics")?) {
            *total += value.unwrap_or(0.0);
        }
    }

    let lead: Vec<f64> = lead_time.iter().flatten().copied().collect();

    let segments = segment
        .labels()
        .iter()
        .enumerate()
        .map(|(level, label)| {
            let in_segment = |row: &usize| segment.codes()[*row] == Some(level);
            SegmentMetrics {
                segment: label.clone(),
                cancellation_rate: rate((0..ds.n_rows()).filter(in_segment).map(|r| canceled[r])),
                avg_price: price.as_ref().map(|p| {
                    positive_mean((0..ds.n_rows()).filter(in_segment).map(|r| p[r]))
                }),
            }
        })
        .collect();

    let potential_revenue_loss = price.as_ref().map(|p| {
        canceled
            .iter()
            .zip(p)
            .zip(&nights)
            .filter(|((flag, _), _)| **flag == Some(true))
            .filter_map(|((_, price), n)| price.map(|v| v * n))
            .sum::<f64>()
    });

    let total_room_nights: f64 = nights.iter().sum();
    let canceled_room_nights: f64 = canceled
        .iter()
        .zip(&nights)
        .filter(|(flag, _)| **flag == Some(true))
        .map(|(_, n)| n)
        .sum();
    let occupancy_rate = Estimate::ratio(
        total_room_nights - canceled_room_nights,
        total_room_nights,
        Undefined::NoObservations,
    );

    Ok(BusinessMetrics {
        total_bookings: ds.n_rows(),
        cancellation_rate: rate(canceled.iter().copied()),
        avg_lead_time: Estimate::from_option(mean(&lead), Undefined::NoObservations),
        avg_price: price.as_ref().map(|p| positive_mean(p.iter().copied())),
        segments,
        potential_revenue_loss,
        occupancy_rate,
    })
}
