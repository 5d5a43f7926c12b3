//! Hypothesis-test primitives over plain samples and count tables
//!
//! Distribution tails come from statrs; the two-sample t-tests go through
//! aprender's `ttest_ind`. Everything here works on already-partitioned
//! data; dataset access lives in the operation modules.
//!
//! References:
//! - Royston, P. (1995). Remark AS R94: A remark on algorithm AS 181, the
//!   W-test for normality. Applied Statistics 44(4).
//! - Brown, M. B. & Forsythe, A. B. (1974). Robust tests for the equality of
//!   variances. JASA 69(346).

use super::descriptive::{mean, median, sum_squares};
use crate::error::{Result, StatsError};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt::Display;

fn distribution_error<E: Display>(e: E) -> StatsError {
    StatsError::Computation(format!("invalid distribution parameters: {}", e))
}

pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(distribution_error)
}

/// Upper tail of the F distribution
pub fn f_survival(f: f64, df_between: f64, df_within: f64) -> Result<f64> {
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;
    Ok(dist.sf(f))
}

// ============================================================================
// Chi-square test of independence
// ============================================================================

/// Chi-square test of independence on a contingency table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// Pearson's chi-square over an r x c table of counts
///
/// Yates' continuity correction is applied when the table has exactly one
/// degree of freedom. Returns `None` for tables without at least two rows and
/// two columns with positive totals.
pub fn chi_square_independence(counts: &[Vec<u64>]) -> Result<Option<ChiSquare>> {
    let rows = counts.len();
    let cols = counts.first().map_or(0, Vec::len);
    if rows < 2 || cols < 2 {
        return Ok(None);
    }

    let row_totals: Vec<f64> = counts.iter().map(|r| r.iter().sum::<u64>() as f64).collect();
    let col_totals: Vec<f64> = (0..cols)
        .map(|j| counts.iter().map(|r| r[j]).sum::<u64>() as f64)
        .collect();
    let n: f64 = row_totals.iter().sum();

    if row_totals.iter().chain(col_totals.iter()).any(|&t| t <= 0.0) {
        return Ok(None);
    }

    let degrees_of_freedom = (rows - 1) * (cols - 1);
    let yates = degrees_of_freedom == 1;

    let mut statistic = 0.0;
    for (i, row) in counts.iter().enumerate() {
        for (j, &observed) in row.iter().enumerate() {
            let expected = row_totals[i] * col_totals[j] / n;
            let mut observed = observed as f64;
            if yates {
                let diff = expected - observed;
                observed += diff.abs().min(0.5) * diff.signum();
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    let dist = ChiSquared::new(degrees_of_freedom as f64).map_err(distribution_error)?;
    Ok(Some(ChiSquare {
        statistic,
        p_value: dist.sf(statistic),
        degrees_of_freedom,
    }))
}

// ============================================================================
// Shapiro-Wilk normality test
// ============================================================================

/// Shapiro-Wilk W and its p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapiroWilk {
    pub w: f64,
    pub p_value: f64,
}

const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_GAMMA: [f64; 2] = [-2.273, 0.459];

/// Evaluate c[0] + c[1]x + c[2]x² + ...
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Royston's approximation of the W-test coefficients for the upper half
/// of the order statistics (largest first)
fn shapiro_coefficients(n: usize, normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![FRAC_1_SQRT_2];
    }

    let an25 = n as f64 + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut a = vec![0.0; half];
    a[0] = poly(&SW_C1, rsn) - m[0] / ssumm2;

    let (start, fac) = if n > 5 {
        a[1] = -m[1] / ssumm2 + poly(&SW_C2, rsn);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a[0].powi(2) - 2.0 * a[1].powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a[0].powi(2))).sqrt();
        (1, fac)
    };

    for i in start..half {
        a[i] = -m[i] / fac;
    }
    a
}

fn shapiro_p_value(w: f64, n: usize, normal: &Normal) -> f64 {
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - 0.75f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }
    if w >= 1.0 {
        return 1.0;
    }

    let nf = n as f64;
    let mut y = (1.0 - w).ln();
    let (mu, sigma) = if n <= 11 {
        let gamma = poly(&SW_GAMMA, nf);
        if y >= gamma {
            return 0.0;
        }
        y = -(gamma - y).ln();
        (poly(&SW_C3, nf), poly(&SW_C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
    };

    normal.sf((y - mu) / sigma)
}

/// Shapiro-Wilk test for normality
///
/// Returns `None` below three observations. A sample with zero range is
/// reported as W = 1, p = 1; infinite or NaN observations are rejected.
pub fn shapiro_wilk(sample: &[f64]) -> Result<Option<ShapiroWilk>> {
    let n = sample.len();
    if n < 3 {
        return Ok(None);
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));

    let center = mean(&x).unwrap_or(0.0);
    let ssq = sum_squares(&x, center);
    if !ssq.is_finite() {
        return Err(StatsError::InvalidParameter(
            "Shapiro-Wilk sample contains non-finite values".to_string(),
        ));
    }
    if ssq <= 0.0 || x[n - 1] == x[0] {
        return Ok(Some(ShapiroWilk {
            w: 1.0,
            p_value: 1.0,
        }));
    }

    let normal = standard_normal()?;
    let a = shapiro_coefficients(n, &normal);
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, coef)| coef * (x[n - 1 - i] - x[i]))
        .sum();
    let w = (numerator * numerator / ssq).min(1.0);

    Ok(Some(ShapiroWilk {
        w,
        p_value: shapiro_p_value(w, n, &normal),
    }))
}

// ============================================================================
// Levene's test (Brown-Forsythe, median-centred)
// ============================================================================

/// Levene's W statistic and p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levene {
    pub statistic: f64,
    pub p_value: f64,
}

/// Levene's test for equal variances, centred on group medians
///
/// Returns `None` when fewer than two non-empty groups are given, when there
/// are no residual degrees of freedom, or when every absolute deviation equals
/// its group mean (the statistic is 0/0).
pub fn levene_median(groups: &[&[f64]]) -> Result<Option<Levene>> {
    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 || n_total <= k || groups.iter().any(|g| g.is_empty()) {
        return Ok(None);
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let med = median(g).unwrap_or(0.0);
            g.iter().map(|x| (x - med).abs()).collect()
        })
        .collect();

    let group_means: Vec<f64> = deviations.iter().map(|z| mean(z).unwrap_or(0.0)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n_total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, &zm)| sum_squares(z, zm))
        .sum();

    if within <= 0.0 {
        return Ok(None);
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let statistic = (df_within * between) / (df_between * within);

    Ok(Some(Levene {
        statistic,
        p_value: f_survival(statistic, df_between, df_within)?,
    }))
}

// ============================================================================
// Mann-Whitney U
// ============================================================================

/// Mann-Whitney U for the first sample and its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    pub u: f64,
    /// `None` when every observation is tied (zero variance of U)
    pub p_value: Option<f64>,
    /// Whether the p-value comes from the exact null distribution
    pub exact: bool,
}

/// Tie-free comparisons whose smaller sample has at most this many
/// observations use the exact distribution
const EXACT_MANN_WHITNEY_LIMIT: usize = 8;

/// Average ranks of the pooled sample plus the sizes of tied runs
fn pooled_ranks(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut pooled: Vec<(f64, usize)> = x
        .iter()
        .chain(y.iter())
        .copied()
        .enumerate()
        .map(|(idx, v)| (v, idx))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks = vec![0.0; pooled.len()];
    let mut ties = Vec::new();
    let mut start = 0;
    while start < pooled.len() {
        let mut end = start + 1;
        while end < pooled.len() && pooled[end].0 == pooled[start].0 {
            end += 1;
        }
        // Ranks are 1-based: positions start..end share the mean rank
        let rank = (start + end + 1) as f64 / 2.0;
        for &(_, idx) in &pooled[start..end] {
            ranks[idx] = rank;
        }
        if end - start > 1 {
            ties.push(end - start);
        }
        start = end;
    }
    (ranks, ties)
}

/// Frequencies of U under the null for sample sizes `m` and `n`
///
/// Coefficients of the Gaussian binomial `[m + n choose m]`, built one
/// factor `(1 - q^(n+k)) / (1 - q^k)` at a time over a single buffer of
/// `m * n + 1` counts, with `m` the smaller size.
fn u_null_distribution(m: usize, n: usize) -> Vec<f64> {
    let (m, n) = (m.min(n), m.max(n));
    let mut dist = vec![0.0; m * n + 1];
    dist[0] = 1.0;
    for k in 1..=m {
        let degree = k * n;
        // Divide by (1 - q^k), truncated at the new degree
        for u in k..=degree {
            dist[u] += dist[u - k];
        }
        // Multiply by (1 - q^(n+k)); descending so lower terms are unmodified
        for u in (n + k..=degree).rev() {
            dist[u] -= dist[u - n - k];
        }
    }
    dist
}

/// Two-sided Mann-Whitney U test
///
/// Exact p-values when the smaller sample has at most 8 observations and
/// there are no ties; otherwise the normal approximation with tie and continuity
/// correction. Returns `None` if either sample is empty.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<Option<MannWhitney>> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Ok(None);
    }

    let (ranks, ties) = pooled_ranks(x, y);
    let rank_sum_x: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum_x - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let big = u1.max(u2);

    if n1.min(n2) <= EXACT_MANN_WHITNEY_LIMIT && ties.is_empty() {
        let dist = u_null_distribution(n1, n2);
        let total: f64 = dist.iter().sum();
        let threshold = big.round() as usize;
        let tail: f64 = dist.iter().skip(threshold).sum();
        return Ok(Some(MannWhitney {
            u: u1,
            p_value: Some((2.0 * tail / total).min(1.0)),
            exact: true,
        }));
    }

    let n = (n1 + n2) as f64;
    let mu = (n1 * n2) as f64 / 2.0;
    let tie_term: f64 = ties.iter().map(|&t| (t.pow(3) - t) as f64).sum();
    let variance = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    let p_value = if variance > 0.0 {
        let z = (big - mu - 0.5) / variance.sqrt();
        Some((2.0 * standard_normal()?.sf(z)).min(1.0))
    } else {
        None
    };

    Ok(Some(MannWhitney {
        u: u1,
        p_value,
        exact: false,
    }))
}

// ============================================================================
// Two-sample t-tests
// ============================================================================

/// Two-sample t statistic, p-value and degrees of freedom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Independent two-sample t-test (Student when `equal_var`, Welch otherwise)
///
/// Uses aprender's `ttest_ind`, which works in single precision.
pub fn ttest_independent(x: &[f64], y: &[f64], equal_var: bool) -> Result<TTest> {
    let a: Vec<f32> = x.iter().map(|&v| v as f32).collect();
    let b: Vec<f32> = y.iter().map(|&v| v as f32).collect();

    let result = aprender::stats::hypothesis::ttest_ind(&a, &b, equal_var)
        .map_err(|e| StatsError::Computation(format!("Failed to compute t-test: {}", e)))?;

    Ok(TTest {
        statistic: f64::from(result.statistic),
        p_value: f64::from(result.pvalue),
        degrees_of_freedom: f64::from(result.df),
    })
}
