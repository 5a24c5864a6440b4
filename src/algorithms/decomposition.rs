//! Additive seasonal decomposition of count series.
//!
//! Splits a regularly spaced series into trend, seasonal, and residual
//! components: `observed = trend + seasonal + resid`. The model is additive
//! because counts can be zero, which leaves multiplicative ratios
//! undefined. Trend comes from a centered moving average (the two-sided
//! filter with half weights at the ends for even periods), the seasonal
//! component from recentred per-position means of the detrended series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::domain::CountSeries;
use crate::core::error::{AnalysisError, AnalysisResult};

/// Four aligned component series sharing the input index.
///
/// `trend` and `resid` are undefined for half a period window at each edge
/// of the series; that is a property of the moving-average construction,
/// not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub dates: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<Option<f64>>,
}

/// Decomposes a count series at the given periodicity.
///
/// Non-finite observations are filled by linear interpolation first, since
/// the moving-average filter needs a complete series.
///
/// # Errors
///
/// [`AnalysisError::MalformedInput`] for `period < 2`;
/// [`AnalysisError::InsufficientData`] when the series holds fewer than
/// `2 * period` observations.
pub fn decompose(series: &CountSeries, period: usize) -> AnalysisResult<DecompositionResult> {
    if period < 2 {
        return Err(AnalysisError::MalformedInput(format!(
            "decomposition period must be at least 2, got {}",
            period
        )));
    }
    if series.len() < 2 * period {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least {} observations for period {}, have {}",
            2 * period,
            period,
            series.len()
        )));
    }

    let observed = interpolate_missing(&series.values())?;
    let n = observed.len();

    let trend = centered_trend(&observed, period);

    // Per-position means of the detrended series, recentred to sum to zero
    // over one period.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, t) in trend.iter().enumerate() {
        if let Some(trend_value) = t {
            sums[i % period] += observed[i] - trend_value;
            counts[i % period] += 1;
        }
    }
    let mut cycle: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let cycle_mean = cycle.iter().sum::<f64>() / period as f64;
    for value in cycle.iter_mut() {
        *value -= cycle_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| cycle[i % period]).collect();
    let resid: Vec<Option<f64>> = (0..n)
        .map(|i| trend[i].map(|t| observed[i] - t - seasonal[i]))
        .collect();

    Ok(DecompositionResult {
        dates: series.dates(),
        observed,
        trend,
        seasonal,
        resid,
    })
}

/// Centered moving-average trend; `None` at the half-window edges.
fn centered_trend(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut trend = vec![None; n];

    if period % 2 == 0 {
        // 2 x period filter: half weight at both window ends.
        let half = period / 2;
        for i in half..n.saturating_sub(half) {
            let mut sum = 0.5 * values[i - half] + 0.5 * values[i + half];
            for j in (i - half + 1)..(i + half) {
                sum += values[j];
            }
            trend[i] = Some(sum / period as f64);
        }
    } else {
        let half = (period - 1) / 2;
        for i in half..n.saturating_sub(half) {
            let sum: f64 = values[i - half..=i + half].iter().sum();
            trend[i] = Some(sum / period as f64);
        }
    }

    trend
}

/// Linear interpolation of non-finite entries; leading and trailing gaps
/// take the nearest finite value.
fn interpolate_missing(values: &[f64]) -> AnalysisResult<Vec<f64>> {
    if values.iter().all(|v| !v.is_finite()) {
        return Err(AnalysisError::MalformedInput(
            "series has no finite observations".to_string(),
        ));
    }
    if values.iter().all(|v| v.is_finite()) {
        return Ok(values.to_vec());
    }

    let n = values.len();
    let mut filled = values.to_vec();
    let finite: Vec<usize> = (0..n).filter(|&i| values[i].is_finite()).collect();

    for i in 0..n {
        if filled[i].is_finite() {
            continue;
        }
        let next = finite.iter().find(|&&j| j > i);
        let prev = finite.iter().rev().find(|&&j| j < i);
        filled[i] = match (prev, next) {
            (Some(&a), Some(&b)) => {
                let fraction = (i - a) as f64 / (b - a) as f64;
                values[a] + fraction * (values[b] - values[a])
            }
            (Some(&a), None) => values[a],
            (None, Some(&b)) => values[b],
            (None, None) => unreachable!("at least one finite value exists"),
        };
    }

    Ok(filled)
}
