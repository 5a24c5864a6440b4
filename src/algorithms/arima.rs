//! ARIMA model fitting and projection.
//!
//! Implements ARIMA(p,d,q) over a count series: d-fold differencing, AR
//! coefficients from the Yule-Walker equations solved with Levinson-Durbin,
//! MA coefficients estimated from the autocorrelation of the AR residuals,
//! and AIC for order selection. Degenerate configurations (constant series,
//! singular autocorrelation, explosive reflection coefficients) surface as
//! [`AnalysisError::ModelFit`] so order search can skip them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{AnalysisError, AnalysisResult};

/// Non-seasonal ARIMA order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive lags.
    pub p: usize,
    /// Differencing passes.
    pub d: usize,
    /// Moving-average lags.
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// A fitted ARIMA model.
///
/// Holds the estimated coefficients plus the series tail state needed to
/// project future values and forecast variances.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    pub order: ArimaOrder,
    /// AR coefficients; index `i` applies to lag `i + 1`.
    pub ar: Vec<f64>,
    /// MA coefficients; index `j` applies to lag `j + 1`.
    pub ma: Vec<f64>,
    /// Mean of the differenced series.
    pub intercept: f64,
    /// Innovation variance of the differenced series.
    pub sigma2: f64,
    /// Akaike Information Criterion of the fit.
    pub aic: f64,
    /// Centered tail of the differenced series, most recent last.
    diff_tail: Vec<f64>,
    /// Most recent residuals, most recent last.
    residual_tail: Vec<f64>,
    /// Last value of each differencing level 0..d of the original series.
    level_tails: Vec<f64>,
}

impl ArimaModel {
    /// Fits an ARIMA model to the given values.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InsufficientData`] when the differenced series is
    /// shorter than the model needs; [`AnalysisError::ModelFit`] when the
    /// solver hits a singular or degenerate configuration.
    pub fn fit(values: &[f64], order: ArimaOrder) -> AnalysisResult<Self> {
        let mut level_tails = Vec::with_capacity(order.d);
        let mut diff = values.to_vec();
        for _ in 0..order.d {
            match diff.last() {
                Some(&last) => level_tails.push(last),
                None => {
                    return Err(AnalysisError::InsufficientData(
                        "series vanished while differencing".to_string(),
                    ))
                }
            }
            diff = difference(&diff);
        }

        let min_len = order.p.max(order.q) + 2;
        if diff.len() < min_len {
            return Err(AnalysisError::InsufficientData(format!(
                "need at least {} observations after differencing, have {}",
                min_len,
                diff.len()
            )));
        }

        let n = diff.len();
        let mean = diff.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = diff.iter().map(|x| x - mean).collect();
        let variance = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;
        if variance < 1e-10 {
            return Err(AnalysisError::ModelFit(
                "differenced series is constant".to_string(),
            ));
        }

        let ar = if order.p > 0 {
            let acf = autocorrelations(&centered, order.p)?;
            levinson_durbin(&acf, order.p)?
        } else {
            Vec::new()
        };

        // One pass over the centered series computing fitted values and
        // innovations; MA coefficients come from the innovation ACF of the
        // pure-AR pass, then the pass is repeated with both terms.
        let ar_residuals = innovations(&centered, &ar, &[]);
        let ma = if order.q > 0 {
            fit_ma(&ar_residuals[order.p..], order.q)
        } else {
            Vec::new()
        };
        let residuals = innovations(&centered, &ar, &ma);

        let start = order.p.max(order.q);
        let effective = (n - start).max(1);
        let rss: f64 = residuals[start..].iter().map(|e| e * e).sum();
        if rss <= 0.0 {
            return Err(AnalysisError::ModelFit(
                "degenerate fit with zero residual variance".to_string(),
            ));
        }
        let sigma2 = rss / effective as f64;
        let k = (order.p + order.q + 1) as f64;
        let aic = effective as f64 * sigma2.ln() + 2.0 * k;
        if !aic.is_finite() {
            return Err(AnalysisError::ModelFit(
                "information criterion is not finite".to_string(),
            ));
        }

        let tail_len = order.p.max(1);
        let diff_tail = centered[centered.len().saturating_sub(tail_len)..].to_vec();
        let residual_tail = residuals[residuals.len().saturating_sub(order.q.max(1))..].to_vec();

        Ok(Self {
            order,
            ar,
            ma,
            intercept: mean,
            sigma2,
            aic,
            diff_tail,
            residual_tail,
            level_tails,
        })
    }

    /// Projects `horizon` steps ahead on the original (integrated) scale.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut centered = self.diff_tail.clone();
        let mut residuals = self.residual_tail.clone();
        let mut diffs = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let mut z = 0.0;
            for (i, &phi) in self.ar.iter().enumerate() {
                if let Some(&value) = centered.get(centered.len().wrapping_sub(i + 1)) {
                    z += phi * value;
                }
            }
            for (j, &theta) in self.ma.iter().enumerate() {
                if let Some(&e) = residuals.get(residuals.len().wrapping_sub(j + 1)) {
                    z += theta * e;
                }
            }
            centered.push(z);
            // Future innovations are zero in expectation.
            residuals.push(0.0);
            diffs.push(self.intercept + z);
        }

        integrate(diffs, &self.level_tails)
    }

    /// Forecast-error variances for each step, on the original scale.
    ///
    /// Uses the psi-weight expansion of the ARMA polynomial; for d > 0 the
    /// weights are cumulatively summed once per differencing pass.
    pub fn forecast_variance(&self, horizon: usize) -> Vec<f64> {
        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return Vec::new();
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut value = if j <= self.ma.len() { self.ma[j - 1] } else { 0.0 };
            for (i, &phi) in self.ar.iter().enumerate() {
                if j > i {
                    value += phi * psi[j - i - 1];
                }
            }
            psi[j] = value;
        }

        for _ in 0..self.order.d {
            for j in 1..horizon {
                psi[j] += psi[j - 1];
            }
        }

        let mut cumulative = 0.0;
        psi.iter()
            .map(|w| {
                cumulative += w * w;
                self.sigma2 * cumulative
            })
            .collect()
    }
}

/// First difference of a series.
pub(crate) fn difference(series: &[f64]) -> Vec<f64> {
    if series.len() < 2 {
        return Vec::new();
    }
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Seasonal difference of a series at the given lag.
pub(crate) fn seasonal_difference(series: &[f64], lag: usize) -> Vec<f64> {
    if series.len() <= lag {
        return Vec::new();
    }
    (lag..series.len()).map(|i| series[i] - series[i - lag]).collect()
}

/// Undo differencing: each tail is the last value at that level, outermost
/// level first.
pub(crate) fn integrate(mut forecasts: Vec<f64>, level_tails: &[f64]) -> Vec<f64> {
    for &last in level_tails.iter().rev() {
        let mut acc = last;
        for value in forecasts.iter_mut() {
            acc += *value;
            *value = acc;
        }
    }
    forecasts
}

/// Autocorrelations of a centered series up to `max_lag`.
pub(crate) fn autocorrelations(centered: &[f64], max_lag: usize) -> AnalysisResult<Vec<f64>> {
    let n = centered.len();
    let variance = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;
    if variance < 1e-10 {
        return Err(AnalysisError::ModelFit(
            "zero variance in autocorrelation".to_string(),
        ));
    }

    let mut acf = vec![1.0; max_lag + 1];
    for k in 1..=max_lag {
        let cov: f64 = (0..n - k).map(|i| centered[i] * centered[i + k]).sum::<f64>() / n as f64;
        acf[k] = cov / variance;
    }
    Ok(acf)
}

/// Solves the Yule-Walker equations with the Levinson-Durbin recursion.
pub(crate) fn levinson_durbin(acf: &[f64], p: usize) -> AnalysisResult<Vec<f64>> {
    let mut phi = vec![vec![0.0; p + 1]; p + 1];
    let mut sigma = vec![0.0; p + 1];

    sigma[0] = acf[0];

    for k in 1..=p {
        if sigma[k - 1].abs() < 1e-12 {
            return Err(AnalysisError::ModelFit(
                "singular autocorrelation matrix".to_string(),
            ));
        }
        let mut num = acf[k];
        for j in 1..k {
            num -= phi[k - 1][j] * acf[k - j];
        }
        let reflection = num / sigma[k - 1];
        if reflection.abs() >= 1.0 {
            return Err(AnalysisError::ModelFit(format!(
                "non-stationary reflection coefficient at lag {}",
                k
            )));
        }
        phi[k][k] = reflection;

        for j in 1..k {
            phi[k][j] = phi[k - 1][j] - reflection * phi[k - 1][k - j];
        }

        sigma[k] = sigma[k - 1] * (1.0 - reflection * reflection);
    }

    Ok((1..=p).map(|j| phi[p][j]).collect())
}

/// MA coefficients from the autocorrelation of AR residuals.
fn fit_ma(residuals: &[f64], q: usize) -> Vec<f64> {
    let n = residuals.len();
    if n <= q {
        return vec![0.0; q];
    }

    let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
    let var: f64 = residuals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    if var < 1e-10 {
        return vec![0.0; q];
    }

    (1..=q)
        .map(|k| {
            let cov: f64 = (0..n - k)
                .map(|i| (residuals[i] - mean) * (residuals[i + k] - mean))
                .sum::<f64>()
                / n as f64;
            cov / var
        })
        .collect()
}

/// One-step innovations of a centered series under the given ARMA terms.
fn innovations(centered: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = centered.len();
    let start = ar.len().max(ma.len());
    let mut errors = vec![0.0; n];

    for t in start..n {
        let mut pred = 0.0;
        for (i, &phi) in ar.iter().enumerate() {
            pred += phi * centered[t - i - 1];
        }
        for (j, &theta) in ma.iter().enumerate() {
            pred += theta * errors[t - j - 1];
        }
        errors[t] = centered[t] - pred;
    }

    errors
}
