//! Forecast entry points over count series.
//!
//! Two explicit variants, selected by the caller rather than detected at
//! runtime: [`forecast_arima`] with a caller-supplied or auto-selected
//! order, and [`forecast_sarima`] with a fixed (1,1,1)x(1,1,0) structure at
//! period 12 — monthly-cadence annual seasonality, deliberately not
//! auto-tuned to stay robust on short histories.
//!
//! Both clamp forecast values to be non-negative (counts cannot be
//! negative) and generate a contiguous date run starting one cadence unit
//! after the last observed date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithms::arima::{
    difference, integrate, seasonal_difference, ArimaModel, ArimaOrder,
};
use crate::algorithms::order_search::search_arima_order;
use crate::core::domain::CountSeries;
use crate::core::error::{AnalysisError, AnalysisResult};
use crate::time::calendar::future_dates;

/// Seasonal period of the SARIMA variant, in cadence units.
pub const SEASONAL_PERIOD: usize = 12;

/// Normal quantile for the 95% confidence band.
const Z_95: f64 = 1.96;

/// A projected run of future counts.
///
/// `values`, `dates`, and (when present) the interval bounds all have
/// exactly the requested horizon length. Intervals are only produced by
/// the non-seasonal path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub values: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    /// Lower 95% confidence bound, clamped at zero.
    pub lower: Option<Vec<f64>>,
    /// Upper 95% confidence bound.
    pub upper: Option<Vec<f64>>,
}

/// Forecasts `periods` steps ahead with an ARIMA model.
///
/// When `order` is `None` the order is auto-selected by
/// [`search_arima_order`]. The 95% confidence band comes from the fitted
/// model's forecast-error variances.
///
/// # Errors
///
/// Propagates [`AnalysisError::InsufficientData`] and
/// [`AnalysisError::ModelFit`] from the underlying fit; callers must check
/// before using the forecast.
pub fn forecast_arima(
    series: &CountSeries,
    periods: usize,
    order: Option<ArimaOrder>,
) -> AnalysisResult<ForecastResult> {
    let last_date = series.last_date().ok_or_else(|| {
        AnalysisError::InsufficientData("cannot forecast an empty series".to_string())
    })?;

    let order = order.unwrap_or_else(|| search_arima_order(series));
    let model = ArimaModel::fit(&series.values(), order)?;

    let raw = model.forecast(periods);
    let variances = model.forecast_variance(periods);

    let lower: Vec<f64> = raw
        .iter()
        .zip(&variances)
        .map(|(v, var)| (v - Z_95 * var.sqrt()).max(0.0))
        .collect();
    let upper: Vec<f64> = raw
        .iter()
        .zip(&variances)
        .map(|(v, var)| v + Z_95 * var.sqrt())
        .collect();

    Ok(ForecastResult {
        values: raw.into_iter().map(|v| v.max(0.0)).collect(),
        dates: future_dates(last_date, series.cadence, periods),
        lower: Some(lower),
        upper: Some(upper),
    })
}

/// Forecasts `periods` steps ahead with the fixed seasonal model.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when the series is too short for
/// seasonal differencing at period 12, [`AnalysisError::ModelFit`] when
/// the seasonal solve is singular or non-stationary.
pub fn forecast_sarima(series: &CountSeries, periods: usize) -> AnalysisResult<ForecastResult> {
    let last_date = series.last_date().ok_or_else(|| {
        AnalysisError::InsufficientData("cannot forecast an empty series".to_string())
    })?;

    let model = SarimaModel::fit(&series.values())?;

    Ok(ForecastResult {
        values: model.forecast(periods).into_iter().map(|v| v.max(0.0)).collect(),
        dates: future_dates(last_date, series.cadence, periods),
        lower: None,
        upper: None,
    })
}

/// Seasonal ARIMA (1,1,1)x(1,1,0) at period 12.
///
/// The series is seasonally differenced once and regularly differenced
/// once; the AR polynomial (1 - phi B)(1 - PHI B^12) expands to lags
/// {1, 12, 13}, with an MA(1) term estimated from the residuals.
#[derive(Debug, Clone)]
struct SarimaModel {
    phi: f64,
    seasonal_phi: f64,
    theta: f64,
    mean: f64,
    /// Centered doubly-differenced tail, most recent last.
    diff_tail: Vec<f64>,
    last_residual: f64,
    /// Last value of the seasonally differenced series.
    seasonal_level: f64,
    /// Last SEASONAL_PERIOD values of the original series.
    original_tail: Vec<f64>,
}

impl SarimaModel {
    fn fit(values: &[f64]) -> AnalysisResult<Self> {
        let min_len = 2 * SEASONAL_PERIOD + 4;
        if values.len() < min_len {
            return Err(AnalysisError::InsufficientData(format!(
                "seasonal model needs at least {} observations, have {}",
                min_len,
                values.len()
            )));
        }

        let seasonal = seasonal_difference(values, SEASONAL_PERIOD);
        let w = difference(&seasonal);
        if w.len() < SEASONAL_PERIOD + 3 {
            return Err(AnalysisError::InsufficientData(
                "series vanished under seasonal differencing".to_string(),
            ));
        }

        let n = w.len();
        let mean = w.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = w.iter().map(|x| x - mean).collect();
        let gamma0 = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;
        if gamma0 < 1e-10 {
            return Err(AnalysisError::ModelFit(
                "doubly differenced series is constant".to_string(),
            ));
        }

        let gamma = |lag: usize| -> f64 {
            (0..n - lag).map(|i| centered[i] * centered[i + lag]).sum::<f64>() / n as f64
        };

        // Normal equations for the lag-1 and lag-12 regressors.
        let g1 = gamma(1);
        let gs = gamma(SEASONAL_PERIOD);
        let g_cross = gamma(SEASONAL_PERIOD - 1);
        let det = gamma0 * gamma0 - g_cross * g_cross;
        if det.abs() < 1e-12 {
            return Err(AnalysisError::ModelFit(
                "singular seasonal autocovariance system".to_string(),
            ));
        }
        let phi = (g1 * gamma0 - gs * g_cross) / det;
        let seasonal_phi = (gs * gamma0 - g1 * g_cross) / det;
        if phi.abs() >= 1.0 || seasonal_phi.abs() >= 1.0 {
            return Err(AnalysisError::ModelFit(
                "non-stationary seasonal fit".to_string(),
            ));
        }

        // Innovations under the expanded AR polynomial, then MA(1) from
        // their lag-1 autocorrelation.
        let ar_lags = Self::ar_lags(phi, seasonal_phi);
        let residuals = Self::innovations(&centered, &ar_lags, 0.0);
        let start = SEASONAL_PERIOD + 1;
        let theta = Self::lag1_autocorrelation(&residuals[start..]);
        let residuals = Self::innovations(&centered, &ar_lags, theta);

        let tail_len = SEASONAL_PERIOD + 1;
        Ok(Self {
            phi,
            seasonal_phi,
            theta,
            mean,
            diff_tail: centered[centered.len() - tail_len..].to_vec(),
            last_residual: *residuals.last().expect("non-empty residuals"),
            seasonal_level: *seasonal.last().expect("non-empty seasonal series"),
            original_tail: values[values.len() - SEASONAL_PERIOD..].to_vec(),
        })
    }

    fn ar_lags(phi: f64, seasonal_phi: f64) -> [(usize, f64); 3] {
        [
            (1, phi),
            (SEASONAL_PERIOD, seasonal_phi),
            (SEASONAL_PERIOD + 1, -phi * seasonal_phi),
        ]
    }

    fn innovations(centered: &[f64], ar_lags: &[(usize, f64)], theta: f64) -> Vec<f64> {
        let n = centered.len();
        let start = SEASONAL_PERIOD + 1;
        let mut errors = vec![0.0; n];
        for t in start..n {
            let mut pred = 0.0;
            for &(lag, coef) in ar_lags {
                pred += coef * centered[t - lag];
            }
            pred += theta * errors[t - 1];
            errors[t] = centered[t] - pred;
        }
        errors
    }

    fn lag1_autocorrelation(residuals: &[f64]) -> f64 {
        let n = residuals.len();
        if n < 2 {
            return 0.0;
        }
        let mean = residuals.iter().sum::<f64>() / n as f64;
        let var: f64 = residuals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        if var < 1e-10 {
            return 0.0;
        }
        let cov: f64 = (0..n - 1)
            .map(|i| (residuals[i] - mean) * (residuals[i + 1] - mean))
            .sum::<f64>()
            / n as f64;
        cov / var
    }

    fn forecast(&self, horizon: usize) -> Vec<f64> {
        let ar_lags = Self::ar_lags(self.phi, self.seasonal_phi);
        let mut centered = self.diff_tail.clone();
        let mut diffs = Vec::with_capacity(horizon);

        for h in 0..horizon {
            let mut z = 0.0;
            for &(lag, coef) in &ar_lags {
                if let Some(&value) = centered.get(centered.len().wrapping_sub(lag)) {
                    z += coef * value;
                }
            }
            if h == 0 {
                z += self.theta * self.last_residual;
            }
            centered.push(z);
            diffs.push(self.mean + z);
        }

        // Undo the regular difference, then the seasonal one.
        let seasonal_forecast = integrate(diffs, &[self.seasonal_level]);
        let mut levels = self.original_tail.clone();
        let mut forecasts = Vec::with_capacity(horizon);
        for &w in &seasonal_forecast {
            let value = levels[levels.len() - SEASONAL_PERIOD] + w;
            levels.push(value);
            forecasts.push(value);
        }
        forecasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Cadence, CountPoint};
    use chrono::NaiveDate;

    fn series(cadence: Cadence, values: Vec<f64>) -> CountSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut date = start;
        let points = values
            .into_iter()
            .map(|count| {
                let point = CountPoint { date, count };
                date = crate::time::calendar::advance(date, cadence);
                point
            })
            .collect();
        CountSeries::new(cadence, points)
    }

    fn noisy(t: usize) -> f64 {
        ((t as f64 * 12.9898).sin() * 43758.5453).fract()
    }

    #[test]
    fn test_arima_horizon_exactness() {
        let values: Vec<f64> = (0..60).map(|t| 5.0 + noisy(t).abs() * 4.0).collect();
        let input = series(Cadence::Daily, values);
        let result = forecast_arima(&input, 14, Some(ArimaOrder::new(1, 0, 0))).unwrap();

        assert_eq!(result.values.len(), 14);
        assert_eq!(result.dates.len(), 14);
        let expected_start = input.last_date().unwrap().succ_opt().unwrap();
        assert_eq!(result.dates[0], expected_start);
        for pair in result.dates.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_arima_values_clamped_non_negative() {
        // Steadily falling counts; the raw projection goes below zero.
        let values: Vec<f64> = (0..40)
            .map(|t| (30.0 - 0.8 * t as f64 + noisy(t)).max(0.0))
            .collect();
        let result =
            forecast_arima(&series(Cadence::Daily, values), 30, Some(ArimaOrder::new(0, 1, 0)))
                .unwrap();

        assert!(result.values.iter().all(|v| *v >= 0.0));
        // The clamp had to engage somewhere on a falling series.
        assert!(result.values.iter().any(|v| *v == 0.0));
    }

    #[test]
    fn test_arima_confidence_band_brackets_forecast() {
        let values: Vec<f64> = (0..80).map(|t| 6.0 + noisy(t) * 2.0).collect();
        let result =
            forecast_arima(&series(Cadence::Daily, values), 10, Some(ArimaOrder::new(1, 0, 1)))
                .unwrap();

        let lower = result.lower.unwrap();
        let upper = result.upper.unwrap();
        assert_eq!(lower.len(), 10);
        assert_eq!(upper.len(), 10);
        for i in 0..10 {
            assert!(lower[i] <= result.values[i] + 1e-9);
            assert!(result.values[i] <= upper[i] + 1e-9);
            assert!(lower[i] >= 0.0);
        }
    }

    #[test]
    fn test_arima_empty_series_is_error() {
        let err = forecast_arima(&series(Cadence::Daily, Vec::new()), 5, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn test_sarima_monthly_horizon_and_dates() {
        let values: Vec<f64> = (0..60)
            .map(|t| {
                20.0 + 0.2 * t as f64
                    + 6.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin()
                    + noisy(t)
            })
            .collect();
        let input = series(Cadence::Monthly, values);
        let result = forecast_sarima(&input, 12).unwrap();

        assert_eq!(result.values.len(), 12);
        assert_eq!(result.dates.len(), 12);
        assert!(result.lower.is_none());
        assert!(result.upper.is_none());
        assert!(result.values.iter().all(|v| v.is_finite() && *v >= 0.0));

        let first = result.dates[0];
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_sarima_short_series_is_error() {
        let values: Vec<f64> = (0..6).map(|t| t as f64).collect();
        let err = forecast_sarima(&series(Cadence::Monthly, values), 6).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }
}
