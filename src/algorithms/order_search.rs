//! ARIMA order selection by information-criterion grid search.
//!
//! Searches p in [0,2], d in [0,1], q in [0,2], skipping combinations with
//! `p + d + q > 4`, and keeps the order with the lowest AIC. Orders that
//! fail to fit are skipped; not every order is valid for every series. The
//! search is the most expensive call in the engine (one model fit per grid
//! cell) and is the primary client of the result cache.

use crate::algorithms::arima::{ArimaModel, ArimaOrder};
use crate::core::domain::CountSeries;
use crate::services::cache::{series_key, AnalysisCache};

/// Fallback order when no grid combination fits.
pub const FALLBACK_ORDER: ArimaOrder = ArimaOrder { p: 1, d: 1, q: 0 };

/// Finds the (p, d, q) order minimizing the AIC over the bounded grid.
///
/// Returns [`FALLBACK_ORDER`] when the series defeats every combination,
/// so callers never have to handle an error from auto-tuning.
pub fn search_arima_order(series: &CountSeries) -> ArimaOrder {
    let values = series.values();
    let mut best: Option<(f64, ArimaOrder)> = None;

    for p in 0..=2 {
        for d in 0..=1 {
            for q in 0..=2 {
                // Complexity cap: bounds runtime and avoids overfitting
                // short series.
                if p + d + q > 4 {
                    continue;
                }
                let order = ArimaOrder::new(p, d, q);
                match ArimaModel::fit(&values, order) {
                    Ok(model) => {
                        if best.map_or(true, |(aic, _)| model.aic < aic) {
                            best = Some((model.aic, order));
                        }
                    }
                    Err(e) => {
                        log::debug!("ARIMA order {} skipped: {}", order, e);
                    }
                }
            }
        }
    }

    match best {
        Some((_, order)) => order,
        None => {
            log::warn!(
                "no ARIMA order fit a series of {} observations, using fallback {}",
                series.len(),
                FALLBACK_ORDER
            );
            FALLBACK_ORDER
        }
    }
}

/// Cached variant of [`search_arima_order`].
///
/// The grid search runs one model fit per cell, which makes it the most
/// expensive call in the engine; dashboard callers route it through the
/// result cache keyed by the series checksum.
pub fn search_arima_order_cached(
    series: &CountSeries,
    cache: &AnalysisCache<ArimaOrder>,
) -> ArimaOrder {
    let key = series_key(series, "arima-order", &());
    cache.get_or_compute(key, || search_arima_order(series))
}
