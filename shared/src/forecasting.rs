//! Demand forecasting core
//!
//! Seasonality estimation, monthly quantity forecasting with
//! deterministic fallbacks, forecast resolution and daily allocation.
//! Everything here is pure: same inputs, same outputs, no I/O.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::arima;
use crate::models::{DailyDemand, WeekdayAggregate};
use crate::types::YearMonth;

/// Forecast horizon in months
pub const FORECAST_HORIZON: usize = 6;

/// Months of history fed to the statistical model
pub const HISTORY_MONTHS: usize = 60;

/// Trailing months used for the weekday seasonality estimate
pub const SEASONALITY_MONTHS: u32 = 12;

/// Trailing months averaged for the customer-count forecast
pub const CUSTOMER_FORECAST_MONTHS: usize = 6;

/// Minimum count of non-zero history months for the statistical model
pub const MIN_NONZERO_MONTHS: usize = 5;

/// How a monthly forecast was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Arima,
    MeanFallback,
}

/// A monthly quantity forecast and the method that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyForecast {
    pub values: Vec<i64>,
    pub method: ForecastMethod,
}

/// Which tier of the resolution order produced a resolved forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    Override,
    Calculated,
    Model,
}

/// Weekday demand weights (Monday = index 0) from trailing shipment
/// totals. Each slot is that weekday's fraction of the total quantity;
/// zero history yields the uniform vector.
pub fn weekday_weights(totals: &[WeekdayAggregate]) -> [f64; 7] {
    let mut sums = [0.0f64; 7];
    for total in totals {
        if (total.weekday as usize) < 7 && total.quantity > 0 {
            sums[total.weekday as usize] += total.quantity as f64;
        }
    }
    normalize_weights(&sums)
}

/// Scale a weight vector to sum to 1.0, or exactly 1/7 per slot when the
/// total is zero. Never divides by zero, never emits NaN.
pub fn normalize_weights(weights: &[f64; 7]) -> [f64; 7] {
    let total: f64 = weights
        .iter()
        .filter(|w| w.is_finite() && **w > 0.0)
        .sum();
    if total <= 0.0 {
        return [1.0 / 7.0; 7];
    }
    let mut out = [0.0; 7];
    for (slot, weight) in weights.iter().enumerate() {
        out[slot] = if weight.is_finite() && *weight > 0.0 {
            weight / total
        } else {
            0.0
        };
    }
    out
}

/// Constant fallback forecast: round(mean of the non-zero months), or
/// all zeros when no month is non-zero.
pub fn fallback_forecast(series: &[i64], horizon: usize) -> Vec<i64> {
    let non_zero: Vec<i64> = series.iter().copied().filter(|q| *q != 0).collect();
    let level = if non_zero.is_empty() {
        0
    } else {
        let mean = non_zero.iter().sum::<i64>() as f64 / non_zero.len() as f64;
        mean.round() as i64
    };
    vec![level.max(0); horizon]
}

/// Monthly quantity forecast with deterministic fallbacks.
///
/// Fewer than [`MIN_NONZERO_MONTHS`] non-zero history months, or any
/// failure of the statistical fit, produces the constant mean fallback.
/// This function never fails and never panics.
pub fn forecast_monthly(series: &[i64], horizon: usize) -> MonthlyForecast {
    let non_zero = series.iter().filter(|q| **q != 0).count();
    if non_zero < MIN_NONZERO_MONTHS {
        return MonthlyForecast {
            values: fallback_forecast(series, horizon),
            method: ForecastMethod::MeanFallback,
        };
    }

    let floats: Vec<f64> = series.iter().map(|q| *q as f64).collect();
    match arima::fit_forecast(&floats, horizon) {
        Ok(values) => MonthlyForecast {
            values: values
                .into_iter()
                .map(|v| v.max(0.0).round() as i64)
                .collect(),
            method: ForecastMethod::Arima,
        },
        Err(_) => MonthlyForecast {
            values: fallback_forecast(series, horizon),
            method: ForecastMethod::MeanFallback,
        },
    }
}

/// Trailing-average customer count forecast. Intentionally simpler than
/// the quantity model; this is only a display metric.
pub fn customer_forecast(history: &[i64], window: usize) -> f64 {
    let taken = history.iter().rev().take(window).copied().collect::<Vec<_>>();
    if taken.is_empty() {
        return 0.0;
    }
    taken.iter().sum::<i64>() as f64 / taken.len() as f64
}

/// Resolve one future month's forecast: operator override first, then
/// the approved default, then the live model output adjusted by the
/// policy's ratio. Exactly one source wins; no blending.
pub fn resolve_forecast(
    year_month: YearMonth,
    overrides: &BTreeMap<YearMonth, i64>,
    calculated: &BTreeMap<YearMonth, i64>,
    model_qty: i64,
    ratio_adjustment_pct: f64,
) -> (i64, ForecastSource) {
    if let Some(qty) = overrides.get(&year_month) {
        return (*qty, ForecastSource::Override);
    }
    if let Some(qty) = calculated.get(&year_month) {
        return (*qty, ForecastSource::Calculated);
    }
    (
        apply_ratio_adjustment(model_qty, ratio_adjustment_pct),
        ForecastSource::Model,
    )
}

/// Scale a model forecast by the policy's percentage adjustment. Applies
/// only to the live model tier; operator numbers are taken verbatim.
pub fn apply_ratio_adjustment(qty: i64, pct: f64) -> i64 {
    if !pct.is_finite() || pct == 0.0 {
        return qty.max(0);
    }
    ((qty as f64) * (1.0 + pct / 100.0)).round().max(0.0) as i64
}

/// Spread a monthly quantity across calendar days using the weekday
/// weight vector. The output is fractional and intentionally unrounded.
pub fn allocate_daily(quantity: i64, month: YearMonth, weights: &[f64; 7]) -> Vec<DailyDemand> {
    let days = month.days_in_month();
    let mut month_weight = 0.0;
    let mut dated_weights = Vec::with_capacity(days as usize);
    for day in 1..=days {
        let date = NaiveDate::from_ymd_opt(month.year, month.month, day)
            .expect("day is within the month");
        let weight = weights[date.weekday().num_days_from_monday() as usize];
        month_weight += weight;
        dated_weights.push((date, weight));
    }

    if month_weight <= 0.0 {
        // Cannot occur after the uniform fallback, but the guard keeps
        // the division total.
        let even = quantity as f64 / days as f64;
        return dated_weights
            .into_iter()
            .map(|(date, _)| DailyDemand {
                date,
                quantity: even,
            })
            .collect();
    }

    dated_weights
        .into_iter()
        .map(|(date, weight)| DailyDemand {
            date,
            quantity: quantity as f64 * weight / month_weight,
        })
        .collect()
}
