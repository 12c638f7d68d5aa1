//! Demand forecasting tests
//!
//! Covers the forecasting core's guarantees:
//! - Weekday weight vectors sum to 1, with the exact uniform fallback
//! - Sparse history falls back to the constant mean forecast
//! - Statistical fit failures fall back instead of erroring
//! - Resolver priority and ratio adjustment
//! - Daily allocation conserves the monthly quantity

use proptest::prelude::*;

use shared::{
    allocate_daily, apply_ratio_adjustment, customer_forecast, fallback_forecast,
    forecast_monthly, normalize_weights, resolve_forecast, weekday_weights, ForecastMethod,
    ForecastSource, WeekdayAggregate, YearMonth, FORECAST_HORIZON,
};

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Weights are each weekday's fraction of the trailing total
    #[test]
    fn test_weekday_weights_are_fractions() {
        let totals = vec![
            WeekdayAggregate { weekday: 0, quantity: 30 },
            WeekdayAggregate { weekday: 3, quantity: 50 },
            WeekdayAggregate { weekday: 6, quantity: 20 },
        ];

        let weights = weekday_weights(&totals);

        assert!((weights[0] - 0.3).abs() < 1e-9);
        assert!((weights[3] - 0.5).abs() < 1e-9);
        assert!((weights[6] - 0.2).abs() < 1e-9);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    /// Zero history yields exactly 1/7 per slot, never NaN
    #[test]
    fn test_weekday_weights_uniform_fallback() {
        let weights = weekday_weights(&[]);
        for weight in weights {
            assert_eq!(weight, 1.0 / 7.0);
        }

        let zero_totals = vec![WeekdayAggregate { weekday: 2, quantity: 0 }];
        let weights = weekday_weights(&zero_totals);
        for weight in weights {
            assert_eq!(weight, 1.0 / 7.0);
        }
    }

    /// Out-of-range weekday indexes are ignored rather than panicking
    #[test]
    fn test_weekday_weights_ignores_bad_weekdays() {
        let totals = vec![
            WeekdayAggregate { weekday: 9, quantity: 100 },
            WeekdayAggregate { weekday: 1, quantity: 100 },
        ];
        let weights = weekday_weights(&totals);
        assert!((weights[1] - 1.0).abs() < 1e-9);
    }

    /// Fewer than 5 non-zero months: constant round(mean of non-zero)
    #[test]
    fn test_fallback_forecast_mean_of_non_zero() {
        let mut series = vec![0i64; 56];
        series.extend_from_slice(&[10, 20, 30, 40]);

        let forecast = fallback_forecast(&series, FORECAST_HORIZON);
        assert_eq!(forecast, vec![25; FORECAST_HORIZON]);
    }

    /// Empty history forecasts zeros, never divides by zero
    #[test]
    fn test_fallback_forecast_all_zero() {
        let series = vec![0i64; 60];
        let forecast = fallback_forecast(&series, FORECAST_HORIZON);
        assert_eq!(forecast, vec![0; FORECAST_HORIZON]);
    }

    /// Mean is rounded to the nearest integer
    #[test]
    fn test_fallback_forecast_rounds() {
        let series = vec![10i64, 25];
        let forecast = fallback_forecast(&series, 3);
        assert_eq!(forecast, vec![18; 3]);
    }

    /// Sparse history selects the fallback method
    #[test]
    fn test_forecast_monthly_sparse_history() {
        let mut series = vec![0i64; 57];
        series.extend_from_slice(&[12, 12, 12]);

        let forecast = forecast_monthly(&series, FORECAST_HORIZON);
        assert_eq!(forecast.method, ForecastMethod::MeanFallback);
        assert_eq!(forecast.values, vec![12; FORECAST_HORIZON]);
    }

    /// A constant series defeats the statistical fit (zero variance
    /// after differencing); the fallback must absorb it silently
    #[test]
    fn test_forecast_monthly_fit_failure_falls_back() {
        let series = vec![100i64; 60];
        let forecast = forecast_monthly(&series, FORECAST_HORIZON);

        assert_eq!(forecast.method, ForecastMethod::MeanFallback);
        assert_eq!(forecast.values, vec![100; FORECAST_HORIZON]);
    }

    /// A varied series fits statistically; predictions are clamped to
    /// non-negative integers
    #[test]
    fn test_forecast_monthly_statistical_path() {
        let series: Vec<i64> = (0i64..60).map(|t| 100 + (t * 7 % 13) * 10).collect();
        let forecast = forecast_monthly(&series, FORECAST_HORIZON);

        assert_eq!(forecast.method, ForecastMethod::Arima);
        assert_eq!(forecast.values.len(), FORECAST_HORIZON);
        assert!(forecast.values.iter().all(|v| *v >= 0));
    }

    /// Resolution order: override > calculated > live model
    #[test]
    fn test_resolver_priority() {
        let month = ym(2026, 9);
        let mut overrides = BTreeMap::new();
        overrides.insert(month, 50i64);
        let mut calculated = BTreeMap::new();
        calculated.insert(month, 30i64);

        let (qty, source) = resolve_forecast(month, &overrides, &calculated, 10, 0.0);
        assert_eq!((qty, source), (50, ForecastSource::Override));

        let (qty, source) =
            resolve_forecast(month, &BTreeMap::new(), &calculated, 10, 0.0);
        assert_eq!((qty, source), (30, ForecastSource::Calculated));

        let (qty, source) =
            resolve_forecast(month, &BTreeMap::new(), &BTreeMap::new(), 10, 0.0);
        assert_eq!((qty, source), (10, ForecastSource::Model));
    }

    /// The ratio adjustment scales only the live model tier
    #[test]
    fn test_ratio_adjustment_applies_to_model_tier_only() {
        let month = ym(2026, 9);
        let mut overrides = BTreeMap::new();
        overrides.insert(month, 50i64);

        let (qty, _) = resolve_forecast(month, &overrides, &BTreeMap::new(), 100, 50.0);
        assert_eq!(qty, 50);

        let (qty, _) =
            resolve_forecast(month, &BTreeMap::new(), &BTreeMap::new(), 100, 50.0);
        assert_eq!(qty, 150);
    }

    #[test]
    fn test_ratio_adjustment_floors_at_zero() {
        assert_eq!(apply_ratio_adjustment(100, -100.0), 0);
        assert_eq!(apply_ratio_adjustment(100, -10.0), 90);
        assert_eq!(apply_ratio_adjustment(100, 0.0), 100);
    }

    /// Daily allocation conserves the monthly quantity
    #[test]
    fn test_daily_allocation_sums_to_month() {
        let weights = normalize_weights(&[3.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.5]);
        let month = ym(2026, 2);
        let days = allocate_daily(280, month, &weights);

        assert_eq!(days.len(), 28);
        let total: f64 = days.iter().map(|d| d.quantity).sum();
        assert!((total - 280.0).abs() < 1e-6);
    }

    /// A zero month weight falls back to an even split
    #[test]
    fn test_daily_allocation_even_split_guard() {
        let weights = [0.0; 7];
        let month = ym(2026, 4);
        let days = allocate_daily(300, month, &weights);

        assert_eq!(days.len(), 30);
        for day in &days {
            assert!((day.quantity - 10.0).abs() < 1e-9);
        }
    }

    /// Customer forecast is a plain trailing average
    #[test]
    fn test_customer_forecast_trailing_average() {
        let history = vec![0i64, 0, 4, 6, 8, 10, 12, 14];
        let average = customer_forecast(&history, 6);
        assert!((average - 9.0).abs() < 1e-9);

        assert_eq!(customer_forecast(&[], 6), 0.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for weekday totals
    fn totals_strategy() -> impl Strategy<Value = Vec<WeekdayAggregate>> {
        prop::collection::vec((0u32..7, 0i64..10_000), 0..20).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(weekday, quantity)| WeekdayAggregate { weekday, quantity })
                .collect()
        })
    }

    /// Strategy for monthly quantity series
    fn series_strategy() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(0i64..5_000, 12..60)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Weight vectors always sum to 1 (the uniform fallback included)
        #[test]
        fn prop_weights_sum_to_one(totals in totals_strategy()) {
            let weights = weekday_weights(&totals);
            let sum: f64 = weights.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
        }

        /// The monthly forecast never fails and never goes negative
        #[test]
        fn prop_forecast_total_and_non_negative(series in series_strategy()) {
            let forecast = forecast_monthly(&series, FORECAST_HORIZON);
            prop_assert_eq!(forecast.values.len(), FORECAST_HORIZON);
            prop_assert!(forecast.values.iter().all(|v| *v >= 0));
        }

        /// Sparse series always produce the constant mean forecast
        #[test]
        fn prop_sparse_series_constant_forecast(
            non_zero in prop::collection::vec(1i64..1_000, 1..5),
            zeros in 10usize..50,
        ) {
            let mut series = vec![0i64; zeros];
            series.extend(&non_zero);

            let forecast = forecast_monthly(&series, FORECAST_HORIZON);
            prop_assert_eq!(forecast.method, ForecastMethod::MeanFallback);

            let mean = non_zero.iter().sum::<i64>() as f64 / non_zero.len() as f64;
            let expected = mean.round() as i64;
            prop_assert!(forecast.values.iter().all(|v| *v == expected));
        }

        /// Daily allocation conserves the monthly quantity for any month
        /// and any weight vector
        #[test]
        fn prop_daily_allocation_conserves_quantity(
            quantity in 0i64..100_000,
            year in 2020i32..2030,
            month in 1u32..=12,
            raw in prop::array::uniform7(0.0f64..10.0),
        ) {
            let weights = normalize_weights(&raw);
            let month = YearMonth::new(year, month).unwrap();
            let days = allocate_daily(quantity, month, &weights);

            prop_assert_eq!(days.len() as u32, month.days_in_month());
            let total: f64 = days.iter().map(|d| d.quantity).sum();
            prop_assert!((total - quantity as f64).abs() < 1e-6);
        }
    }
}
