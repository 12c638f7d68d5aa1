//! Per-SKU demand forecast assembly
//!
//! Pulls ledger aggregates, the policy and inbound state, runs the pure
//! forecasting core and bundles the response the report layer consumes.
//! Results are computed fresh per request and are deterministic for a
//! given ledger/policy snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::{LedgerService, PolicyService, StockService};
use shared::{
    allocate_daily, customer_forecast, forecast_monthly, normalize_weights, resolve_forecast,
    simulate_stock, weekday_weights, BenchmarkType, DailyDemand, ForecastMethod, ForecastPoint,
    MonthlyAggregate, PointKind, ReplenishmentPolicy, RiskTier, SimulationMonth, SkuKpis,
    YearMonth, CUSTOMER_FORECAST_MONTHS, FORECAST_HORIZON, HISTORY_MONTHS, MIN_NONZERO_MONTHS,
    SEASONALITY_MONTHS,
};

/// Months of observed history included in the response series
const DISPLAY_HISTORY_MONTHS: u32 = 12;

/// Forecast assembly service
#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
}

/// Full per-SKU forecast response consumed by the report layer
#[derive(Debug, Serialize)]
pub struct SkuForecastResponse {
    pub sku: String,
    pub generated_at: DateTime<Utc>,
    pub forecast_method: ForecastMethod,
    pub kpis: SkuKpis,
    pub weekday_weights: [f64; 7],
    pub points: Vec<ForecastPoint>,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the full forecast response for a SKU
    pub async fn sku_forecast(&self, sku: &str) -> AppResult<SkuForecastResponse> {
        let policy = PolicyService::new(self.db.clone())
            .get_or_default(sku)
            .await?;
        self.sku_forecast_with_policy(sku, &policy).await
    }

    /// Build the forecast response with an already-loaded policy (the
    /// replenishment engine reuses its own snapshot)
    pub async fn sku_forecast_with_policy(
        &self,
        sku: &str,
        policy: &ReplenishmentPolicy,
    ) -> AppResult<SkuForecastResponse> {
        let ledger = LedgerService::new(self.db.clone());
        let stock = StockService::new(self.db.clone());

        let aggregates = ledger.monthly_aggregate(sku, HISTORY_MONTHS as u32).await?;
        let weekday_totals = ledger.weekday_aggregate(sku, SEASONALITY_MONTHS).await?;
        let unit_price = ledger.latest_unit_price(sku).await?;
        let on_hand = stock.on_hand(sku).await?;
        let batches = stock.pending_batches(sku).await?;

        let current_month = YearMonth::from_date(Utc::now().date_naive());
        let by_month = index_by_month(&aggregates);

        // Monthly quantity forecast over the zero-filled trailing series
        let series = zero_filled_quantities(&by_month, current_month);
        let forecast = forecast_monthly(&series, FORECAST_HORIZON);
        if forecast.method == ForecastMethod::MeanFallback
            && series.iter().filter(|q| **q != 0).count() >= MIN_NONZERO_MONTHS
        {
            tracing::warn!("Statistical fit failed for {}, using mean fallback", sku);
        }

        // Weekday seasonality: operator-configured weights win when
        // present and non-zero, otherwise the trailing estimate
        let weights = policy
            .seasonal_weights
            .filter(|w| w.iter().any(|x| *x > 0.0))
            .map(|w| normalize_weights(&w))
            .unwrap_or_else(|| weekday_weights(&weekday_totals));

        // Resolve each future month through the override tiers
        let mut future = Vec::with_capacity(FORECAST_HORIZON);
        for (offset, model_qty) in forecast.values.iter().enumerate() {
            let year_month = current_month.add_months(offset as u32);
            let (quantity, _source) = resolve_forecast(
                year_month,
                &policy.forecast_overrides,
                &policy.calculated_forecasts,
                *model_qty,
                policy.ratio_adjustment_pct,
            );
            future.push((year_month, quantity));
        }

        // Pending inbound, bucketed by arrival month
        let mut inbound_by_month: BTreeMap<YearMonth, i64> = BTreeMap::new();
        for batch in &batches {
            *inbound_by_month
                .entry(YearMonth::from_date(batch.arrival_date))
                .or_insert(0) += batch.quantity;
        }
        let in_transit: i64 = batches.iter().map(|b| b.quantity).sum();

        let sim_months: Vec<SimulationMonth> = future
            .iter()
            .map(|(year_month, quantity)| SimulationMonth {
                year_month: *year_month,
                forecast_qty: *quantity,
                inbound_qty: inbound_by_month.get(year_month).copied().unwrap_or(0),
            })
            .collect();
        let projection = simulate_stock(on_hand, policy.reorder_point, &sim_months);

        // History points, then projected points
        let mut points = Vec::with_capacity(DISPLAY_HISTORY_MONTHS as usize + FORECAST_HORIZON);
        for back in (1..=DISPLAY_HISTORY_MONTHS).rev() {
            let year_month = current_month.sub_months(back);
            let aggregate = by_month.get(&year_month);
            points.push(ForecastPoint {
                year_month,
                kind: PointKind::History,
                quantity: aggregate.map(|a| a.quantity).unwrap_or(0),
                amount: aggregate.map(|a| a.amount).unwrap_or(Decimal::ZERO),
                distinct_customers: Some(aggregate.map(|a| a.distinct_customers).unwrap_or(0)),
                inbound: 0,
                simulated_stock: None,
                safety_line: None,
                rop_line: None,
                daily_breakdown: None,
            });
        }
        for (simulated, (year_month, quantity)) in projection.iter().zip(future.iter()) {
            points.push(ForecastPoint {
                year_month: *year_month,
                kind: PointKind::Future,
                quantity: *quantity,
                amount: Decimal::from(*quantity) * unit_price,
                distinct_customers: None,
                inbound: simulated.inbound,
                simulated_stock: Some(simulated.simulated_stock),
                safety_line: Some(simulated.safety_line),
                rop_line: Some(simulated.rop_line),
                daily_breakdown: Some(allocate_daily(*quantity, *year_month, &weights)),
            });
        }

        // KPIs
        let current_forecast = future.first().map(|(_, q)| *q).unwrap_or(0);
        let daily_rate = current_forecast as f64 / 30.0;
        let turnover_days = (daily_rate > 0.0).then(|| on_hand as f64 / daily_rate);
        let risk_tier = turnover_days
            .map(RiskTier::from_turnover_days)
            .unwrap_or(RiskTier::Low);
        let customers = zero_filled_customers(&by_month, current_month);
        let kpis = SkuKpis {
            on_hand,
            in_transit,
            turnover_days,
            risk_tier,
            benchmark_pct: benchmark_pct(&by_month, current_month, policy.benchmark_type),
            customer_forecast: customer_forecast(&customers, CUSTOMER_FORECAST_MONTHS),
        };

        Ok(SkuForecastResponse {
            sku: sku.to_string(),
            generated_at: Utc::now(),
            forecast_method: forecast.method,
            kpis,
            weekday_weights: weights,
            points,
        })
    }

    /// One future month's daily demand curve
    pub async fn daily_breakdown(
        &self,
        sku: &str,
        year_month: YearMonth,
    ) -> AppResult<Vec<DailyDemand>> {
        let response = self.sku_forecast(sku).await?;
        response
            .points
            .into_iter()
            .find(|p| p.kind == PointKind::Future && p.year_month == year_month)
            .and_then(|p| p.daily_breakdown)
            .ok_or_else(|| AppError::NotFound("Forecast month".to_string()))
    }

    /// The current month's resolved forecast quantity, exactly as the
    /// replenishment policy engine consumes it
    pub async fn current_month_forecast(
        &self,
        sku: &str,
        policy: &ReplenishmentPolicy,
    ) -> AppResult<i64> {
        let ledger = LedgerService::new(self.db.clone());
        let aggregates = ledger.monthly_aggregate(sku, HISTORY_MONTHS as u32).await?;
        let current_month = YearMonth::from_date(Utc::now().date_naive());
        let by_month = index_by_month(&aggregates);

        let series = zero_filled_quantities(&by_month, current_month);
        let forecast = forecast_monthly(&series, 1);
        let model_qty = forecast.values.first().copied().unwrap_or(0);

        let (quantity, _source) = resolve_forecast(
            current_month,
            &policy.forecast_overrides,
            &policy.calculated_forecasts,
            model_qty,
            policy.ratio_adjustment_pct,
        );
        Ok(quantity)
    }
}

/// Index aggregates by month for series assembly
fn index_by_month(
    aggregates: &[MonthlyAggregate],
) -> BTreeMap<YearMonth, &MonthlyAggregate> {
    aggregates.iter().map(|a| (a.year_month, a)).collect()
}

/// The trailing complete months as a zero-filled quantity series,
/// oldest first
fn zero_filled_quantities(
    by_month: &BTreeMap<YearMonth, &MonthlyAggregate>,
    current_month: YearMonth,
) -> Vec<i64> {
    (1..=HISTORY_MONTHS as u32)
        .rev()
        .map(|back| {
            by_month
                .get(&current_month.sub_months(back))
                .map(|a| a.quantity)
                .unwrap_or(0)
        })
        .collect()
}

/// The trailing complete months as a zero-filled distinct-customer
/// series, oldest first
fn zero_filled_customers(
    by_month: &BTreeMap<YearMonth, &MonthlyAggregate>,
    current_month: YearMonth,
) -> Vec<i64> {
    (1..=HISTORY_MONTHS as u32)
        .rev()
        .map(|back| {
            by_month
                .get(&current_month.sub_months(back))
                .map(|a| a.distinct_customers)
                .unwrap_or(0)
        })
        .collect()
}

/// Latest complete month vs the policy's comparison month, as a signed
/// percentage; None when the comparison month saw no shipments
fn benchmark_pct(
    by_month: &BTreeMap<YearMonth, &MonthlyAggregate>,
    current_month: YearMonth,
    benchmark_type: BenchmarkType,
) -> Option<f64> {
    let latest = current_month.sub_months(1);
    let compare = match benchmark_type {
        BenchmarkType::MonthOverMonth => latest.sub_months(1),
        BenchmarkType::YearOverYear => latest.sub_months(12),
    };
    let latest_qty = by_month.get(&latest).map(|a| a.quantity).unwrap_or(0);
    let compare_qty = by_month.get(&compare).map(|a| a.quantity).unwrap_or(0);
    (compare_qty > 0).then(|| (latest_qty - compare_qty) as f64 / compare_qty as f64 * 100.0)
}
