//! Replenishment policy store
//!
//! JSON blob columns (override maps, weight vectors, supplier pricing)
//! are typed and validated here, at the store boundary, so the engine
//! only ever sees well-formed records. A SKU without a policy row falls
//! back to the system defaults.

use std::collections::BTreeMap;

use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{
    coerce_qty, validate_policy, BenchmarkType, LeadTimeMode, ReplenishmentPolicy,
    SupplierPricing, YearMonth,
};

/// Store for per-SKU replenishment policies
#[derive(Clone)]
pub struct PolicyService {
    db: PgPool,
}

/// Database row for a policy
#[derive(Debug, sqlx::FromRow)]
struct PolicyRow {
    sku: String,
    safety_stock_days: f64,
    service_level: f64,
    reorder_point: i64,
    economic_order_qty: i64,
    lead_time_mode: String,
    benchmark_type: String,
    seasonal_weights: Option<serde_json::Value>,
    ratio_adjustment_pct: f64,
    forecast_overrides: Option<serde_json::Value>,
    calculated_forecasts: Option<serde_json::Value>,
    supplier_pricing: Option<serde_json::Value>,
    auto_replenish_enabled: bool,
    auto_replenish_time: Option<String>,
}

impl From<PolicyRow> for ReplenishmentPolicy {
    fn from(row: PolicyRow) -> Self {
        let seasonal_weights = row
            .seasonal_weights
            .and_then(|v| serde_json::from_value::<Vec<f64>>(v).ok())
            .and_then(|v| <[f64; 7]>::try_from(v).ok());

        let supplier_pricing = row
            .supplier_pricing
            .and_then(|v| serde_json::from_value::<SupplierPricing>(v).ok());

        ReplenishmentPolicy {
            sku: row.sku,
            safety_stock_days: row.safety_stock_days,
            service_level: row.service_level,
            reorder_point: row.reorder_point,
            economic_order_qty: row.economic_order_qty,
            lead_time_mode: LeadTimeMode::from_str_or_economic(&row.lead_time_mode),
            benchmark_type: BenchmarkType::from_str_or_month(&row.benchmark_type),
            seasonal_weights,
            ratio_adjustment_pct: row.ratio_adjustment_pct,
            forecast_overrides: parse_qty_map(row.forecast_overrides),
            calculated_forecasts: parse_qty_map(row.calculated_forecasts),
            supplier_pricing,
            auto_replenish_enabled: row.auto_replenish_enabled,
            auto_replenish_time: row.auto_replenish_time,
        }
    }
}

/// Parse a stored month -> quantity map, coercing each value through the
/// lenient quantity rule and dropping unparseable month keys
fn parse_qty_map(value: Option<serde_json::Value>) -> BTreeMap<YearMonth, i64> {
    let Some(serde_json::Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(key, qty)| {
            key.parse::<YearMonth>()
                .ok()
                .map(|year_month| (year_month, coerce_qty(qty)))
        })
        .collect()
}

/// Input for upserting a policy; absent fields keep their current (or
/// default) values
#[derive(Debug, Default, Deserialize)]
pub struct UpsertPolicyInput {
    pub safety_stock_days: Option<f64>,
    pub service_level: Option<f64>,
    pub reorder_point: Option<i64>,
    pub economic_order_qty: Option<i64>,
    pub lead_time_mode: Option<LeadTimeMode>,
    pub benchmark_type: Option<BenchmarkType>,
    pub seasonal_weights: Option<[f64; 7]>,
    pub ratio_adjustment_pct: Option<f64>,
    pub forecast_overrides: Option<BTreeMap<YearMonth, i64>>,
    pub calculated_forecasts: Option<BTreeMap<YearMonth, i64>>,
    pub supplier_pricing: Option<SupplierPricing>,
    pub auto_replenish_enabled: Option<bool>,
    pub auto_replenish_time: Option<String>,
}

impl PolicyService {
    /// Create a new PolicyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the policy for a SKU, if one exists
    pub async fn get(&self, sku: &str) -> AppResult<Option<ReplenishmentPolicy>> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT sku, safety_stock_days, service_level, reorder_point,
                   economic_order_qty, lead_time_mode, benchmark_type,
                   seasonal_weights, ratio_adjustment_pct, forecast_overrides,
                   calculated_forecasts, supplier_pricing,
                   auto_replenish_enabled, auto_replenish_time
            FROM replenishment_policies
            WHERE sku = $1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| row.into()))
    }

    /// Get the policy for a SKU, or the system defaults when none exists
    pub async fn get_or_default(&self, sku: &str) -> AppResult<ReplenishmentPolicy> {
        Ok(self
            .get(sku)
            .await?
            .unwrap_or_else(|| ReplenishmentPolicy::defaults(sku)))
    }

    /// Upsert the policy for a SKU, merging the input over the current
    /// values and validating the result before it is stored
    pub async fn upsert(
        &self,
        sku: &str,
        input: UpsertPolicyInput,
    ) -> AppResult<ReplenishmentPolicy> {
        let mut policy = self.get_or_default(sku).await?;

        if let Some(v) = input.safety_stock_days {
            policy.safety_stock_days = v;
        }
        if let Some(v) = input.service_level {
            policy.service_level = v;
        }
        if let Some(v) = input.reorder_point {
            policy.reorder_point = v;
        }
        if let Some(v) = input.economic_order_qty {
            policy.economic_order_qty = v;
        }
        if let Some(v) = input.lead_time_mode {
            policy.lead_time_mode = v;
        }
        if let Some(v) = input.benchmark_type {
            policy.benchmark_type = v;
        }
        if let Some(v) = input.seasonal_weights {
            policy.seasonal_weights = Some(v);
        }
        if let Some(v) = input.ratio_adjustment_pct {
            policy.ratio_adjustment_pct = v;
        }
        if let Some(v) = input.forecast_overrides {
            policy.forecast_overrides = v;
        }
        if let Some(v) = input.calculated_forecasts {
            policy.calculated_forecasts = v;
        }
        if let Some(v) = input.supplier_pricing {
            policy.supplier_pricing = Some(v);
        }
        if let Some(v) = input.auto_replenish_enabled {
            policy.auto_replenish_enabled = v;
        }
        if let Some(v) = input.auto_replenish_time {
            policy.auto_replenish_time = Some(v);
        }

        validate_policy(&policy).map_err(|message| AppError::Validation {
            field: "policy".to_string(),
            message: message.to_string(),
        })?;

        let seasonal_weights = policy
            .seasonal_weights
            .as_ref()
            .map(|w| serde_json::to_value(w.to_vec()))
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let forecast_overrides = serde_json::to_value(&policy.forecast_overrides)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let calculated_forecasts = serde_json::to_value(&policy.calculated_forecasts)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let supplier_pricing = policy
            .supplier_pricing
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO replenishment_policies (
                sku, safety_stock_days, service_level, reorder_point,
                economic_order_qty, lead_time_mode, benchmark_type,
                seasonal_weights, ratio_adjustment_pct, forecast_overrides,
                calculated_forecasts, supplier_pricing,
                auto_replenish_enabled, auto_replenish_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (sku) DO UPDATE SET
                safety_stock_days = EXCLUDED.safety_stock_days,
                service_level = EXCLUDED.service_level,
                reorder_point = EXCLUDED.reorder_point,
                economic_order_qty = EXCLUDED.economic_order_qty,
                lead_time_mode = EXCLUDED.lead_time_mode,
                benchmark_type = EXCLUDED.benchmark_type,
                seasonal_weights = EXCLUDED.seasonal_weights,
                ratio_adjustment_pct = EXCLUDED.ratio_adjustment_pct,
                forecast_overrides = EXCLUDED.forecast_overrides,
                calculated_forecasts = EXCLUDED.calculated_forecasts,
                supplier_pricing = EXCLUDED.supplier_pricing,
                auto_replenish_enabled = EXCLUDED.auto_replenish_enabled,
                auto_replenish_time = EXCLUDED.auto_replenish_time,
                updated_at = NOW()
            RETURNING sku, safety_stock_days, service_level, reorder_point,
                      economic_order_qty, lead_time_mode, benchmark_type,
                      seasonal_weights, ratio_adjustment_pct, forecast_overrides,
                      calculated_forecasts, supplier_pricing,
                      auto_replenish_enabled, auto_replenish_time
            "#,
        )
        .bind(sku)
        .bind(policy.safety_stock_days)
        .bind(policy.service_level)
        .bind(policy.reorder_point)
        .bind(policy.economic_order_qty)
        .bind(policy.lead_time_mode.as_str())
        .bind(policy.benchmark_type.as_str())
        .bind(&seasonal_weights)
        .bind(policy.ratio_adjustment_pct)
        .bind(&forecast_overrides)
        .bind(&calculated_forecasts)
        .bind(&supplier_pricing)
        .bind(policy.auto_replenish_enabled)
        .bind(&policy.auto_replenish_time)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Policies flagged for automation whose trigger time matches the
    /// given wall-clock minute
    pub async fn auto_candidates(&self, hhmm: &str) -> AppResult<Vec<ReplenishmentPolicy>> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT sku, safety_stock_days, service_level, reorder_point,
                   economic_order_qty, lead_time_mode, benchmark_type,
                   seasonal_weights, ratio_adjustment_pct, forecast_overrides,
                   calculated_forecasts, supplier_pricing,
                   auto_replenish_enabled, auto_replenish_time
            FROM replenishment_policies
            WHERE auto_replenish_enabled = true AND auto_replenish_time = $1
            ORDER BY sku ASC
            "#,
        )
        .bind(hhmm)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }
}
