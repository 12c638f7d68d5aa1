//! Replenishment policy models
//!
//! One policy row per SKU; absence of a row means the system defaults
//! apply. The override maps and supplier pricing persist as JSON but are
//! modeled as typed records here and validated at the store boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::SupplierPricing;
use crate::types::YearMonth;

/// Replenishment lead-time mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeMode {
    Fast,
    Economic,
}

impl LeadTimeMode {
    /// Days between order placement and inbound arrival for this mode
    pub fn lead_time_days(&self) -> i64 {
        match self {
            LeadTimeMode::Fast => 7,
            LeadTimeMode::Economic => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadTimeMode::Fast => "fast",
            LeadTimeMode::Economic => "economic",
        }
    }

    /// Forgiving mapping from the stored string
    pub fn from_str_or_economic(s: &str) -> Self {
        match s {
            "fast" => LeadTimeMode::Fast,
            _ => LeadTimeMode::Economic,
        }
    }
}

/// Which historical month the benchmark KPI compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkType {
    MonthOverMonth,
    YearOverYear,
}

impl BenchmarkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkType::MonthOverMonth => "month_over_month",
            BenchmarkType::YearOverYear => "year_over_year",
        }
    }

    pub fn from_str_or_month(s: &str) -> Self {
        match s {
            "year_over_year" => BenchmarkType::YearOverYear,
            _ => BenchmarkType::MonthOverMonth,
        }
    }
}

/// Per-SKU replenishment policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentPolicy {
    pub sku: String,
    pub safety_stock_days: f64,
    pub service_level: f64,
    /// Operator-configured static reorder point; drives the simulator's
    /// reference lines, not the dynamic control loop
    pub reorder_point: i64,
    pub economic_order_qty: i64,
    pub lead_time_mode: LeadTimeMode,
    pub benchmark_type: BenchmarkType,
    /// Optional operator-configured weekday weights (Monday first);
    /// overrides the estimated seasonality when present and non-zero
    pub seasonal_weights: Option<[f64; 7]>,
    /// Percentage adjustment applied to the live statistical forecast
    pub ratio_adjustment_pct: f64,
    /// Operator forecast overrides, keyed by month
    pub forecast_overrides: BTreeMap<YearMonth, i64>,
    /// Previously approved default forecasts, keyed by month
    pub calculated_forecasts: BTreeMap<YearMonth, i64>,
    pub supplier_pricing: Option<SupplierPricing>,
    pub auto_replenish_enabled: bool,
    /// Wall-clock "HH:MM" at which the scheduler evaluates this SKU
    pub auto_replenish_time: Option<String>,
}

impl ReplenishmentPolicy {
    /// System-wide defaults applied when no policy row exists for a SKU
    pub fn defaults(sku: &str) -> Self {
        Self {
            sku: sku.to_string(),
            safety_stock_days: 1.0,
            service_level: 0.95,
            reorder_point: 0,
            economic_order_qty: 0,
            lead_time_mode: LeadTimeMode::Economic,
            benchmark_type: BenchmarkType::MonthOverMonth,
            seasonal_weights: None,
            ratio_adjustment_pct: 0.0,
            forecast_overrides: BTreeMap::new(),
            calculated_forecasts: BTreeMap::new(),
            supplier_pricing: None,
            auto_replenish_enabled: false,
            auto_replenish_time: None,
        }
    }
}
