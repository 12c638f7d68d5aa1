//! Derived forecast models
//!
//! These are computed fresh on every query and never persisted; given
//! the same ledger and policy snapshot the output is deterministic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{RiskTier, YearMonth};

/// Whether a point in the series is observed history or projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    History,
    Future,
}

/// Fractional demand assigned to one calendar day.
///
/// Intentionally unrounded for smooth charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDemand {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// One month of the historical + projected series for a SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year_month: YearMonth,
    pub kind: PointKind,
    pub quantity: i64,
    pub amount: Decimal,
    pub distinct_customers: Option<i64>,
    pub inbound: i64,
    pub simulated_stock: Option<i64>,
    pub safety_line: Option<i64>,
    pub rop_line: Option<i64>,
    pub daily_breakdown: Option<Vec<DailyDemand>>,
}

/// Headline figures for a SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuKpis {
    pub on_hand: i64,
    pub in_transit: i64,
    /// Days of stock cover at the current month's forecast rate
    pub turnover_days: Option<f64>,
    pub risk_tier: RiskTier,
    /// Latest complete month vs the policy's benchmark month, signed pct
    pub benchmark_pct: Option<f64>,
    /// Trailing-average distinct customer count (display metric)
    pub customer_forecast: f64,
}
