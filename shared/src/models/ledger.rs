//! Sales ledger models
//!
//! The ledger is append-only and externally owned; the engine only ever
//! reads aggregate views derived from it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::YearMonth;

/// A single shipment line in the sales ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesLedgerEntry {
    pub sku: String,
    pub ship_date: NaiveDate,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub customer_id: String,
}

/// One month of aggregated shipments for a SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub year_month: YearMonth,
    pub quantity: i64,
    pub amount: Decimal,
    pub distinct_customers: i64,
}

/// Total shipped quantity for one weekday (Monday = 0 .. Sunday = 6)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayAggregate {
    pub weekday: u32,
    pub quantity: i64,
}
