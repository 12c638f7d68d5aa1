//! Sales ledger read service
//!
//! The ledger is append-only and externally owned; this service exposes
//! only the aggregate views the forecasting engine consumes.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::{MonthlyAggregate, WeekdayAggregate, YearMonth};

/// Read-side service over the sales ledger
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Row for the monthly aggregate query
#[derive(Debug, sqlx::FromRow)]
struct MonthlyRow {
    period: String,
    quantity: i64,
    amount: Decimal,
    distinct_customers: i64,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Monthly shipment aggregates for the trailing `months` months,
    /// oldest first. Months with no shipments are absent from the
    /// result; callers zero-fill the series.
    pub async fn monthly_aggregate(
        &self,
        sku: &str,
        months: u32,
    ) -> AppResult<Vec<MonthlyAggregate>> {
        let rows = sqlx::query_as::<_, MonthlyRow>(
            r#"
            SELECT TO_CHAR(DATE_TRUNC('month', ship_date), 'YYYY-MM') as period,
                   COALESCE(SUM(quantity), 0)::bigint as quantity,
                   COALESCE(SUM(quantity * unit_price), 0) as amount,
                   COUNT(DISTINCT customer_id) as distinct_customers
            FROM sales_ledger
            WHERE sku = $1
              AND ship_date >= DATE_TRUNC('month', NOW()) - make_interval(months => $2)
            GROUP BY DATE_TRUNC('month', ship_date)
            ORDER BY period ASC
            "#,
        )
        .bind(sku)
        .bind(months as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.period.parse::<YearMonth>().ok().map(|year_month| MonthlyAggregate {
                    year_month,
                    quantity: row.quantity,
                    amount: row.amount,
                    distinct_customers: row.distinct_customers,
                })
            })
            .collect())
    }

    /// Weekday shipment totals over the trailing months (Monday = 0)
    pub async fn weekday_aggregate(
        &self,
        sku: &str,
        trailing_months: u32,
    ) -> AppResult<Vec<WeekdayAggregate>> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT (EXTRACT(ISODOW FROM ship_date)::int - 1) as weekday,
                   COALESCE(SUM(quantity), 0)::bigint as quantity
            FROM sales_ledger
            WHERE sku = $1
              AND ship_date >= NOW() - make_interval(months => $2)
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(sku)
        .bind(trailing_months as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(weekday, quantity)| WeekdayAggregate {
                weekday: weekday.max(0) as u32,
                quantity,
            })
            .collect())
    }

    /// Most recent non-zero unit price for a SKU, zero when no priced
    /// sales history exists at all
    pub async fn latest_unit_price(&self, sku: &str) -> AppResult<Decimal> {
        let price = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT unit_price
            FROM sales_ledger
            WHERE sku = $1 AND unit_price > 0
            ORDER BY ship_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(price.unwrap_or(Decimal::ZERO))
    }
}
