//! Forward stock simulation
//!
//! A pure chronological fold: each future month applies planned inbound,
//! observes the reorder line, then subtracts the forecast outflow. No
//! ordering decisions are made here; that is the policy engine's job.

use serde::{Deserialize, Serialize};

use crate::types::YearMonth;

/// Planned figures for one month of the simulation horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationMonth {
    pub year_month: YearMonth,
    pub forecast_qty: i64,
    pub inbound_qty: i64,
}

/// One simulated month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedMonth {
    pub year_month: YearMonth,
    pub inbound: i64,
    pub simulated_stock: i64,
    pub safety_line: i64,
    pub rop_line: i64,
    /// Observational only: stock was under the reorder point after the
    /// month's inbound landed
    pub below_reorder_point: bool,
}

/// Walk the horizon month by month against the static reorder-point and
/// safety-stock reference lines.
pub fn simulate_stock(
    on_hand: i64,
    reorder_point: i64,
    months: &[SimulationMonth],
) -> Vec<SimulatedMonth> {
    let safety_line = (reorder_point as f64 * 0.6).round() as i64;
    let mut current = on_hand;
    let mut projection = Vec::with_capacity(months.len());
    for month in months {
        current += month.inbound_qty;
        let below = current < reorder_point;
        current -= month.forecast_qty;
        projection.push(SimulatedMonth {
            year_month: month.year_month,
            inbound: month.inbound_qty,
            simulated_stock: current,
            safety_line,
            rop_line: reorder_point,
            below_reorder_point: below,
        });
    }
    projection
}
