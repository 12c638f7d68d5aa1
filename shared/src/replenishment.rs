//! Replenishment policy computations
//!
//! The dynamic reorder point and order quantity derived from the current
//! month's forecast. Used both read-only for display and by the
//! scheduler's control loop.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::LeadTimeMode;

/// Order quantities are always rounded up to this multiple
pub const ORDER_QTY_MULTIPLE: i64 = 100;

/// Inputs to one policy-engine evaluation
#[derive(Debug, Clone, Copy)]
pub struct ReplenishmentInputs {
    pub monthly_forecast: i64,
    /// On-hand plus all pending inbound quantity
    pub effective_stock: i64,
    pub safety_stock_days: f64,
    pub economic_order_qty: i64,
    pub lead_time_mode: LeadTimeMode,
}

/// Result of one policy-engine evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentComputation {
    pub daily_sales: f64,
    pub lead_time_days: i64,
    pub dynamic_safety_stock: f64,
    pub dynamic_reorder_point: f64,
    pub target_level: f64,
    pub should_trigger: bool,
    pub order_qty: i64,
}

/// Evaluate the reorder decision for one SKU.
///
/// A SKU with zero monthly forecast never triggers, even when stock is
/// low: undefined demand means no action.
pub fn compute_replenishment(inputs: &ReplenishmentInputs) -> ReplenishmentComputation {
    let daily_sales = inputs.monthly_forecast as f64 / 30.0;
    let lead_time_days = inputs.lead_time_mode.lead_time_days();
    let dynamic_safety_stock = daily_sales * 30.0 * inputs.safety_stock_days;
    let dynamic_reorder_point = dynamic_safety_stock + daily_sales * lead_time_days as f64;
    let target_level =
        (dynamic_reorder_point * 1.5).max(dynamic_reorder_point + daily_sales * 15.0);

    let should_trigger =
        (inputs.effective_stock as f64) < dynamic_reorder_point && inputs.monthly_forecast > 0;

    let shortfall = target_level - inputs.effective_stock as f64;
    let order_qty = round_up_to_multiple(
        shortfall.max(inputs.economic_order_qty as f64),
        ORDER_QTY_MULTIPLE,
    );

    ReplenishmentComputation {
        daily_sales,
        lead_time_days,
        dynamic_safety_stock,
        dynamic_reorder_point,
        target_level,
        should_trigger,
        order_qty,
    }
}

/// Round a quantity up to the next multiple (order quantities always
/// land on 100-unit boundaries). Negative inputs round to zero.
pub fn round_up_to_multiple(value: f64, multiple: i64) -> i64 {
    if multiple <= 0 {
        return value.ceil().max(0.0) as i64;
    }
    let units = (value / multiple as f64).ceil().max(0.0);
    units as i64 * multiple
}

/// Start of the cool-down lookback window ending at `now`. AUTO
/// proposals created at or after this instant suppress another
/// automatic trigger for the same SKU.
pub fn cooldown_window_start(now: DateTime<Utc>, cooldown_minutes: i64) -> DateTime<Utc> {
    now - Duration::minutes(cooldown_minutes.max(0))
}

/// Whether a proposal created at `created_at` falls inside the
/// cool-down window ending at `now`
pub fn suppresses_auto_trigger(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown_minutes: i64,
) -> bool {
    created_at >= cooldown_window_start(now, cooldown_minutes)
}
