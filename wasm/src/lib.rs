//! WebAssembly module for the Inventory Procurement Platform
//!
//! Provides client-side computation for the report layer:
//! - Daily demand curves for forecast charts
//! - Weekday seasonality weights
//! - Stock-cover risk classification
//! - Order quantity rounding

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Spread a monthly quantity across calendar days.
///
/// `weights_json` is the 7-element Monday-first weight vector; the
/// result is a JSON array of {date, quantity} with fractional
/// quantities for smooth charting.
#[wasm_bindgen]
pub fn daily_demand_curve(
    quantity: f64,
    year: i32,
    month: u32,
    weights_json: &str,
) -> Result<String, JsValue> {
    let weights: [f64; 7] = serde_json::from_str(weights_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid weights JSON: {}", e)))?;
    let month = shared::YearMonth::new(year, month)
        .ok_or_else(|| JsValue::from_str("Month must be between 1 and 12"))?;

    let curve = shared::allocate_daily(
        quantity.round() as i64,
        month,
        &shared::normalize_weights(&weights),
    );
    serde_json::to_string(&curve).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Derive the weekday weight vector from trailing weekday totals.
///
/// `totals_json` is a JSON array of {weekday, quantity} with Monday = 0;
/// the result is the normalized 7-element vector.
#[wasm_bindgen]
pub fn weekday_weights_from_totals(totals_json: &str) -> Result<String, JsValue> {
    let totals: Vec<WeekdayAggregate> = serde_json::from_str(totals_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid totals JSON: {}", e)))?;

    let weights = shared::weekday_weights(&totals);
    serde_json::to_string(&weights.to_vec()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify days of stock cover into a risk tier
#[wasm_bindgen]
pub fn classify_stock_risk(turnover_days: f64) -> String {
    match RiskTier::from_turnover_days(turnover_days) {
        RiskTier::Low => "low".to_string(),
        RiskTier::Medium => "medium".to_string(),
        RiskTier::High => "high".to_string(),
    }
}

/// Round an order quantity up to the 100-unit boundary the engine uses
#[wasm_bindgen]
pub fn round_order_qty(quantity: f64) -> f64 {
    shared::round_up_to_multiple(quantity, shared::ORDER_QTY_MULTIPLE) as f64
}

/// Validate a "HH:MM" auto-replenishment trigger time
#[wasm_bindgen]
pub fn validate_trigger_time(time: &str) -> bool {
    shared::validate_auto_time(time).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_demand_curve_sums_to_quantity() {
        let weights = "[0.2, 0.2, 0.2, 0.2, 0.2, 0.0, 0.0]";
        let curve = daily_demand_curve(300.0, 2026, 6, weights).unwrap();
        let days: Vec<DailyDemand> = serde_json::from_str(&curve).unwrap();

        assert_eq!(days.len(), 30);
        let total: f64 = days.iter().map(|d| d.quantity).sum();
        assert!((total - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_weekday_weights_normalize() {
        let totals = r#"[{"weekday": 0, "quantity": 30}, {"weekday": 4, "quantity": 70}]"#;
        let weights = weekday_weights_from_totals(totals).unwrap();
        let weights: Vec<f64> = serde_json::from_str(&weights).unwrap();

        assert!((weights[0] - 0.3).abs() < 1e-9);
        assert!((weights[4] - 0.7).abs() < 1e-9);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_stock_risk() {
        assert_eq!(classify_stock_risk(5.0), "high");
        assert_eq!(classify_stock_risk(30.0), "medium");
        assert_eq!(classify_stock_risk(90.0), "low");
    }

    #[test]
    fn test_round_order_qty() {
        assert_eq!(round_order_qty(1.0), 100.0);
        assert_eq!(round_order_qty(270.0), 300.0);
        assert_eq!(round_order_qty(300.0), 300.0);
    }

    #[test]
    fn test_validate_trigger_time() {
        assert!(validate_trigger_time("09:30"));
        assert!(!validate_trigger_time("24:00"));
        assert!(!validate_trigger_time("nine"));
    }
}
