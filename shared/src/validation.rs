//! Validation utilities for the Inventory Procurement Platform
//!
//! Policy JSON blobs (override maps, weight vectors, price tiers) are
//! validated here, at the store boundary, rather than scattered through
//! the engine.

use rust_decimal::Decimal;

use crate::models::{PriceTier, ReplenishmentPolicy, SupplierPricing};

// ============================================================================
// Policy Validations
// ============================================================================

/// Validate a full policy before it is upserted
pub fn validate_policy(policy: &ReplenishmentPolicy) -> Result<(), &'static str> {
    if !policy.safety_stock_days.is_finite() || policy.safety_stock_days < 0.0 {
        return Err("Safety stock days must be a non-negative number");
    }
    if !policy.service_level.is_finite() || !(0.0..=1.0).contains(&policy.service_level) {
        return Err("Service level must be between 0 and 1");
    }
    if policy.reorder_point < 0 {
        return Err("Reorder point cannot be negative");
    }
    if policy.economic_order_qty < 0 {
        return Err("Economic order quantity cannot be negative");
    }
    validate_ratio_adjustment(policy.ratio_adjustment_pct)?;
    if let Some(weights) = &policy.seasonal_weights {
        validate_seasonal_weights(weights)?;
    }
    if let Some(pricing) = &policy.supplier_pricing {
        validate_pricing(pricing)?;
    }
    if let Some(time) = &policy.auto_replenish_time {
        validate_auto_time(time)?;
    }
    if policy.auto_replenish_enabled && policy.auto_replenish_time.is_none() {
        return Err("Auto replenishment requires a trigger time");
    }
    Ok(())
}

/// Validate a wall-clock trigger time in "HH:MM" form
pub fn validate_auto_time(time: &str) -> Result<(), &'static str> {
    let Some((hours, minutes)) = time.split_once(':') else {
        return Err("Trigger time must be HH:MM");
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return Err("Trigger time must be HH:MM");
    }
    let hours: u32 = hours.parse().map_err(|_| "Trigger time must be HH:MM")?;
    let minutes: u32 = minutes.parse().map_err(|_| "Trigger time must be HH:MM")?;
    if hours > 23 || minutes > 59 {
        return Err("Trigger time out of range");
    }
    Ok(())
}

/// Validate an operator-configured weekday weight vector
pub fn validate_seasonal_weights(weights: &[f64; 7]) -> Result<(), &'static str> {
    for weight in weights {
        if !weight.is_finite() {
            return Err("Seasonal weights must be finite numbers");
        }
        if *weight < 0.0 {
            return Err("Seasonal weights cannot be negative");
        }
    }
    Ok(())
}

/// Validate the percentage adjustment applied to model forecasts
pub fn validate_ratio_adjustment(pct: f64) -> Result<(), &'static str> {
    if !pct.is_finite() {
        return Err("Ratio adjustment must be a finite percentage");
    }
    if pct < -100.0 {
        return Err("Ratio adjustment cannot reduce a forecast below zero");
    }
    Ok(())
}

// ============================================================================
// Supplier Pricing Validations
// ============================================================================

/// Validate a supplier pricing schedule
pub fn validate_pricing(pricing: &SupplierPricing) -> Result<(), &'static str> {
    if pricing.supplier_code.trim().is_empty() {
        return Err("Supplier code is required");
    }
    if pricing.lead_time_fast_days < 0 || pricing.lead_time_economic_days < 0 {
        return Err("Lead times cannot be negative");
    }
    if pricing.min_order_qty < 0 {
        return Err("Minimum order quantity cannot be negative");
    }
    if pricing.order_unit_qty <= 0 {
        return Err("Order unit quantity must be positive");
    }
    validate_price_tiers(&pricing.price_tiers)
}

/// Validate a tier list: positive quantity breaks, non-negative prices,
/// and at most one tier marked as selected
pub fn validate_price_tiers(tiers: &[PriceTier]) -> Result<(), &'static str> {
    let selected = tiers.iter().filter(|t| t.is_selected).count();
    if selected > 1 {
        return Err("At most one price tier may be selected");
    }
    for tier in tiers {
        if tier.min_qty <= 0 {
            return Err("Price tier minimum quantity must be positive");
        }
        if tier.unit_price < Decimal::ZERO {
            return Err("Price tier unit price cannot be negative");
        }
        if tier.lead_time_days < 0 {
            return Err("Price tier lead time cannot be negative");
        }
    }
    Ok(())
}
