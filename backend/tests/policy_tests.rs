//! Replenishment policy and supplier pricing tests
//!
//! Covers the store-boundary invariants:
//! - At most one selected price tier; unselected lists default to the
//!   lowest quantity break
//! - Policy defaults for SKUs without a row
//! - Override maps round-trip through their JSON form

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::{
    validate_auto_time, validate_policy, validate_price_tiers, validate_pricing,
    LeadTimeMode, PriceTier, ReplenishmentPolicy, SupplierPricing, YearMonth,
};

fn tier(min_qty: i64, unit_price: i64, lead_time_days: i32, is_selected: bool) -> PriceTier {
    PriceTier {
        min_qty,
        unit_price: Decimal::from(unit_price),
        lead_time_days,
        is_selected,
    }
}

fn pricing(tiers: Vec<PriceTier>) -> SupplierPricing {
    SupplierPricing {
        supplier_code: "SUP-001".to_string(),
        lead_time_fast_days: 7,
        lead_time_economic_days: 30,
        min_order_qty: 100,
        order_unit_qty: 10,
        price_tiers: tiers,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// With no tier marked selected, the lowest quantity break is the
    /// effective default
    #[test]
    fn test_unselected_tiers_default_to_lowest_min_qty() {
        let pricing = pricing(vec![
            tier(100, 8, 45, false),
            tier(1, 10, 30, false),
        ]);

        let effective = pricing.effective_tier().unwrap();
        assert_eq!(effective.min_qty, 1);
        assert_eq!(effective.unit_price, Decimal::from(10));
    }

    /// A selected tier wins over a cheaper quantity break
    #[test]
    fn test_selected_tier_wins() {
        let pricing = pricing(vec![
            tier(1, 10, 30, false),
            tier(100, 8, 45, true),
        ]);

        let effective = pricing.effective_tier().unwrap();
        assert_eq!(effective.min_qty, 100);
    }

    /// The snapshot surfaces the effective tier's lead time at the top
    /// level
    #[test]
    fn test_snapshot_surfaces_tier_lead_time() {
        let pricing = pricing(vec![
            tier(1, 10, 14, false),
            tier(100, 8, 45, false),
        ]);

        let snapshot = pricing.snapshot();
        assert_eq!(snapshot.lead_time_days, 14);
        assert_eq!(snapshot.unit_price, Decimal::from(10));
        assert_eq!(snapshot.tiers.len(), 2);
    }

    /// An empty tier list falls back to the economic lead time
    #[test]
    fn test_snapshot_without_tiers() {
        let snapshot = pricing(vec![]).snapshot();
        assert_eq!(snapshot.lead_time_days, 30);
        assert_eq!(snapshot.unit_price, Decimal::ZERO);
    }

    /// Two selected tiers violate the at-most-one invariant
    #[test]
    fn test_two_selected_tiers_rejected() {
        let tiers = vec![tier(1, 10, 30, true), tier(100, 8, 45, true)];
        assert!(validate_price_tiers(&tiers).is_err());
    }

    #[test]
    fn test_invalid_tier_quantities_rejected() {
        assert!(validate_price_tiers(&[tier(0, 10, 30, false)]).is_err());
        assert!(validate_price_tiers(&[tier(-5, 10, 30, false)]).is_err());
        assert!(validate_price_tiers(&[tier(1, 10, -1, false)]).is_err());
    }

    #[test]
    fn test_pricing_requires_positive_order_unit() {
        let mut bad = pricing(vec![tier(1, 10, 30, false)]);
        bad.order_unit_qty = 0;
        assert!(validate_pricing(&bad).is_err());
    }

    /// Absent policy rows mean the system defaults
    #[test]
    fn test_policy_defaults() {
        let policy = ReplenishmentPolicy::defaults("SKU-1");
        assert_eq!(policy.safety_stock_days, 1.0);
        assert!(!policy.auto_replenish_enabled);
        assert_eq!(policy.lead_time_mode, LeadTimeMode::Economic);
        assert!(policy.forecast_overrides.is_empty());
        assert!(validate_policy(&policy).is_ok());
    }

    /// Automation needs a trigger time to be schedulable
    #[test]
    fn test_auto_enabled_requires_time() {
        let mut policy = ReplenishmentPolicy::defaults("SKU-1");
        policy.auto_replenish_enabled = true;
        assert!(validate_policy(&policy).is_err());

        policy.auto_replenish_time = Some("02:30".to_string());
        assert!(validate_policy(&policy).is_ok());
    }

    #[test]
    fn test_auto_time_format() {
        assert!(validate_auto_time("00:00").is_ok());
        assert!(validate_auto_time("23:59").is_ok());
        assert!(validate_auto_time("24:00").is_err());
        assert!(validate_auto_time("12:60").is_err());
        assert!(validate_auto_time("9:30").is_err());
        assert!(validate_auto_time("nine thirty").is_err());
    }

    #[test]
    fn test_ratio_adjustment_bounds() {
        let mut policy = ReplenishmentPolicy::defaults("SKU-1");
        policy.ratio_adjustment_pct = -150.0;
        assert!(validate_policy(&policy).is_err());

        policy.ratio_adjustment_pct = 25.0;
        assert!(validate_policy(&policy).is_ok());
    }

    /// Override maps serialize with "YYYY-MM" string keys and round-trip
    #[test]
    fn test_override_map_round_trip() {
        let mut policy = ReplenishmentPolicy::defaults("SKU-1");
        policy
            .forecast_overrides
            .insert(YearMonth::new(2026, 7).unwrap(), 40);

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["forecast_overrides"]["2026-07"], 40);

        let parsed: ReplenishmentPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(
            parsed.forecast_overrides,
            policy.forecast_overrides
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for tier lists with no selected mark
    fn unselected_tiers_strategy() -> impl Strategy<Value = Vec<PriceTier>> {
        prop::collection::vec((1i64..10_000, 1i64..500, 0i32..90), 1..8).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(min_qty, price, lead)| tier(min_qty, price, lead, false))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Without a selected mark, the effective tier is always the
        /// lowest quantity break in the list
        #[test]
        fn prop_effective_tier_is_lowest_min_qty(tiers in unselected_tiers_strategy()) {
            let pricing = pricing(tiers.clone());
            let effective = pricing.effective_tier().unwrap();

            let lowest = tiers.iter().map(|t| t.min_qty).min().unwrap();
            prop_assert_eq!(effective.min_qty, lowest);
        }

        /// The snapshot's top-level lead time always matches the
        /// effective tier when one exists
        #[test]
        fn prop_snapshot_lead_time_matches_effective(tiers in unselected_tiers_strategy()) {
            let pricing = pricing(tiers);
            let effective_lead = pricing.effective_tier().unwrap().lead_time_days;
            prop_assert_eq!(pricing.snapshot().lead_time_days, effective_lead);
        }

        /// Override maps survive a JSON round-trip untouched
        #[test]
        fn prop_override_map_json_round_trip(
            entries in prop::collection::vec((2020i32..2030, 1u32..=12, 0i64..10_000), 0..12),
        ) {
            let mut overrides = BTreeMap::new();
            for (year, month, qty) in entries {
                overrides.insert(YearMonth::new(year, month).unwrap(), qty);
            }

            let json = serde_json::to_string(&overrides).unwrap();
            let parsed: BTreeMap<YearMonth, i64> = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, overrides);
        }
    }
}
