//! Supplier pricing models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity break in a supplier's price schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub min_qty: i64,
    pub unit_price: Decimal,
    pub lead_time_days: i32,
    #[serde(default)]
    pub is_selected: bool,
}

/// A supplier's pricing schedule for a SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPricing {
    pub supplier_code: String,
    pub lead_time_fast_days: i32,
    pub lead_time_economic_days: i32,
    pub min_order_qty: i64,
    pub order_unit_qty: i64,
    pub price_tiers: Vec<PriceTier>,
}

impl SupplierPricing {
    /// The tier an order would be priced at.
    ///
    /// At most one tier carries the selected mark; when none does, the
    /// lowest-min-qty tier is the effective default.
    pub fn effective_tier(&self) -> Option<&PriceTier> {
        self.price_tiers
            .iter()
            .find(|t| t.is_selected)
            .or_else(|| self.price_tiers.iter().min_by_key(|t| t.min_qty))
    }

    /// Pricing as captured on a procurement proposal, with the effective
    /// tier's lead time surfaced at the top level for downstream display
    /// and ordering.
    pub fn snapshot(&self) -> PricingSnapshot {
        let tier = self.effective_tier();
        PricingSnapshot {
            supplier_code: self.supplier_code.clone(),
            lead_time_days: tier
                .map(|t| t.lead_time_days)
                .unwrap_or(self.lead_time_economic_days),
            unit_price: tier.map(|t| t.unit_price).unwrap_or(Decimal::ZERO),
            min_qty: tier.map(|t| t.min_qty).unwrap_or(self.min_order_qty),
            tiers: self.price_tiers.clone(),
        }
    }
}

/// Immutable pricing snapshot stored on a procurement proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub supplier_code: String,
    pub lead_time_days: i32,
    pub unit_price: Decimal,
    pub min_qty: i64,
    pub tiers: Vec<PriceTier>,
}
