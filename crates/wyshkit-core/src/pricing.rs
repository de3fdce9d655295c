//! # Tiered Pricing
//!
//! Quantity-tiered unit pricing: the price a customer pays per item drops as
//! the order grows, and the product page nudges them toward the next band.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quantity Change on Product Page                      │
//! │                                                                         │
//! │  Catalog JSON ──► TierTable::new() ──► (sorted, non-empty)              │
//! │                          │                                              │
//! │          ┌───────────────┼──────────────────┐                           │
//! │          ▼               ▼                  ▼                           │
//! │   resolve(qty)     next_tier(qty)     breakpoints()                     │
//! │   CalculatedPrice  "Add 5 more to     "Save 10% on orders               │
//! │                     save 10%"          of 10+ items"                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use wyshkit_core::{Money, PricingTier, TierTable};
//!
//! let table = TierTable::new(vec![
//!     PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
//!     PricingTier::new(10, Some(49), Money::from_paise(900), 10),
//!     PricingTier::new(50, None, Money::from_paise(800), 20),
//! ])?;
//!
//! let price = table.resolve(25);
//! assert_eq!(price.price_per_item.paise(), 900);
//! assert_eq!(price.subtotal.paise(), 22500);
//! assert_eq!(price.savings.paise(), 2500);
//!
//! let next = table.next_tier(5);
//! assert_eq!(next.message.as_deref(), Some("Add 5 more to save 10%"));
//! # Ok::<(), wyshkit_core::CoreError>(())
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bands::select_band;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DeliveryTimeTier, PricingTier};
use crate::validation::validate_pricing_tiers;

// =============================================================================
// Tier Table
// =============================================================================

/// An ordered, non-empty set of pricing tiers for one product.
///
/// ## Invariants
/// - At least one tier (checked in [`TierTable::new`])
/// - Sorted ascending by `min_qty`
/// - Immutable once built
///
/// Gaps and overlaps are *not* rejected here: the catalog guarantees them
/// at write time and the resolver degrades gracefully if it slips. Use
/// [`TierTable::validated`] on the seller write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricingTier>", into = "Vec<PricingTier>")]
pub struct TierTable {
    tiers: Vec<PricingTier>,
}

impl TierTable {
    /// Builds a table, sorting tiers by `min_qty`.
    ///
    /// ## Errors
    /// [`CoreError::EmptyTierTable`] when `tiers` is empty.
    pub fn new(mut tiers: Vec<PricingTier>) -> CoreResult<Self> {
        if tiers.is_empty() {
            return Err(CoreError::EmptyTierTable);
        }
        tiers.sort_by_key(|tier| tier.min_qty);
        Ok(TierTable { tiers })
    }

    /// Builds a table and runs the full seller-side validation.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyTierTable`] when `tiers` is empty
    /// - [`CoreError::InvalidTierTable`] listing every problem found
    pub fn validated(tiers: Vec<PricingTier>) -> CoreResult<Self> {
        let table = TierTable::new(tiers)?;
        let report = validate_pricing_tiers(&table.tiers);
        if !report.is_valid() {
            return Err(CoreError::InvalidTierTable(report.issues));
        }
        Ok(table)
    }

    /// The tiers, sorted by `min_qty`.
    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    /// The first (base-price) tier.
    pub fn base_tier(&self) -> &PricingTier {
        // non-empty by construction
        &self.tiers[0]
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The tier that prices `quantity`.
    ///
    /// Covering tier first; otherwise the closest tier below; otherwise
    /// (quantity below every tier) the base tier.
    pub fn tier_for(&self, quantity: u32) -> &PricingTier {
        select_band(quantity, &self.tiers).unwrap_or_else(|| self.base_tier())
    }

    // =========================================================================
    // Price Resolver
    // =========================================================================

    /// Prices `quantity` items.
    ///
    /// ## Calculation
    /// ```text
    /// subtotal = tier.price_per_item × quantity
    /// savings  = max(0, (base.price_per_item − tier.price_per_item) × quantity)
    /// ```
    ///
    /// Never fails. A quantity of 0 prices at the base tier with a zero
    /// subtotal.
    pub fn resolve(&self, quantity: u32) -> CalculatedPrice {
        let tier = self.tier_for(quantity);
        let base_price = self.base_tier().price_per_item;

        let subtotal = tier.price_per_item.multiply_quantity(quantity);
        let savings = (base_price - tier.price_per_item)
            .multiply_quantity(quantity)
            .non_negative();

        CalculatedPrice {
            quantity,
            price_per_item: tier.price_per_item,
            subtotal,
            discount_percent: tier.discount_percent,
            applied_tier: tier.clone(),
            savings,
        }
    }

    // =========================================================================
    // Next Tier Advisor
    // =========================================================================

    /// Finds the next cheaper band above `quantity` and phrases the nudge.
    ///
    /// ## User Workflow
    /// ```text
    /// Quantity: 5 (tier 1-9, 0% off)
    ///      │
    ///      ▼
    /// next_tier(5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Next: 10-49 @ 10% off → "Add 5 more to save 10%"
    /// ```
    ///
    /// The percentage is the *additional* discount over the current tier,
    /// floored at 0.
    pub fn next_tier(&self, quantity: u32) -> NextTierInfo {
        let current = self.tier_for(quantity);

        // Sorted, so the first match is the smallest min_qty
        let Some(next) = self.tiers.iter().find(|tier| tier.min_qty > quantity) else {
            return NextTierInfo::none();
        };

        let quantity_needed = next.min_qty - quantity;
        let extra_discount = next.discount_percent.saturating_sub(current.discount_percent);

        NextTierInfo {
            has_next_tier: true,
            next_tier: Some(next.clone()),
            quantity_needed: Some(quantity_needed),
            message: Some(format!(
                "Add {} more to save {}%",
                quantity_needed, extra_discount
            )),
        }
    }

    // =========================================================================
    // Breakpoints
    // =========================================================================

    /// Every tier with its display label and savings line, for the
    /// "bulk pricing" panel.
    pub fn breakpoints(&self) -> Vec<TierBreakpoint> {
        self.tiers
            .iter()
            .map(|tier| TierBreakpoint {
                min_qty: tier.min_qty,
                max_qty: tier.max_qty,
                price_per_item: tier.price_per_item,
                discount_percent: tier.discount_percent,
                range_label: tier.range_label(),
                savings_message: (tier.discount_percent > 0).then(|| {
                    format!(
                        "Save {}% on orders of {}+ items",
                        tier.discount_percent, tier.min_qty
                    )
                }),
            })
            .collect()
    }
}

impl TryFrom<Vec<PricingTier>> for TierTable {
    type Error = CoreError;

    fn try_from(tiers: Vec<PricingTier>) -> CoreResult<Self> {
        TierTable::new(tiers)
    }
}

impl From<TierTable> for Vec<PricingTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

// =============================================================================
// Default Tiers
// =============================================================================

/// Starter tiers offered to a seller during onboarding.
///
/// | Band   | Price       | Discount |
/// |--------|-------------|----------|
/// | 1-9    | base        | 0%       |
/// | 10-49  | base × 0.93 | 7%       |
/// | 50-99  | base × 0.87 | 13%      |
/// | 100+   | base × 0.80 | 20%      |
///
/// ```rust
/// use wyshkit_core::{pricing::default_tiers, Money};
///
/// let table = default_tiers(Money::from_paise(50000));
/// assert_eq!(table.len(), 4);
/// assert_eq!(table.resolve(100).price_per_item.paise(), 40000);
/// ```
pub fn default_tiers(base_price: Money) -> TierTable {
    TierTable {
        tiers: vec![
            PricingTier::new(1, Some(9), base_price, 0),
            PricingTier::new(10, Some(49), base_price.scale_percent(93), 7),
            PricingTier::new(50, Some(99), base_price.scale_percent(87), 13),
            PricingTier::new(100, None, base_price.scale_percent(80), 20),
        ],
    }
}

// =============================================================================
// Lead Times
// =============================================================================

/// Lead-time band for `quantity`, using the same band rule as pricing.
pub fn lead_time_for(quantity: u32, tiers: &[DeliveryTimeTier]) -> Option<&DeliveryTimeTier> {
    select_band(quantity, tiers)
}

// =============================================================================
// Results
// =============================================================================

/// Result of pricing a quantity. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CalculatedPrice {
    pub quantity: u32,
    pub price_per_item: Money,
    /// `price_per_item × quantity`
    pub subtotal: Money,
    pub discount_percent: u8,
    pub applied_tier: PricingTier,
    /// Versus paying the base-tier price for the same quantity.
    pub savings: Money,
}

/// Next-tier nudge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NextTierInfo {
    pub has_next_tier: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub next_tier: Option<PricingTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quantity_needed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl NextTierInfo {
    fn none() -> Self {
        NextTierInfo {
            has_next_tier: false,
            next_tier: None,
            quantity_needed: None,
            message: None,
        }
    }
}

/// One row of the bulk-pricing panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierBreakpoint {
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub price_per_item: Money,
    pub discount_percent: u8,
    pub range_label: String,
    pub savings_message: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TierTable {
        TierTable::new(vec![
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(10, Some(49), Money::from_paise(900), 10),
            PricingTier::new(50, None, Money::from_paise(800), 20),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(TierTable::new(vec![]), Err(CoreError::EmptyTierTable)));
    }

    #[test]
    fn test_new_sorts_by_min_qty() {
        let table = TierTable::new(vec![
            PricingTier::new(50, None, Money::from_paise(800), 20),
            PricingTier::new(1, Some(49), Money::from_paise(1000), 0),
        ])
        .unwrap();
        assert_eq!(table.base_tier().min_qty, 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_resolve_mid_tier() {
        let price = sample().resolve(25);
        assert_eq!(price.price_per_item, Money::from_paise(900));
        assert_eq!(price.subtotal, Money::from_paise(22500));
        assert_eq!(price.discount_percent, 10);
        assert_eq!(price.savings, Money::from_paise(2500));
        assert_eq!(price.applied_tier.min_qty, 10);
    }

    #[test]
    fn test_next_tier_binding_marks_omitted_fields_optional() {
        let decl = NextTierInfo::decl();
        assert!(decl.contains("hasNextTier: boolean"));
        assert!(decl.contains("nextTier?: PricingTier"));
        assert!(decl.contains("quantityNeeded?: number"));
        assert!(decl.contains("message?: string"));
    }

    #[test]
    fn test_resolve_max_quantity_saturates() {
        let table = TierTable::new(vec![PricingTier::new(1, None, Money::from_paise(3_000_000_000), 0)]).unwrap();
        let price = table.resolve(u32::MAX);
        assert_eq!(price.subtotal, Money::from_paise(i64::MAX));
        assert_eq!(price.savings, Money::zero());

        let table = TierTable::new(vec![
            PricingTier::new(1, Some(1), Money::from_paise(3_000_000_000), 0),
            PricingTier::new(2, None, Money::from_paise(1), 99),
        ])
        .unwrap();
        let price = table.resolve(u32::MAX);
        assert_eq!(price.subtotal, Money::from_paise(u32::MAX as i64));
        assert_eq!(price.savings, Money::from_paise(i64::MAX));
    }

    #[test]
    fn test_resolve_base_tier() {
        let price = sample().resolve(5);
        assert_eq!(price.price_per_item, Money::from_paise(1000));
        assert_eq!(price.subtotal, Money::from_paise(5000));
        assert_eq!(price.discount_percent, 0);
        assert_eq!(price.savings, Money::zero());
    }

    #[test]
    fn test_every_quantity_in_band_gets_band_price() {
        let table = sample();
        for tier in table.tiers() {
            let upper = tier.max_qty.unwrap_or(tier.min_qty + 200);
            for q in tier.min_qty..=upper {
                let price = table.resolve(q);
                assert_eq!(price.price_per_item, tier.price_per_item, "qty {q}");
                assert_eq!(price.subtotal, price.price_per_item * q, "qty {q}");
            }
        }
    }

    #[test]
    fn test_unit_price_never_rises_with_quantity() {
        let table = sample();
        let mut last = table.resolve(1).price_per_item;
        for q in 2..=300 {
            let current = table.resolve(q).price_per_item;
            assert!(current <= last, "price rose at qty {q}");
            last = current;
        }
    }

    #[test]
    fn test_resolve_is_pure() {
        let table = sample();
        assert_eq!(table.resolve(37), table.resolve(37));
    }

    #[test]
    fn test_resolve_falls_back_across_gap() {
        let table = TierTable::new(vec![
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(10, Some(49), Money::from_paise(900), 10),
        ])
        .unwrap();
        let price = table.resolve(80);
        assert_eq!(price.price_per_item, Money::from_paise(900));
        assert_eq!(price.subtotal, Money::from_paise(72000));
    }

    #[test]
    fn test_resolve_below_first_tier_uses_base() {
        let table = TierTable::new(vec![
            PricingTier::new(5, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(10, None, Money::from_paise(900), 10),
        ])
        .unwrap();
        let price = table.resolve(2);
        assert_eq!(price.price_per_item, Money::from_paise(1000));
        assert_eq!(price.savings, Money::zero());

        let zero = table.resolve(0);
        assert_eq!(zero.subtotal, Money::zero());
    }

    #[test]
    fn test_savings_clamped_when_tier_dearer_than_base() {
        let table = TierTable::new(vec![
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(10, None, Money::from_paise(1200), 0),
        ])
        .unwrap();
        assert_eq!(table.resolve(20).savings, Money::zero());
    }

    #[test]
    fn test_next_tier_message() {
        let next = sample().next_tier(5);
        assert!(next.has_next_tier);
        assert_eq!(next.quantity_needed, Some(5));
        assert_eq!(next.message.as_deref(), Some("Add 5 more to save 10%"));
        assert_eq!(next.next_tier.map(|t| t.min_qty), Some(10));
    }

    #[test]
    fn test_next_tier_reports_extra_discount() {
        let next = sample().next_tier(12);
        assert_eq!(next.message.as_deref(), Some("Add 38 more to save 10%"));
    }

    #[test]
    fn test_no_next_tier_in_unbounded_band() {
        let table = sample();
        for q in [50, 51, 1000] {
            let next = table.next_tier(q);
            assert!(!next.has_next_tier);
            assert!(next.message.is_none());
        }
        for q in [1, 9, 10, 49] {
            assert!(table.next_tier(q).has_next_tier, "qty {q}");
        }
    }

    #[test]
    fn test_next_tier_serializes_without_empty_fields() {
        let json = serde_json::to_value(sample().next_tier(60)).unwrap();
        assert_eq!(json, serde_json::json!({ "hasNextTier": false }));
    }

    #[test]
    fn test_breakpoints() {
        let rows = sample().breakpoints();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].savings_message, None);
        assert_eq!(rows[0].range_label, "1-9");
        assert_eq!(
            rows[2].savings_message.as_deref(),
            Some("Save 20% on orders of 50+ items")
        );
        assert_eq!(rows[2].range_label, "50+");
    }

    #[test]
    fn test_default_tiers() {
        let table = default_tiers(Money::from_paise(999));
        let prices: Vec<i64> = table.tiers().iter().map(|t| t.price_per_item.paise()).collect();
        assert_eq!(prices, vec![999, 929, 869, 799]);
        assert!(validate_pricing_tiers(table.tiers()).is_valid());
    }

    #[test]
    fn test_table_deserializes_from_catalog_json() {
        let table: TierTable = serde_json::from_str(
            r#"[{"minQty":10,"maxQty":null,"pricePerItem":900,"discountPercent":10},
                {"minQty":1,"maxQty":9,"pricePerItem":1000,"discountPercent":0}]"#,
        )
        .unwrap();
        assert_eq!(table.base_tier().min_qty, 1);

        let empty: Result<TierTable, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }

    #[test]
    fn test_validated_rejects_gaps() {
        let result = TierTable::validated(vec![
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(20, None, Money::from_paise(900), 10),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidTierTable(_))));
    }

    #[test]
    fn test_lead_time_for() {
        let tiers = vec![
            DeliveryTimeTier { min_qty: 1, max_qty: Some(9), delivery_days: "Same day".into() },
            DeliveryTimeTier { min_qty: 10, max_qty: None, delivery_days: "5-7 days".into() },
        ];
        assert_eq!(lead_time_for(3, &tiers).map(|t| t.delivery_days.as_str()), Some("Same day"));
        assert_eq!(lead_time_for(80, &tiers).map(|t| t.delivery_days.as_str()), Some("5-7 days"));
        assert_eq!(lead_time_for(0, &tiers), None);
    }
}
