//! # Domain Types
//!
//! Catalog-side data the resolvers consume. Everything here is defined by a
//! seller or an admin, fetched once per product view and then read-only.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │  PricingTier    │   │ DeliveryFeeTier  │   │     AddOn       │      │
//! │  │  ─────────────  │   │ ───────────────  │   │  ─────────────  │      │
//! │  │  min_qty        │   │ order_value_min  │   │  price          │      │
//! │  │  max_qty?       │   │ order_value_max? │   │  kind           │      │
//! │  │  price_per_item │   │ fee_amount       │   │  minimum_order? │      │
//! │  │  discount_%     │   │ priority         │   └─────────────────┘      │
//! │  └─────────────────┘   └──────────────────┘                            │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌─────────────────┐                             │
//! │  │ DeliveryTimeTier │  │  DistanceBand   │                             │
//! │  │ min/max qty      │  │  max_km?        │                             │
//! │  │ delivery_days    │  │  surcharge      │                             │
//! │  └──────────────────┘  └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire names are camelCase to match the catalog JSON.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bands::Band;
use crate::money::Money;

// =============================================================================
// Pricing Tier
// =============================================================================

/// A quantity band with its unit price.
///
/// `max_qty == None` means the band is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingTier {
    /// Smallest quantity in this band (≥ 1).
    pub min_qty: u32,

    /// Largest quantity in this band, inclusive.
    pub max_qty: Option<u32>,

    /// Unit price in paise.
    pub price_per_item: Money,

    /// Seller-stated discount versus the first tier.
    pub discount_percent: u8,
}

impl PricingTier {
    /// Creates a tier.
    pub fn new(min_qty: u32, max_qty: Option<u32>, price_per_item: Money, discount_percent: u8) -> Self {
        PricingTier {
            min_qty,
            max_qty,
            price_per_item,
            discount_percent,
        }
    }

    /// Checks whether `quantity` falls inside this band.
    #[inline]
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_qty && self.max_qty.map_or(true, |max| quantity <= max)
    }

    /// Whether this band has no upper bound.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.max_qty.is_none()
    }

    /// Short range label used on product pages: `"1-9"` or `"50+"`.
    ///
    /// ```rust
    /// use wyshkit_core::{Money, PricingTier};
    ///
    /// let tier = PricingTier::new(50, None, Money::from_paise(800), 20);
    /// assert_eq!(tier.range_label(), "50+");
    /// ```
    pub fn range_label(&self) -> String {
        match self.max_qty {
            Some(max) => format!("{}-{}", self.min_qty, max),
            None => format!("{}+", self.min_qty),
        }
    }

    /// Discount implied by the price difference from `base_price`, rounded to
    /// the nearest whole percent.
    ///
    /// Returns 0 when the base price is not positive or this tier is dearer.
    pub fn derived_discount_percent(&self, base_price: Money) -> u8 {
        if !base_price.is_positive() || self.price_per_item >= base_price {
            return 0;
        }
        let diff = (base_price - self.price_per_item).paise() as i128;
        let base = base_price.paise() as i128;
        ((diff * 100 + base / 2) / base).min(100) as u8
    }
}

impl Band for PricingTier {
    type Key = u32;

    fn lower(&self) -> u32 {
        self.min_qty
    }

    fn upper(&self) -> Option<u32> {
        self.max_qty
    }
}

// =============================================================================
// Delivery Fee Tier
// =============================================================================

/// A cart-subtotal band with its delivery fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryFeeTier {
    /// Rule identifier.
    pub id: String,

    /// Admin-facing name, e.g. "Tier 1: ₹0-999".
    pub rule_name: String,

    /// Smallest cart subtotal (paise) in this band.
    pub order_value_min: Money,

    /// Largest cart subtotal (paise), inclusive. `None` = unbounded.
    pub order_value_max: Option<Money>,

    /// Base fee for this band.
    pub fee_amount: Money,

    /// Start of the distance window the surcharge applies to.
    pub distance_min_km: Option<f64>,

    /// End of the distance window the surcharge applies to.
    pub distance_max_km: Option<f64>,

    /// Added to the fee when the delivery distance is inside the window.
    pub distance_surcharge: Money,

    /// Inactive tiers are ignored by the resolver.
    pub is_active: bool,

    /// Lower runs first.
    pub priority: u32,
}

impl DeliveryFeeTier {
    /// Creates an active tier with no distance surcharge.
    pub fn new(
        id: impl Into<String>,
        rule_name: impl Into<String>,
        order_value_min: Money,
        order_value_max: Option<Money>,
        fee_amount: Money,
        priority: u32,
    ) -> Self {
        DeliveryFeeTier {
            id: id.into(),
            rule_name: rule_name.into(),
            order_value_min,
            order_value_max,
            fee_amount,
            distance_min_km: None,
            distance_max_km: None,
            distance_surcharge: Money::zero(),
            is_active: true,
            priority,
        }
    }

    /// Sets the distance window and surcharge.
    pub fn with_distance_surcharge(mut self, min_km: f64, max_km: f64, surcharge: Money) -> Self {
        self.distance_min_km = Some(min_km);
        self.distance_max_km = Some(max_km);
        self.distance_surcharge = surcharge;
        self
    }

    /// Surcharge for `distance_km`, if the tier's window covers it.
    ///
    /// Both window ends must be set and the distance must be positive.
    pub fn surcharge_for(&self, distance_km: f64) -> Money {
        match (self.distance_min_km, self.distance_max_km) {
            (Some(min), Some(max)) if distance_km > 0.0 && distance_km >= min && distance_km <= max => {
                self.distance_surcharge
            }
            _ => Money::zero(),
        }
    }
}

impl Band for DeliveryFeeTier {
    type Key = Money;

    fn lower(&self) -> Money {
        self.order_value_min
    }

    fn upper(&self) -> Option<Money> {
        self.order_value_max
    }
}

// =============================================================================
// Distance Band
// =============================================================================

/// Schedule-wide distance surcharge band. Bands are checked in ascending
/// `max_km`; the first band whose `max_km` covers the distance wins, and a
/// band with `max_km == None` catches everything beyond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DistanceBand {
    /// Upper bound in km, inclusive.
    pub max_km: Option<f64>,

    /// Surcharge in paise.
    pub surcharge: Money,
}

impl DistanceBand {
    /// The storefront's standard bands: ≤5 km free, ≤10 km ₹30,
    /// ≤20 km ₹70, beyond ₹150.
    pub fn defaults() -> Vec<DistanceBand> {
        vec![
            DistanceBand { max_km: Some(5.0), surcharge: Money::zero() },
            DistanceBand { max_km: Some(10.0), surcharge: Money::from_paise(3000) },
            DistanceBand { max_km: Some(20.0), surcharge: Money::from_paise(7000) },
            DistanceBand { max_km: None, surcharge: Money::from_paise(15000) },
        ]
    }
}

// =============================================================================
// Add-ons
// =============================================================================

/// Whether an add-on is always offered or unlocks at a minimum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AddOnKind {
    /// Always available.
    Standard,
    /// Available once the order reaches `minimum_order`.
    Bulk,
}

impl Default for AddOnKind {
    fn default() -> Self {
        AddOnKind::Standard
    }
}

/// An optional extra charged per item (gift wrap, logo engraving, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price per item in paise.
    pub price: Money,
    #[serde(rename = "type", default)]
    pub kind: AddOnKind,
    /// MOQ for bulk add-ons.
    #[serde(default)]
    pub minimum_order: Option<u32>,
    /// Seller must show a preview before production.
    #[serde(default)]
    pub requires_preview: bool,
    /// Customer must upload a file (logo, artwork).
    #[serde(default)]
    pub requires_proof: bool,
}

impl AddOn {
    /// Whether the add-on can be ordered at `quantity`.
    pub fn is_unlocked(&self, quantity: u32) -> bool {
        match self.kind {
            AddOnKind::Standard => true,
            AddOnKind::Bulk => quantity >= self.minimum_order.unwrap_or(0),
        }
    }

    /// Items still needed to unlock a bulk add-on, `None` when already unlocked.
    ///
    /// ```rust
    /// use wyshkit_core::{AddOn, AddOnKind, Money};
    ///
    /// let engraving = AddOn {
    ///     id: "engrave".into(),
    ///     name: "Logo engraving".into(),
    ///     description: None,
    ///     price: Money::from_paise(2500),
    ///     kind: AddOnKind::Bulk,
    ///     minimum_order: Some(50),
    ///     requires_preview: true,
    ///     requires_proof: true,
    /// };
    /// assert_eq!(engraving.units_to_unlock(20), Some(30));
    /// assert_eq!(engraving.units_to_unlock(50), None);
    /// ```
    pub fn units_to_unlock(&self, quantity: u32) -> Option<u32> {
        if self.is_unlocked(quantity) {
            None
        } else {
            Some(self.minimum_order.unwrap_or(0) - quantity)
        }
    }
}

// =============================================================================
// Delivery Time Tier
// =============================================================================

/// Lead time by order size, e.g. 1-9 items "Same day", 50+ "5-7 days".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryTimeTier {
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub delivery_days: String,
}

impl Band for DeliveryTimeTier {
    type Key = u32;

    fn lower(&self) -> u32 {
        self.min_qty
    }

    fn upper(&self) -> Option<u32> {
        self.max_qty
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_contains() {
        let tier = PricingTier::new(10, Some(49), Money::from_paise(900), 10);
        assert!(!tier.contains(9));
        assert!(tier.contains(10));
        assert!(tier.contains(49));
        assert!(!tier.contains(50));

        let open = PricingTier::new(50, None, Money::from_paise(800), 20);
        assert!(open.contains(50));
        assert!(open.contains(u32::MAX));
        assert!(open.is_unbounded());
    }

    #[test]
    fn test_range_label() {
        assert_eq!(PricingTier::new(1, Some(9), Money::from_paise(1000), 0).range_label(), "1-9");
        assert_eq!(PricingTier::new(50, None, Money::from_paise(800), 20).range_label(), "50+");
    }

    #[test]
    fn test_derived_discount_percent() {
        let base = Money::from_paise(1000);
        assert_eq!(PricingTier::new(10, Some(49), Money::from_paise(900), 10).derived_discount_percent(base), 10);
        assert_eq!(PricingTier::new(10, Some(49), Money::from_paise(929), 7).derived_discount_percent(base), 7);
        assert_eq!(PricingTier::new(1, Some(9), Money::from_paise(1000), 0).derived_discount_percent(base), 0);
        assert_eq!(PricingTier::new(1, Some(9), Money::from_paise(1100), 0).derived_discount_percent(base), 0);
        assert_eq!(PricingTier::new(1, Some(9), Money::from_paise(900), 0).derived_discount_percent(Money::zero()), 0);
    }

    #[test]
    fn test_tier_json_wire_format() {
        let tier: PricingTier = serde_json::from_str(
            r#"{"minQty":50,"maxQty":null,"pricePerItem":800,"discountPercent":20}"#,
        )
        .unwrap();
        assert_eq!(tier, PricingTier::new(50, None, Money::from_paise(800), 20));
    }

    #[test]
    fn test_delivery_tier_surcharge_window() {
        let tier = DeliveryFeeTier::new("t1", "Tier 1", Money::zero(), None, Money::from_paise(8000), 1)
            .with_distance_surcharge(5.0, 15.0, Money::from_paise(2000));

        assert_eq!(tier.surcharge_for(0.0), Money::zero());
        assert_eq!(tier.surcharge_for(4.9), Money::zero());
        assert_eq!(tier.surcharge_for(5.0), Money::from_paise(2000));
        assert_eq!(tier.surcharge_for(15.0), Money::from_paise(2000));
        assert_eq!(tier.surcharge_for(15.1), Money::zero());

        let plain = DeliveryFeeTier::new("t2", "Tier 2", Money::zero(), None, Money::from_paise(5000), 2);
        assert_eq!(plain.surcharge_for(12.0), Money::zero());
    }

    #[test]
    fn test_add_on_unlock() {
        let wrap = AddOn {
            id: "wrap".into(),
            name: "Gift wrap".into(),
            description: None,
            price: Money::from_paise(4900),
            kind: AddOnKind::Standard,
            minimum_order: None,
            requires_preview: false,
            requires_proof: false,
        };
        assert!(wrap.is_unlocked(1));
        assert_eq!(wrap.units_to_unlock(1), None);

        let bulk = AddOn { kind: AddOnKind::Bulk, minimum_order: Some(25), ..wrap };
        assert!(!bulk.is_unlocked(24));
        assert_eq!(bulk.units_to_unlock(24), Some(1));
        assert!(bulk.is_unlocked(25));
    }

    #[test]
    fn test_add_on_json_uses_type_key() {
        let addon: AddOn = serde_json::from_str(
            r#"{"id":"engrave","name":"Engraving","price":2500,"type":"bulk","minimumOrder":50}"#,
        )
        .unwrap();
        assert_eq!(addon.kind, AddOnKind::Bulk);
        assert_eq!(addon.minimum_order, Some(50));
        assert!(!addon.requires_proof);
    }
}
