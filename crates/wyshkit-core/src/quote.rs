//! # Order Quote
//!
//! Puts the resolvers together into the summary shown beside the "Add to
//! cart" button.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteRequest { quantity, add-on ids, distance, surge? }                │
//! │        │                                                                │
//! │        ├──► TierTable::resolve ──────────────► items subtotal, savings  │
//! │        ├──► TierTable::next_tier ────────────► nudge                    │
//! │        ├──► calculate_add_ons ───────────────► add-ons total            │
//! │        │                                                                │
//! │        └──► DeliveryFeeSchedule::resolve_with_surge(items + add-ons)    │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │   total = items subtotal + add-ons total + delivery fee                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use wyshkit_core::quote::{build_quote, QuoteRequest};
//! use wyshkit_core::{DeliveryFeeSchedule, Money, PricingTier, TierTable};
//!
//! let table = TierTable::new(vec![
//!     PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
//!     PricingTier::new(10, Some(49), Money::from_paise(900), 10),
//!     PricingTier::new(50, None, Money::from_paise(800), 20),
//! ])?;
//!
//! let summary = build_quote(&table, &DeliveryFeeSchedule::default(), &[], &QuoteRequest::new(25));
//! assert_eq!(summary.items_subtotal.paise(), 22500);
//! assert_eq!(summary.delivery_fee.paise(), 8000);
//! assert_eq!(summary.total.paise(), 30500);
//! assert_eq!(summary.savings_message.as_deref(), Some("You save ₹25 on this order"));
//! # Ok::<(), wyshkit_core::CoreError>(())
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::addons::calculate_add_ons;
use crate::delivery::DeliveryFeeSchedule;
use crate::money::Money;
use crate::pricing::TierTable;
use crate::surge::{Surge, SurgeContext};
use crate::types::AddOn;

const CUSTOMIZATION_WARNING: &str =
    "This order includes customization. Once you approve the preview, the order cannot be cancelled or refunded.";

/// What the customer has picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub quantity: u32,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
    /// Kilometres; 0 when unknown.
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub surge: Option<SurgeContext>,
}

impl QuoteRequest {
    pub fn new(quantity: u32) -> Self {
        QuoteRequest {
            quantity,
            add_on_ids: Vec::new(),
            distance_km: 0.0,
            surge: None,
        }
    }

    pub fn with_add_ons(mut self, ids: Vec<String>) -> Self {
        self.add_on_ids = ids;
        self
    }

    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance_km = km;
        self
    }

    pub fn with_surge(mut self, context: SurgeContext) -> Self {
        self.surge = Some(context);
        self
    }
}

/// Full price breakdown for one product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    pub quantity: u32,
    pub price_per_item: Money,
    pub items_subtotal: Money,
    pub discount_percent: u8,

    pub add_ons_total: Money,

    pub delivery_fee: Money,
    pub delivery_message: String,
    pub is_free_delivery: bool,
    /// Present only when a surge raised the delivery fee.
    pub surge: Option<Surge>,

    pub has_customization: bool,
    pub customization_warning: Option<String>,

    pub total: Money,

    pub total_savings: Money,
    pub savings_message: Option<String>,

    pub next_tier_message: Option<String>,
}

/// Builds the order summary.
///
/// Delivery is priced on items plus add-ons. Unknown or still-locked add-on
/// ids are not charged.
pub fn build_quote(
    table: &TierTable,
    schedule: &DeliveryFeeSchedule,
    add_ons: &[AddOn],
    request: &QuoteRequest,
) -> OrderSummary {
    let price = table.resolve(request.quantity);
    let next = table.next_tier(request.quantity);
    let selection = calculate_add_ons(request.add_on_ids.as_slice(), add_ons, request.quantity);

    let surge = request
        .surge
        .as_ref()
        .map_or_else(Surge::none, SurgeContext::evaluate);

    let cart_subtotal = price.subtotal + selection.total;
    let delivery = schedule.resolve_with_surge(cart_subtotal, request.distance_km, &surge);

    let has_customization = selection.has_customization();
    let surge_applied = surge.is_active() && delivery.fee.is_positive();

    OrderSummary {
        quantity: request.quantity,
        price_per_item: price.price_per_item,
        items_subtotal: price.subtotal,
        discount_percent: price.discount_percent,
        add_ons_total: selection.total,
        delivery_fee: delivery.fee,
        delivery_message: delivery.message,
        is_free_delivery: delivery.is_free,
        surge: surge_applied.then_some(surge),
        has_customization,
        customization_warning: has_customization.then(|| CUSTOMIZATION_WARNING.to_string()),
        total: cart_subtotal + delivery.fee,
        total_savings: price.savings,
        savings_message: price
            .savings
            .is_positive()
            .then(|| format!("You save {} on this order", price.savings)),
        next_tier_message: next.message,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
