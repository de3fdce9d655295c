//! # Validation Module
//!
//! Seller-side and operator-side checks for pricing data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Seller form / admin panel                                    │
//! │  ├── THIS MODULE: tier-table and fee-schedule rules                    │
//! │  └── Every issue reported at once                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: wyshkit-db (replace_tiers)                                   │
//! │  └── Refuses to store a table that fails layer 1                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Resolvers                                                    │
//! │  └── Never fail; fall back to the closest band on bad data             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wyshkit_core::validation::{validate_pricing_tiers, validate_quantity};
//! use wyshkit_core::{Money, PricingTier};
//!
//! let report = validate_pricing_tiers(&[
//!     PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
//!     PricingTier::new(10, None, Money::from_paise(900), 10),
//! ]);
//! assert!(report.is_valid());
//!
//! assert!(validate_quantity(0).is_err());
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::commission::{CommissionBook, CommissionRuleKind};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DeliveryFeeTier, PricingTier};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICING_TIERS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Stated discounts may drift this many points from the price-derived one
/// (rounding on the seller form).
const DISCOUNT_TOLERANCE: u8 = 1;

/// Fee-schedule bands are written in whole rupees ("₹0-999", "₹1000-2499"),
/// so the next band may start up to one rupee after the previous one ends.
const DELIVERY_BAND_STEP: Money = Money::from_paise(100);

// =============================================================================
// Report
// =============================================================================

/// Every issue found in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport<I> {
    pub issues: Vec<I>,
}

impl<I> ValidationReport<I> {
    /// No issues found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

// =============================================================================
// Pricing Tier Issues
// =============================================================================

/// A problem with a seller's tier table. Tier numbers are 1-based positions
/// after sorting by `min_qty`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TierIssue {
    #[error("At least one pricing tier is required")]
    Empty,

    #[error("At most {max} pricing tiers are allowed (got {count})")]
    TooMany { count: usize, max: usize },

    #[error("First pricing tier must start at quantity 1 (starts at {min_qty})")]
    FirstTierNotAtOne { min_qty: u32 },

    #[error("Tier {tier} price must be positive")]
    NonPositivePrice { tier: usize },

    #[error("Tier {tier} max quantity is below its min quantity")]
    MaxBelowMin { tier: usize },

    #[error("Gap between tier {tier} and tier {}", .tier + 1)]
    Gap { tier: usize },

    #[error("Tier {tier} overlaps tier {}", .tier + 1)]
    Overlap { tier: usize },

    #[error("Only the last tier may be open-ended (tier {tier} has no max quantity)")]
    UnboundedNotLast { tier: usize },

    #[error("Last tier must be open-ended (no max quantity)")]
    LastTierBounded,

    #[error("Tier {tier} price must be lower than tier {}", .tier - 1)]
    PriceNotDecreasing { tier: usize },

    #[error("Tier {tier} discount must be between 0 and 100 (got {discount})")]
    DiscountOutOfRange { tier: usize, discount: u8 },

    #[error("Tier {tier} states {stated}% off but its price is {derived}% off the base price")]
    DiscountMismatch { tier: usize, stated: u8, derived: u8 },
}

/// Checks a tier table the way the seller form does.
///
/// ## Rules
/// - 1 to [`MAX_PRICING_TIERS`] tiers
/// - First tier starts at 1
/// - Contiguous: each tier starts right after the previous one ends
/// - Only the last tier is open-ended, and it must be
/// - Unit prices are positive and strictly decreasing
/// - Stated discount within 1 point of the price-derived discount
///
/// Input order does not matter; tiers are checked sorted by `min_qty`.
pub fn validate_pricing_tiers(tiers: &[PricingTier]) -> ValidationReport<TierIssue> {
    let mut issues = Vec::new();

    if tiers.is_empty() {
        issues.push(TierIssue::Empty);
        return ValidationReport { issues };
    }

    if tiers.len() > MAX_PRICING_TIERS {
        issues.push(TierIssue::TooMany {
            count: tiers.len(),
            max: MAX_PRICING_TIERS,
        });
    }

    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by_key(|tier| tier.min_qty);

    if sorted[0].min_qty != 1 {
        issues.push(TierIssue::FirstTierNotAtOne {
            min_qty: sorted[0].min_qty,
        });
    }

    let base_price = sorted[0].price_per_item;
    let last = sorted.len() - 1;

    for (index, tier) in sorted.iter().enumerate() {
        let number = index + 1;

        if !tier.price_per_item.is_positive() {
            issues.push(TierIssue::NonPositivePrice { tier: number });
        }

        if tier.max_qty.is_some_and(|max| max < tier.min_qty) {
            issues.push(TierIssue::MaxBelowMin { tier: number });
        }

        if tier.discount_percent > 100 {
            issues.push(TierIssue::DiscountOutOfRange {
                tier: number,
                discount: tier.discount_percent,
            });
        } else {
            let derived = tier.derived_discount_percent(base_price);
            if tier.discount_percent.abs_diff(derived) > DISCOUNT_TOLERANCE {
                issues.push(TierIssue::DiscountMismatch {
                    tier: number,
                    stated: tier.discount_percent,
                    derived,
                });
            }
        }

        if index > 0 && tier.price_per_item >= sorted[index - 1].price_per_item {
            issues.push(TierIssue::PriceNotDecreasing { tier: number });
        }

        if index == last {
            if !tier.is_unbounded() {
                issues.push(TierIssue::LastTierBounded);
            }
            continue;
        }

        let next = sorted[index + 1];
        match tier.max_qty {
            None => issues.push(TierIssue::UnboundedNotLast { tier: number }),
            Some(max) if next.min_qty > max.saturating_add(1) => {
                issues.push(TierIssue::Gap { tier: number })
            }
            Some(max) if next.min_qty <= max => issues.push(TierIssue::Overlap { tier: number }),
            Some(_) => {}
        }
    }

    ValidationReport { issues }
}

// =============================================================================
// Delivery Schedule Issues
// =============================================================================

/// A problem with the admin's delivery fee schedule, named by rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeliveryIssue {
    #[error("At least one active delivery fee tier is required")]
    Empty,

    #[error("{rule}: fee cannot be negative")]
    NegativeFee { rule: String },

    #[error("{rule}: distance surcharge cannot be negative")]
    NegativeSurcharge { rule: String },

    #[error("{rule}: max order value is below its min order value")]
    MaxBelowMin { rule: String },

    #[error("{rule}: distance window is empty or inverted")]
    InvalidDistanceWindow { rule: String },

    #[error("Gap between {rule} and {next}")]
    Gap { rule: String, next: String },

    #[error("{rule} overlaps {next}")]
    Overlap { rule: String, next: String },
}

/// Checks a delivery fee schedule.
///
/// Per-tier checks cover every tier. Continuity (gaps and overlaps) only
/// considers active tiers, sorted by `order_value_min`, since inactive
/// tiers never take part in resolution.
pub fn validate_delivery_schedule(tiers: &[DeliveryFeeTier]) -> ValidationReport<DeliveryIssue> {
    let mut issues = Vec::new();

    for tier in tiers {
        let rule = || tier.rule_name.clone();

        if tier.fee_amount.is_negative() {
            issues.push(DeliveryIssue::NegativeFee { rule: rule() });
        }
        if tier.distance_surcharge.is_negative() {
            issues.push(DeliveryIssue::NegativeSurcharge { rule: rule() });
        }
        if tier.order_value_max.is_some_and(|max| max < tier.order_value_min) {
            issues.push(DeliveryIssue::MaxBelowMin { rule: rule() });
        }
        if let (Some(min), Some(max)) = (tier.distance_min_km, tier.distance_max_km) {
            if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
                issues.push(DeliveryIssue::InvalidDistanceWindow { rule: rule() });
            }
        }
    }

    let mut active: Vec<&DeliveryFeeTier> = tiers.iter().filter(|tier| tier.is_active).collect();
    if active.is_empty() {
        issues.push(DeliveryIssue::Empty);
        return ValidationReport { issues };
    }
    active.sort_by_key(|tier| tier.order_value_min);

    for pair in active.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let Some(max) = current.order_value_max else {
            // Open-ended band swallows everything after it
            issues.push(DeliveryIssue::Overlap {
                rule: current.rule_name.clone(),
                next: next.rule_name.clone(),
            });
            continue;
        };

        if next.order_value_min > max.saturating_add(DELIVERY_BAND_STEP) {
            issues.push(DeliveryIssue::Gap {
                rule: current.rule_name.clone(),
                next: next.rule_name.clone(),
            });
        } else if next.order_value_min <= max {
            issues.push(DeliveryIssue::Overlap {
                rule: current.rule_name.clone(),
                next: next.rule_name.clone(),
            });
        }
    }

    ValidationReport { issues }
}

// =============================================================================
// Commission Issues
// =============================================================================

/// A problem with the admin's commission rules. Rule numbers are 1-based
/// positions in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommissionIssue {
    #[error("At least one commission rule is required")]
    Empty,

    #[error("At least one active default commission rule is required")]
    NoActiveDefault,

    #[error("Rule {rule}: commission percent must be between 0 and 100 (got {percent})")]
    PercentOutOfRange { rule: usize, percent: u8 },

    #[error("Rule {rule}: order value min cannot be negative")]
    NegativeOrderValue { rule: usize },

    #[error("Rule {rule}: order value max must be greater than min")]
    OrderValueMaxBelowMin { rule: usize },

    #[error("Rule {rule}: order quantity max must be greater than min")]
    QuantityMaxBelowMin { rule: usize },

    #[error("Rule {rule}: vendor-specific rule must have a vendor id")]
    MissingVendor { rule: usize },

    #[error("Rule {rule}: category-specific rule must have a category id")]
    MissingCategory { rule: usize },

    #[error("Rule {rule}: volume-based rule must have minimum quantity > 0")]
    VolumeWithoutMinimum { rule: usize },

    #[error("Rule {rule}: effective until must be after effective from")]
    EmptyEffectiveWindow { rule: usize },

    #[error("Override {id}: commission percent must be between 0 and 100 (got {percent})")]
    OverridePercentOutOfRange { id: String, percent: u8 },
}

/// Checks a commission book.
///
/// ## Rules
/// - At least one rule, and at least one active default rule
/// - Percentages 0-100 (rules and overrides)
/// - Order value min non-negative; max not below min (same for quantity)
/// - Vendor rules name a vendor, category rules name a category
/// - Volume rules start above quantity 0
/// - `effective_until`, when set, is after `effective_from`
pub fn validate_commission_book(book: &CommissionBook) -> ValidationReport<CommissionIssue> {
    let mut issues = Vec::new();

    if book.rules.is_empty() {
        issues.push(CommissionIssue::Empty);
        return ValidationReport { issues };
    }

    let has_default = book
        .rules
        .iter()
        .any(|rule| rule.rule_type == CommissionRuleKind::Default && rule.is_active);
    if !has_default {
        issues.push(CommissionIssue::NoActiveDefault);
    }

    let blank = |id: &Option<String>| id.as_deref().map_or(true, |id| id.trim().is_empty());

    for (index, rule) in book.rules.iter().enumerate() {
        let n = index + 1;

        if rule.commission_percent > 100 {
            issues.push(CommissionIssue::PercentOutOfRange { rule: n, percent: rule.commission_percent });
        }
        if rule.order_value_min.is_negative() {
            issues.push(CommissionIssue::NegativeOrderValue { rule: n });
        }
        if rule.order_value_max.is_some_and(|max| max < rule.order_value_min) {
            issues.push(CommissionIssue::OrderValueMaxBelowMin { rule: n });
        }
        if rule.order_quantity_max.is_some_and(|max| max < rule.order_quantity_min) {
            issues.push(CommissionIssue::QuantityMaxBelowMin { rule: n });
        }
        match rule.rule_type {
            CommissionRuleKind::Vendor if blank(&rule.vendor_id) => {
                issues.push(CommissionIssue::MissingVendor { rule: n });
            }
            CommissionRuleKind::Category if blank(&rule.category_id) => {
                issues.push(CommissionIssue::MissingCategory { rule: n });
            }
            CommissionRuleKind::Volume if rule.order_quantity_min == 0 => {
                issues.push(CommissionIssue::VolumeWithoutMinimum { rule: n });
            }
            _ => {}
        }
        if rule.effective_until.is_some_and(|until| until <= rule.effective_from) {
            issues.push(CommissionIssue::EmptyEffectiveWindow { rule: n });
        }
    }

    for o in &book.overrides {
        if o.commission_percent > 100 {
            issues.push(CommissionIssue::OverridePercentOutOfRange {
                id: o.id.clone(),
                percent: o.commission_percent,
            });
        }
    }

    ValidationReport { issues }
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
///
/// The resolvers accept 0 (empty quantity picker); this check is for
/// order placement.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates an amount of money that may be zero but never negative
/// (fees, thresholds, surcharges).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a delivery distance in kilometres.
///
/// ```rust
/// use wyshkit_core::validation::validate_distance;
///
/// assert!(validate_distance(12.5).is_ok());
/// assert!(validate_distance(-1.0).is_err());
/// assert!(validate_distance(f64::NAN).is_err());
/// ```
pub fn validate_distance(km: f64) -> ValidationResult<()> {
    if !km.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "distance".to_string(),
            reason: "must be a finite number of kilometres".to_string(),
        });
    }

    if km < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "distance".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a product identifier.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
