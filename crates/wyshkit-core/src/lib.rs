//! # wyshkit-core: Pure Pricing Logic for Wyshkit
//!
//! This crate is the **heart** of Wyshkit pricing. It holds the tiered
//! (bulk) price resolver, the next-tier advisor and the delivery fee
//! resolver as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Wyshkit Pricing Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Storefront / wyshkit-quote CLI                    │   │
//! │  │   Product page ──► Quantity picker ──► Cart ──► Checkout        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wyshkit-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ delivery  │  │   surge   │  │ validation│  │   │
//! │  │   │ TierTable │  │ Schedule  │  │  Context  │  │   rules   │  │   │
//! │  │   │ next tier │  │  banner   │  │  reason   │  │  issues   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  wyshkit-db (Catalog Storage)                   │   │
//! │  │         SQLite tier tables, delivery schedule, migrations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Tier tables, price resolution, next-tier advice
//! - [`delivery`] - Delivery fee schedule, banners, breakdown
//! - [`surge`] - Time/weather/demand multipliers for delivery
//! - [`addons`] - Per-item extras and bulk unlocks
//! - [`quote`] - Order summary combining all of the above
//! - [`bands`] - The band selection rule shared by every tier type
//! - [`commission`] - Platform commission rules and vendor payouts
//! - [`types`] - Catalog-side data (tiers, add-ons)
//! - [`money`] - Money type with integer arithmetic in paise
//! - [`error`] - Domain error types
//! - [`validation`] - Seller and admin data checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: storage lives in `wyshkit-db`
//! 3. **Integer Money**: all amounts are paise (i64)
//! 4. **Resolvers never fail**: bad tier data degrades to the closest band
//!
//! ## Example Usage
//!
//! ```rust
//! use wyshkit_core::{DeliveryFeeSchedule, Money, PricingTier, TierTable};
//!
//! let tiers = TierTable::new(vec![
//!     PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
//!     PricingTier::new(10, Some(49), Money::from_paise(900), 10),
//!     PricingTier::new(50, None, Money::from_paise(800), 20),
//! ])?;
//!
//! let price = tiers.resolve(25);
//! assert_eq!(price.subtotal.paise(), 22500);
//! assert_eq!(price.savings.paise(), 2500);
//!
//! let delivery = DeliveryFeeSchedule::default().resolve(price.subtotal, 0.0);
//! assert_eq!(delivery.fee.to_string(), "₹80");
//! # Ok::<(), wyshkit_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod addons;
pub mod bands;
pub mod commission;
pub mod delivery;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod surge;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use wyshkit_core::Money` instead of
// `use wyshkit_core::money::Money`

pub use commission::{CommissionBook, CommissionCalculation};
pub use delivery::{DeliveryFeeCalculation, DeliveryFeeSchedule};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{CalculatedPrice, NextTierInfo, TierTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Commission charged when no override or rule applies.
pub const DEFAULT_COMMISSION_PERCENT: u8 = 18;

/// Maximum tiers a seller may define for one product.
pub const MAX_PRICING_TIERS: usize = 5;

/// Largest quantity accepted for a single order line.
///
/// ## Business Reason
/// Corporate gifting orders run into the thousands; anything past this is
/// almost certainly a typo and goes to a KAM instead.
pub const MAX_ITEM_QUANTITY: u32 = 100_000;

/// Cart subtotal at which delivery becomes free (₹5,000).
pub const DEFAULT_FREE_DELIVERY_THRESHOLD: Money = Money::from_paise(500_000);

/// Fee charged when no delivery tier applies (₹50).
pub const DEFAULT_FALLBACK_DELIVERY_FEE: Money = Money::from_paise(5_000);

/// Gap below the free threshold that counts as "close" (₹1,000).
pub const DEFAULT_CLOSE_TO_FREE_WINDOW: Money = Money::from_paise(100_000);
