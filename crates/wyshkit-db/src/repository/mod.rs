//! # Repository Module
//!
//! Catalog repositories. Each wraps a pool clone and owns the SQL for one
//! table family.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  wyshkit-quote                                                          │
//! │       │                                                                 │
//! │       ├── db.pricing_tiers().get_table("mug-classic")                   │
//! │       └── db.delivery_fees().schedule(fallback)                         │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  PricingTierRepository         DeliveryFeeRepository                    │
//! │  ├── get_tiers / get_table     ├── list_tiers / list_active             │
//! │  ├── replace_tiers             ├── upsert_tier / set_active             │
//! │  ├── delete_tiers              ├── replace_all                          │
//! │  └── list_products             └── free_threshold / schedule            │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  SQLite (pricing_tiers, delivery_fee_tiers, platform_config)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod delivery_fee;
pub mod pricing_tier;
