//! # wyshkit-db: Catalog Storage for Wyshkit Pricing
//!
//! Stores what the pricing engine reads: seller tier tables, the admin
//! delivery fee schedule and the platform free-delivery threshold. SQLite
//! through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wyshkit Quote Flow                               │
//! │                                                                         │
//! │  wyshkit-quote (CLI)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  wyshkit-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐    ┌─────────────┐ │   │
//! │  │   │   Database    │    │  Repositories   │    │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│ PricingTierRepo │    │ (embedded)  │ │   │
//! │  │   │               │    │ DeliveryFeeRepo │    │             │ │   │
//! │  │   └───────────────┘    └─────────────────┘    └─────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TierTable / DeliveryFeeSchedule (wyshkit-core) ──► resolve            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Pricing tier and delivery fee repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wyshkit_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//! let price = db.pricing_tiers().get_table("mug-classic").await?.resolve(25);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::delivery_fee::DeliveryFeeRepository;
pub use repository::pricing_tier::PricingTierRepository;
