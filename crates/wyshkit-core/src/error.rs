//! # Error Types
//!
//! Domain-specific error types for wyshkit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wyshkit-core errors (this file)                                       │
//! │  ├── CoreError        - Pricing domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  wyshkit-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  wyshkit-quote errors (CLI)                                            │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier-table problems found on the seller write path are reported as a
//! list of [`crate::validation::TierIssue`]s rather than a single error, so
//! the seller form can show all of them at once.

use thiserror::Error;

use crate::validation::{CommissionIssue, DeliveryIssue, TierIssue};

// =============================================================================
// Core Error
// =============================================================================

/// Pricing domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tier table was built from an empty list.
    ///
    /// ## When This Occurs
    /// - Product has no tiers in the catalog yet
    /// - Seller saved the form with every row removed
    #[error("No pricing tiers defined for product")]
    EmptyTierTable,

    /// A tier table failed seller-side validation.
    #[error("Invalid pricing tiers: {}", join_issues(.0))]
    InvalidTierTable(Vec<TierIssue>),

    /// A delivery fee schedule failed validation.
    #[error("Invalid delivery fee schedule: {}", join_issues(.0))]
    InvalidDeliverySchedule(Vec<DeliveryIssue>),

    /// A commission book failed admin-side validation.
    #[error("Invalid commission rules: {}", join_issues(.0))]
    InvalidCommissionRules(Vec<CommissionIssue>),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_issues<T: std::fmt::Display>(issues: &[T]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of user input before pricing runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-finite distance).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
