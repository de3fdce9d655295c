//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Tier prices arrive from the catalog in paise (₹1 = 100 paise).        │
//! │  A bulk order of 250 hampers at ₹899.50 must come out at exactly       │
//! │  ₹2,24,875.00, never ₹2,24,874.99999.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    89950 paise × 250 = 22487500 paise                                  │
//! │    Rounding happens in exactly two places: percentage scaling and      │
//! │    basis-point multipliers, both half-up.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wyshkit_core::money::Money;
//!
//! let price = Money::from_paise(89950); // ₹899.50
//! let line = price.multiply_quantity(250);
//! assert_eq!(line.paise(), 22_487_500);
//! assert_eq!(line.to_string(), "₹2,24,875");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as savings can go negative before clamping
/// - **Transparent serde**: serializes as a bare integer, matching the catalog JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use wyshkit_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(50000).rupees(), 500);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Adds, clamping at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Clamps negative amounts to zero.
    ///
    /// ```rust
    /// use wyshkit_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(-300).non_negative(), Money::zero());
    /// assert_eq!(Money::from_paise(300).non_negative().paise(), 300);
    /// ```
    #[inline]
    pub fn non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Multiplies a unit price by an item quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Tier: 10-49 @ ₹9.00
    /// Quantity: 25
    ///      │
    ///      ▼
    /// multiply_quantity(25) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: ₹225
    /// ```
    ///
    /// Saturates at the `i64` bounds instead of overflowing.
    ///
    /// ```rust
    /// use wyshkit_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(3_000_000_000).multiply_quantity(u32::MAX).paise(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Scales the amount by a whole percentage, rounding half-up to the paisa.
    ///
    /// ```rust
    /// use wyshkit_core::money::Money;
    ///
    /// // 93% of ₹9.99 = 929.07 paise → 929
    /// assert_eq!(Money::from_paise(999).scale_percent(93).paise(), 929);
    /// // 87% of ₹0.50 = 43.5 paise → 44
    /// assert_eq!(Money::from_paise(50).scale_percent(87).paise(), 44);
    /// ```
    pub fn scale_percent(&self, percent: u32) -> Money {
        // i128 so catalog-scale amounts cannot overflow
        let scaled = (self.0 as i128 * percent as i128 + 50).div_euclid(100);
        Money::from_wide(scaled)
    }

    /// Scales the amount by a multiplier in basis points (10000 = 1.0×),
    /// rounding half-up.
    ///
    /// ```rust
    /// use wyshkit_core::money::Money;
    ///
    /// // ₹80 at 1.5× surge
    /// assert_eq!(Money::from_paise(8000).scale_bps(15000).paise(), 12000);
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        let scaled = (self.0 as i128 * bps as i128 + 5000).div_euclid(10000);
        Money::from_wide(scaled)
    }

    fn from_wide(value: i128) -> Money {
        Money(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Returns `self` as a whole percentage of `whole`, capped to 0-100.
    ///
    /// A zero or negative `whole` counts as fully reached.
    pub fn percent_of(&self, whole: Money) -> u8 {
        if !whole.is_positive() {
            return 100;
        }
        let pct = (self.0.max(0) as i128 * 100) / whole.0 as i128;
        pct.min(100) as u8
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates: a quote for an absurd quantity reads as the largest
// representable amount rather than panicking or wrapping negative.

/// Display renders the storefront format: rupee sign, Indian digit grouping
/// (lakh/crore) and 0-2 fraction digits.
///
/// ```rust
/// use wyshkit_core::money::Money;
///
/// assert_eq!(Money::from_paise(500000).to_string(), "₹5,000");
/// assert_eq!(Money::from_paise(25200000).to_string(), "₹2,52,000");
/// assert_eq!(Money::from_paise(1050).to_string(), "₹10.5");
/// assert_eq!(Money::from_paise(1005).to_string(), "₹10.05");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = group_indian(self.0.unsigned_abs() / 100);
        let frac = self.paise_part();

        if frac == 0 {
            write!(f, "{}₹{}", sign, whole)
        } else if frac % 10 == 0 {
            write!(f, "{}₹{}.{}", sign, whole, frac / 10)
        } else {
            write!(f, "{}₹{}.{:02}", sign, whole, frac)
        }
    }
}

/// Groups digits the en-IN way: last three, then pairs.
/// 25200000 → "2,52,00,000"
fn group_indian(value: u64) -> String {
    let digits: Vec<char> = value.to_string().chars().collect();
    if digits.len() <= 3 {
        return digits.into_iter().collect();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);

    // Leading group is one or two digits so the rest pair up evenly
    let lead = head.len() % 2;
    for (i, c) in head.iter().enumerate() {
        if i > 0 && (i + 2 - lead) % 2 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out.push(',');
    out.extend(tail);
    out
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by an item quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
