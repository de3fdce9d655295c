//! # Band Selection
//!
//! Quantity tiers, delivery-fee tiers and lead-time tiers are all the same
//! shape: a lower bound, an optional upper bound, and a payload. This module
//! holds the one selection rule they share.
//!
//! ## Selection Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bands (in table order):  [1..9]  [10..49]  [50..∞)                     │
//! │                                                                         │
//! │  key = 25  → first band containing 25          → [10..49]              │
//! │                                                                         │
//! │  bands with a gap:        [1..9]  [10..19]  [30..∞)                     │
//! │  key = 25  → nothing contains 25                                       │
//! │            → highest lower bound ≤ 25           → [10..19]              │
//! │                                                                         │
//! │  key = 0   → nothing contains, nothing below    → None                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// A half-open-above or closed range keyed on `Key`.
pub trait Band {
    /// What the band is keyed on (quantity, cart subtotal, ...).
    type Key: Ord + Copy;

    /// Inclusive lower bound.
    fn lower(&self) -> Self::Key;

    /// Inclusive upper bound, `None` when unbounded.
    fn upper(&self) -> Option<Self::Key>;

    /// Whether `key` lies inside the band.
    fn covers(&self, key: Self::Key) -> bool {
        key >= self.lower() && self.upper().map_or(true, |upper| key <= upper)
    }
}

/// Picks the band for `key`.
///
/// Returns the first band (in iteration order) that covers `key`. If none
/// does, falls back to the band with the highest lower bound that is still
/// `≤ key`. Returns `None` only when every band starts above `key`.
///
/// ```rust
/// use wyshkit_core::bands::select_band;
/// use wyshkit_core::{Money, PricingTier};
///
/// let tiers = vec![
///     PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
///     PricingTier::new(10, Some(19), Money::from_paise(900), 10),
///     PricingTier::new(30, None, Money::from_paise(800), 20),
/// ];
///
/// assert_eq!(select_band(15, &tiers).map(|t| t.min_qty), Some(10));
/// // 25 falls in the gap: closest tier below wins
/// assert_eq!(select_band(25, &tiers).map(|t| t.min_qty), Some(10));
/// assert_eq!(select_band(0, &tiers), None);
/// ```
pub fn select_band<'a, B, I>(key: B::Key, bands: I) -> Option<&'a B>
where
    B: Band + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut fallback: Option<&'a B> = None;

    for band in bands {
        if band.covers(key) {
            return Some(band);
        }
        if band.lower() <= key && fallback.map_or(true, |best| band.lower() > best.lower()) {
            fallback = Some(band);
        }
    }

    fallback
}

// =============================================================================
// Unit Tests
// =============================================================================
