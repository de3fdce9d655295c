//! # Delivery Fees
//!
//! Cart-subtotal delivery pricing with a free-delivery threshold, in the
//! "Add ₹X more for FREE delivery!" style.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 DeliveryFeeSchedule::resolve(subtotal, km)              │
//! │                                                                         │
//! │  subtotal ≥ free_threshold? ──yes──► fee 0, "FREE Delivery ✅"          │
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │  active tiers, by priority ──► select_band(subtotal)                    │
//! │          │                          │                                   │
//! │          │ none                     ▼                                   │
//! │          ▼                   tier.fee_amount                            │
//! │    fallback fee (₹50)        + tier distance surcharge                  │
//! │          │                   + schedule distance band                   │
//! │          └──────────┬───────────────┘                                   │
//! │                     ▼                                                   │
//! │        "Add ₹500 more for FREE delivery!"                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use wyshkit_core::{DeliveryFeeSchedule, Money};
//!
//! let schedule = DeliveryFeeSchedule::default();
//! let calc = schedule.resolve(Money::from_paise(450000), 0.0);
//!
//! assert!(!calc.is_free);
//! assert_eq!(calc.fee.paise(), 3000);
//! assert_eq!(calc.amount_needed_for_free.paise(), 50000);
//! assert_eq!(calc.message, "Add ₹500 more for FREE delivery!");
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bands::select_band;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::surge::Surge;
use crate::types::{DeliveryFeeTier, DistanceBand};
use crate::validation::validate_delivery_schedule;
use crate::{
    DEFAULT_CLOSE_TO_FREE_WINDOW, DEFAULT_FALLBACK_DELIVERY_FEE, DEFAULT_FREE_DELIVERY_THRESHOLD,
};

const FREE_MESSAGE: &str = "FREE Delivery ✅";

// =============================================================================
// Schedule
// =============================================================================

/// Everything needed to price delivery for a cart.
///
/// Tiers are kept in `priority` order (stable for equal priorities).
/// Inactive tiers stay in the schedule for the admin view but never take
/// part in resolution.
///
/// Deserialization goes through the same constructors, so a schedule read
/// from JSON is ordered exactly like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScheduleDocument")]
pub struct DeliveryFeeSchedule {
    tiers: Vec<DeliveryFeeTier>,
    free_threshold: Money,
    fallback_fee: Money,
    distance_bands: Vec<DistanceBand>,
    close_to_free_window: Money,
}

/// Wire shape of a schedule; the optional settings fall back to defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleDocument {
    tiers: Vec<DeliveryFeeTier>,
    free_threshold: Money,
    #[serde(default = "default_fallback_fee")]
    fallback_fee: Money,
    #[serde(default)]
    distance_bands: Vec<DistanceBand>,
    #[serde(default = "default_close_to_free_window")]
    close_to_free_window: Money,
}

impl From<ScheduleDocument> for DeliveryFeeSchedule {
    fn from(doc: ScheduleDocument) -> Self {
        DeliveryFeeSchedule::new(doc.tiers, doc.free_threshold)
            .with_fallback_fee(doc.fallback_fee)
            .with_distance_bands(doc.distance_bands)
            .with_close_to_free_window(doc.close_to_free_window)
    }
}

fn default_fallback_fee() -> Money {
    DEFAULT_FALLBACK_DELIVERY_FEE
}

fn default_close_to_free_window() -> Money {
    DEFAULT_CLOSE_TO_FREE_WINDOW
}

impl DeliveryFeeSchedule {
    /// Creates a schedule with the default fallback fee, no distance bands
    /// and the default close-to-free window.
    pub fn new(mut tiers: Vec<DeliveryFeeTier>, free_threshold: Money) -> Self {
        tiers.sort_by_key(|tier| tier.priority);
        DeliveryFeeSchedule {
            tiers,
            free_threshold,
            fallback_fee: DEFAULT_FALLBACK_DELIVERY_FEE,
            distance_bands: Vec::new(),
            close_to_free_window: DEFAULT_CLOSE_TO_FREE_WINDOW,
        }
    }

    /// Overrides the free-delivery threshold, e.g. from operator config.
    pub fn with_free_threshold(mut self, threshold: Money) -> Self {
        self.free_threshold = threshold;
        self
    }

    /// Fee charged when no active tier applies.
    pub fn with_fallback_fee(mut self, fee: Money) -> Self {
        self.fallback_fee = fee;
        self
    }

    /// Schedule-wide distance surcharges, added on top of any tier surcharge.
    pub fn with_distance_bands(mut self, mut bands: Vec<DistanceBand>) -> Self {
        bands.sort_by(|a, b| match (a.max_km, b.max_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.distance_bands = bands;
        self
    }

    /// How far below the threshold counts as "close" for banners.
    pub fn with_close_to_free_window(mut self, window: Money) -> Self {
        self.close_to_free_window = window;
        self
    }

    /// All tiers, active or not, by priority.
    pub fn tiers(&self) -> &[DeliveryFeeTier] {
        &self.tiers
    }

    pub fn free_threshold(&self) -> Money {
        self.free_threshold
    }

    pub fn fallback_fee(&self) -> Money {
        self.fallback_fee
    }

    pub fn distance_bands(&self) -> &[DistanceBand] {
        &self.distance_bands
    }

    fn active_tiers(&self) -> impl Iterator<Item = &DeliveryFeeTier> {
        self.tiers.iter().filter(|tier| tier.is_active)
    }

    /// Active tier whose subtotal band applies, using the same rule as
    /// quantity tiers.
    pub fn tier_for(&self, subtotal: Money) -> Option<&DeliveryFeeTier> {
        select_band(subtotal, self.active_tiers())
    }

    /// Runs schedule validation.
    ///
    /// ## Errors
    /// [`CoreError::InvalidDeliverySchedule`] listing every problem.
    pub fn validate(&self) -> CoreResult<()> {
        let report = validate_delivery_schedule(&self.tiers);
        if report.is_valid() {
            Ok(())
        } else {
            Err(CoreError::InvalidDeliverySchedule(report.issues))
        }
    }

    // =========================================================================
    // Delivery Fee Resolver
    // =========================================================================

    /// Prices delivery for a cart.
    ///
    /// `distance_km <= 0` means "unknown" and adds no surcharge.
    ///
    /// ## Message Rules
    /// | Situation                        | Message                            |
    /// |----------------------------------|------------------------------------|
    /// | subtotal ≥ threshold             | `FREE Delivery ✅`                  |
    /// | 0 < gap < threshold              | `Add ₹500 more for FREE delivery!` |
    /// | fee is 0                         | `FREE Delivery ✅`                  |
    /// | otherwise                        | `Delivery: ₹80`                    |
    pub fn resolve(&self, subtotal: Money, distance_km: f64) -> DeliveryFeeCalculation {
        if subtotal >= self.free_threshold {
            return DeliveryFeeCalculation {
                fee: Money::zero(),
                is_free: true,
                amount_needed_for_free: Money::zero(),
                message: FREE_MESSAGE.to_string(),
                applied_tier_id: None,
                distance_surcharge: Money::zero(),
            };
        }

        let tier = self.tier_for(subtotal);
        let base_fee = tier.map_or(self.fallback_fee, |tier| tier.fee_amount);
        let distance_surcharge = tier.map_or(Money::zero(), |tier| tier.surcharge_for(distance_km))
            + self.band_surcharge(distance_km);

        let fee = base_fee + distance_surcharge;
        let amount_needed = self.free_threshold - subtotal;

        DeliveryFeeCalculation {
            fee,
            is_free: fee.is_zero(),
            amount_needed_for_free: amount_needed,
            message: self.message_for(amount_needed, fee),
            applied_tier_id: tier.map(|tier| tier.id.clone()),
            distance_surcharge,
        }
    }

    /// [`resolve`](Self::resolve), then scales a non-zero fee by `surge`.
    ///
    /// Free delivery stays free.
    pub fn resolve_with_surge(&self, subtotal: Money, distance_km: f64, surge: &Surge) -> DeliveryFeeCalculation {
        let mut calc = self.resolve(subtotal, distance_km);
        if surge.is_active() && calc.fee.is_positive() {
            calc.fee = surge.apply(calc.fee);
            calc.message = self.message_for(calc.amount_needed_for_free, calc.fee);
        }
        calc
    }

    fn message_for(&self, amount_needed: Money, fee: Money) -> String {
        if amount_needed.is_positive() && amount_needed < self.free_threshold {
            format!("Add {} more for FREE delivery!", amount_needed)
        } else if fee.is_zero() {
            FREE_MESSAGE.to_string()
        } else {
            format!("Delivery: {}", fee)
        }
    }

    /// Schedule-wide distance surcharge for `distance_km`.
    ///
    /// ```rust
    /// use wyshkit_core::{DeliveryFeeSchedule, DistanceBand, Money};
    ///
    /// let schedule = DeliveryFeeSchedule::default().with_distance_bands(DistanceBand::defaults());
    /// assert_eq!(schedule.band_surcharge(4.0), Money::zero());
    /// assert_eq!(schedule.band_surcharge(12.0).paise(), 7000);
    /// assert_eq!(schedule.band_surcharge(40.0).paise(), 15000);
    /// ```
    pub fn band_surcharge(&self, distance_km: f64) -> Money {
        if !(distance_km > 0.0) {
            return Money::zero();
        }
        self.distance_bands
            .iter()
            .find(|band| band.max_km.map_or(true, |max| distance_km <= max))
            .map_or(Money::zero(), |band| band.surcharge)
    }

    // =========================================================================
    // Progress & Banner
    // =========================================================================

    /// Progress toward free delivery, 0-100.
    pub fn progress_percent(&self, subtotal: Money) -> u8 {
        subtotal.percent_of(self.free_threshold)
    }

    /// Not free yet, but within the close-to-free window.
    pub fn is_close_to_free(&self, subtotal: Money) -> bool {
        let gap = self.free_threshold - subtotal;
        gap.is_positive() && gap < self.close_to_free_window
    }

    /// Cart banner for a resolved fee.
    pub fn banner(&self, calc: &DeliveryFeeCalculation) -> DeliveryBanner {
        if calc.is_free {
            return DeliveryBanner {
                kind: BannerKind::Success,
                message: "Yay! You get FREE delivery on this order 🎉".to_string(),
                icon: "✅".to_string(),
            };
        }

        let gap = calc.amount_needed_for_free;
        let message = if gap.is_positive() && gap < self.close_to_free_window {
            format!("Add {} more to get FREE delivery!", gap)
        } else {
            format!("Delivery fee: {}", calc.fee)
        };

        DeliveryBanner {
            kind: BannerKind::Info,
            message,
            icon: "🚚".to_string(),
        }
    }

    // =========================================================================
    // Breakdown
    // =========================================================================

    /// Every active tier with the cart's position among them, for the
    /// "delivery fees" panel.
    pub fn breakdown(&self, subtotal: Money) -> DeliveryBreakdown {
        let active: Vec<&DeliveryFeeTier> = self.active_tiers().collect();
        let current = select_band(subtotal, active.iter().copied());
        let is_free = subtotal >= self.free_threshold;

        let current_fee = if is_free {
            Money::zero()
        } else {
            current.map_or(self.fallback_fee, |tier| tier.fee_amount)
        };

        // Next tier by priority after the current one
        let next = current
            .and_then(|tier| active.iter().position(|t| t.id == tier.id))
            .and_then(|index| active.get(index + 1).copied());

        let target = next.map_or(self.free_threshold, |tier| tier.order_value_min);

        DeliveryBreakdown {
            current_tier: current.cloned(),
            current_fee,
            is_free,
            next_tier: next.cloned(),
            amount_to_next_tier: (target - subtotal).non_negative(),
            tiers: active
                .iter()
                .map(|tier| DeliveryTierStatus {
                    tier: (*tier).clone(),
                    is_reached: subtotal >= tier.order_value_min,
                    is_current: current.is_some_and(|c| c.id == tier.id),
                })
                .collect(),
        }
    }
}

impl Default for DeliveryFeeSchedule {
    /// The storefront's standard four bands with a ₹5,000 free threshold.
    fn default() -> Self {
        DeliveryFeeSchedule::new(default_delivery_tiers(), DEFAULT_FREE_DELIVERY_THRESHOLD)
    }
}

/// Standard bands: ₹0-999 → ₹80, ₹1000-2499 → ₹50, ₹2500-4999 → ₹30,
/// ₹5000+ → free.
pub fn default_delivery_tiers() -> Vec<DeliveryFeeTier> {
    vec![
        DeliveryFeeTier::new(
            "tier-1",
            "Tier 1: ₹0-999",
            Money::zero(),
            Some(Money::from_paise(99900)),
            Money::from_paise(8000),
            1,
        ),
        DeliveryFeeTier::new(
            "tier-2",
            "Tier 2: ₹1000-2499",
            Money::from_paise(100000),
            Some(Money::from_paise(249900)),
            Money::from_paise(5000),
            2,
        ),
        DeliveryFeeTier::new(
            "tier-3",
            "Tier 3: ₹2500-4999",
            Money::from_paise(250000),
            Some(Money::from_paise(499900)),
            Money::from_paise(3000),
            3,
        ),
        DeliveryFeeTier::new(
            "tier-4",
            "Tier 4: ₹5000+",
            Money::from_paise(500000),
            None,
            Money::zero(),
            4,
        ),
    ]
}

// =============================================================================
// Results
// =============================================================================

/// A resolved delivery fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryFeeCalculation {
    /// Base fee plus distance surcharges.
    pub fee: Money,
    pub is_free: bool,
    /// `free_threshold − subtotal`; zero once the threshold is met.
    pub amount_needed_for_free: Money,
    pub message: String,
    /// `None` when free by threshold or when the fallback fee applied.
    pub applied_tier_id: Option<String>,
    pub distance_surcharge: Money,
}

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Info,
}

/// Cart banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryBanner {
    #[serde(rename = "type")]
    pub kind: BannerKind,
    pub message: String,
    pub icon: String,
}

/// One row of the delivery breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryTierStatus {
    pub tier: DeliveryFeeTier,
    /// Subtotal is at or past this tier's lower bound.
    pub is_reached: bool,
    pub is_current: bool,
}

/// Delivery panel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryBreakdown {
    pub current_tier: Option<DeliveryFeeTier>,
    pub current_fee: Money,
    pub is_free: bool,
    pub next_tier: Option<DeliveryFeeTier>,
    /// To the next tier, or to free delivery when there is none. Never negative.
    pub amount_to_next_tier: Money,
    pub tiers: Vec<DeliveryTierStatus>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn paise(value: i64) -> Money {
        Money::from_paise(value)
    }

    #[test]
    fn test_close_to_threshold() {
        let calc = DeliveryFeeSchedule::default().resolve(paise(450000), 0.0);
        assert!(!calc.is_free);
        assert_eq!(calc.amount_needed_for_free, paise(50000));
        assert!(calc.message.contains("₹500"));
        assert_eq!(calc.applied_tier_id.as_deref(), Some("tier-3"));
    }

    #[test]
    fn test_threshold_met() {
        let schedule = DeliveryFeeSchedule::default();
        for subtotal in [500000, 900000] {
            let calc = schedule.resolve(paise(subtotal), 25.0);
            assert!(calc.is_free);
            assert_eq!(calc.fee, Money::zero());
            assert_eq!(calc.message, "FREE Delivery ✅");
            assert_eq!(calc.amount_needed_for_free, Money::zero());
        }
    }

    #[test]
    fn test_lowered_threshold() {
        let schedule = DeliveryFeeSchedule::default().with_free_threshold(paise(300000));
        let calc = schedule.resolve(paise(300000), 0.0);
        assert!(calc.is_free);

        let calc = schedule.resolve(paise(290000), 0.0);
        assert_eq!(calc.fee, paise(3000));
        assert_eq!(calc.message, "Add ₹100 more for FREE delivery!");
    }

    #[test]
    fn test_tier_fees() {
        let schedule = DeliveryFeeSchedule::default();
        assert_eq!(schedule.resolve(paise(50000), 0.0).fee, paise(8000));
        assert_eq!(schedule.resolve(paise(99900), 0.0).fee, paise(8000));
        assert_eq!(schedule.resolve(paise(100000), 0.0).fee, paise(5000));
        assert_eq!(schedule.resolve(paise(300000), 0.0).fee, paise(3000));
    }

    #[test]
    fn test_empty_cart_message() {
        // Gap equals the threshold, so no "add more" nudge
        let calc = DeliveryFeeSchedule::default().resolve(Money::zero(), 0.0);
        assert_eq!(calc.fee, paise(8000));
        assert_eq!(calc.message, "Delivery: ₹80");
    }

    #[test]
    fn test_fallback_fee_when_no_tier() {
        let schedule = DeliveryFeeSchedule::new(vec![], paise(500000));
        let calc = schedule.resolve(paise(120000), 0.0);
        assert_eq!(calc.fee, paise(5000));
        assert_eq!(calc.applied_tier_id, None);
        assert_eq!(calc.message, "Add ₹3,800 more for FREE delivery!");

        let custom = DeliveryFeeSchedule::new(vec![], paise(500000)).with_fallback_fee(paise(9900));
        assert_eq!(custom.resolve(paise(120000), 0.0).fee, paise(9900));
    }

    #[test]
    fn test_inactive_tiers_skipped() {
        let mut tiers = default_delivery_tiers();
        tiers[0].is_active = false;
        let schedule = DeliveryFeeSchedule::new(tiers, paise(500000));
        // ₹500 is below every remaining tier and nothing sits below it
        assert_eq!(schedule.resolve(paise(50000), 0.0).fee, paise(5000));
        assert_eq!(schedule.tier_for(paise(50000)), None);
    }

    #[test]
    fn test_priority_order_decides_overlap() {
        let schedule = DeliveryFeeSchedule::new(
            vec![
                DeliveryFeeTier::new("wide", "Wide", Money::zero(), None, paise(9000), 2),
                DeliveryFeeTier::new("narrow", "Narrow", Money::zero(), Some(paise(99900)), paise(4000), 1),
            ],
            paise(500000),
        );
        assert_eq!(schedule.resolve(paise(50000), 0.0).fee, paise(4000));
        assert_eq!(schedule.resolve(paise(200000), 0.0).fee, paise(9000));
    }

    #[test]
    fn test_zero_fee_tier_below_threshold() {
        // Tier makes delivery free even though the threshold is not met
        let schedule = DeliveryFeeSchedule::new(
            vec![DeliveryFeeTier::new("promo", "Promo", Money::zero(), None, Money::zero(), 1)],
            paise(500000),
        );
        let calc = schedule.resolve(paise(480000), 0.0);
        assert!(calc.is_free);
        assert_eq!(calc.message, "Add ₹200 more for FREE delivery!");
    }

    #[test]
    fn test_distance_surcharges() {
        let mut tiers = default_delivery_tiers();
        tiers[1] = tiers[1].clone().with_distance_surcharge(5.0, 15.0, paise(2000));
        let schedule = DeliveryFeeSchedule::new(tiers, paise(500000))
            .with_distance_bands(DistanceBand::defaults());

        let calc = schedule.resolve(paise(150000), 8.0);
        assert_eq!(calc.distance_surcharge, paise(2000 + 3000));
        assert_eq!(calc.fee, paise(5000 + 5000));

        let unknown = schedule.resolve(paise(150000), 0.0);
        assert_eq!(unknown.distance_surcharge, Money::zero());
    }

    #[test]
    fn test_surge_scales_fee_and_message() {
        let schedule = DeliveryFeeSchedule::default();
        let surge = Surge { multiplier_bps: 15_000, reason: Some("Peak hours".into()) };

        let calc = schedule.resolve_with_surge(Money::zero(), 0.0, &surge);
        assert_eq!(calc.fee, paise(12000));
        assert_eq!(calc.message, "Delivery: ₹120");

        let near = schedule.resolve_with_surge(paise(450000), 0.0, &surge);
        assert_eq!(near.fee, paise(4500));
        assert_eq!(near.message, "Add ₹500 more for FREE delivery!");

        let free = schedule.resolve_with_surge(paise(500000), 0.0, &surge);
        assert_eq!(free.fee, Money::zero());
    }

    #[test]
    fn test_band_surcharge_sorted_and_nan_safe() {
        let schedule = DeliveryFeeSchedule::default().with_distance_bands(vec![
            DistanceBand { max_km: None, surcharge: paise(15000) },
            DistanceBand { max_km: Some(10.0), surcharge: paise(3000) },
        ]);
        assert_eq!(schedule.band_surcharge(6.0), paise(3000));
        assert_eq!(schedule.band_surcharge(11.0), paise(15000));
        assert_eq!(schedule.band_surcharge(f64::NAN), Money::zero());
    }

    #[test]
    fn test_progress_and_close_to_free() {
        let schedule = DeliveryFeeSchedule::default();
        assert_eq!(schedule.progress_percent(paise(450000)), 90);
        assert_eq!(schedule.progress_percent(paise(600000)), 100);
        assert!(schedule.is_close_to_free(paise(450000)));
        assert!(!schedule.is_close_to_free(paise(300000)));
        assert!(!schedule.is_close_to_free(paise(500000)));
    }

    #[test]
    fn test_banner() {
        let schedule = DeliveryFeeSchedule::default();

        let free = schedule.banner(&schedule.resolve(paise(500000), 0.0));
        assert_eq!(free.kind, BannerKind::Success);
        assert_eq!(free.icon, "✅");

        let close = schedule.banner(&schedule.resolve(paise(450000), 0.0));
        assert_eq!(close.kind, BannerKind::Info);
        assert_eq!(close.message, "Add ₹500 more to get FREE delivery!");

        let far = schedule.banner(&schedule.resolve(paise(150000), 0.0));
        assert_eq!(far.message, "Delivery fee: ₹50");
        assert_eq!(far.icon, "🚚");
    }

    #[test]
    fn test_banner_json_shape() {
        let schedule = DeliveryFeeSchedule::default();
        let json = serde_json::to_value(schedule.banner(&schedule.resolve(paise(500000), 0.0))).unwrap();
        assert_eq!(json["type"], "success");
    }

    #[test]
    fn test_breakdown() {
        let breakdown = DeliveryFeeSchedule::default().breakdown(paise(150000));
        assert_eq!(breakdown.current_tier.as_ref().map(|t| t.id.as_str()), Some("tier-2"));
        assert_eq!(breakdown.current_fee, paise(5000));
        assert!(!breakdown.is_free);
        assert_eq!(breakdown.next_tier.as_ref().map(|t| t.id.as_str()), Some("tier-3"));
        assert_eq!(breakdown.amount_to_next_tier, paise(100000));

        let flags: Vec<(bool, bool)> = breakdown.tiers.iter().map(|s| (s.is_reached, s.is_current)).collect();
        assert_eq!(flags, vec![(true, false), (true, true), (false, false), (false, false)]);
    }

    #[test]
    fn test_breakdown_last_tier_targets_threshold() {
        let breakdown = DeliveryFeeSchedule::default().breakdown(paise(700000));
        assert!(breakdown.is_free);
        assert_eq!(breakdown.next_tier, None);
        assert_eq!(breakdown.amount_to_next_tier, Money::zero());
    }

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(DeliveryFeeSchedule::default().validate().is_ok());

        let broken = DeliveryFeeSchedule::new(
            vec![DeliveryFeeTier::new("bad", "Bad", paise(1000), Some(paise(10)), paise(-5), 1)],
            paise(500000),
        );
        assert!(matches!(broken.validate(), Err(CoreError::InvalidDeliverySchedule(_))));
    }

    #[test]
    fn test_schedule_json_defaults() {
        let schedule: DeliveryFeeSchedule = serde_json::from_str(
            r#"{"tiers":[{"id":"t","ruleName":"All","orderValueMin":0,"orderValueMax":null,
                "feeAmount":4000,"distanceMinKm":null,"distanceMaxKm":null,
                "distanceSurcharge":0,"isActive":true,"priority":1}],
                "freeThreshold":300000}"#,
        )
        .unwrap();
        assert_eq!(schedule.fallback_fee(), DEFAULT_FALLBACK_DELIVERY_FEE);
        assert_eq!(schedule.resolve(paise(1000), 0.0).fee, paise(4000));
    }

    #[test]
    fn test_schedule_json_sorts_by_priority() {
        // "wide" is listed first but has the lower precedence
        let schedule: DeliveryFeeSchedule = serde_json::from_str(
            r#"{"tiers":[
                {"id":"wide","ruleName":"Wide","orderValueMin":0,"orderValueMax":null,
                 "feeAmount":9000,"distanceMinKm":null,"distanceMaxKm":null,
                 "distanceSurcharge":0,"isActive":true,"priority":2},
                {"id":"narrow","ruleName":"Narrow","orderValueMin":0,"orderValueMax":100000,
                 "feeAmount":4000,"distanceMinKm":null,"distanceMaxKm":null,
                 "distanceSurcharge":0,"isActive":true,"priority":1}],
               "freeThreshold":500000,
               "distanceBands":[{"maxKm":null,"surcharge":15000},{"maxKm":5.0,"surcharge":0}]}"#,
        )
        .unwrap();

        let ids: Vec<&str> = schedule.tiers().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["narrow", "wide"]);

        let built = DeliveryFeeSchedule::new(schedule.tiers().to_vec(), paise(500000));
        assert_eq!(schedule.resolve(paise(50000), 0.0).fee, paise(4000));
        assert_eq!(schedule.resolve(paise(50000), 0.0).fee, built.resolve(paise(50000), 0.0).fee);

        // Catch-all band sorts last, so 3 km hits the free band
        assert_eq!(schedule.distance_bands()[0].max_km, Some(5.0));
        assert_eq!(schedule.band_surcharge(3.0), Money::zero());
        assert_eq!(schedule.band_surcharge(30.0), paise(15000));
    }

    #[test]
    fn test_schedule_json_round_trip_keeps_settings() {
        let schedule = DeliveryFeeSchedule::default()
            .with_fallback_fee(paise(6000))
            .with_distance_bands(DistanceBand::defaults());
        let json = serde_json::to_string(&schedule).unwrap();
        let back: DeliveryFeeSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
