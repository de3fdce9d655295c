//! # Platform Commission
//!
//! How much of an order the platform keeps, and what the vendor is paid.
//!
//! ## Rule Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              CommissionBook::calculate(order, at)                       │
//! │                                                                         │
//! │  1. Vendor override   active, in effect at `at`, vendor matches         │
//! │     │                 (latest effective_from wins)                      │
//! │     │ none                                                              │
//! │     ▼                                                                   │
//! │  2. Rules             active, in effect, and matching:                  │
//! │     │                 vendor rule    → vendor_id equal                  │
//! │     │                 category rule  → category_id equal                │
//! │     │                 volume rule    → quantity inside its window       │
//! │     │                 any rule       → order value inside its window    │
//! │     │                 lowest priority number wins                       │
//! │     │ none                                                              │
//! │     ▼                                                                   │
//! │  3. Default           18%, "default-fallback"                           │
//! │                                                                         │
//! │  commission = order_value × percent (half-up)                           │
//! │  payout     = order_value − commission                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use wyshkit_core::commission::{CommissionBook, CommissionOrder};
//! use wyshkit_core::Money;
//!
//! let order = CommissionOrder::new(Money::from_paise(100000), 3, "vendor-42");
//! let calc = CommissionBook::default().calculate(&order, Utc::now());
//!
//! assert_eq!(calc.commission_percent, 18);
//! assert_eq!(calc.commission_amount.paise(), 18000);
//! assert_eq!(calc.vendor_payout.paise(), 82000);
//! assert_eq!(calc.applied_rule_id, "default-fallback");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bands::Band;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_commission_book;
use crate::DEFAULT_COMMISSION_PERCENT;

/// Id reported when no override or rule applies.
pub const DEFAULT_COMMISSION_RULE_ID: &str = "default-fallback";

// =============================================================================
// Rules & Overrides
// =============================================================================

/// What a rule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CommissionRuleKind {
    /// Applies to every order.
    Default,
    /// Applies to one product category.
    Category,
    /// Applies to one vendor.
    Vendor,
    /// Applies to orders inside a quantity window.
    Volume,
}

/// An admin-defined commission rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionRule {
    pub id: String,

    pub rule_name: String,

    pub rule_type: CommissionRuleKind,

    /// Required for [`CommissionRuleKind::Category`].
    #[serde(default)]
    pub category_id: Option<String>,

    /// Required for [`CommissionRuleKind::Vendor`].
    #[serde(default)]
    pub vendor_id: Option<String>,

    /// Smallest order value (paise) the rule applies to.
    #[serde(default)]
    pub order_value_min: Money,

    /// Largest order value (paise), inclusive. `None` = unlimited.
    #[serde(default)]
    pub order_value_max: Option<Money>,

    /// Quantity window; only volume rules are gated on it.
    #[serde(default)]
    pub order_quantity_min: u32,

    #[serde(default)]
    pub order_quantity_max: Option<u32>,

    /// 0-100.
    pub commission_percent: u8,

    pub is_active: bool,

    #[ts(type = "string")]
    pub effective_from: DateTime<Utc>,

    #[serde(default)]
    #[ts(type = "string | null")]
    pub effective_until: Option<DateTime<Utc>>,

    /// Lower runs first.
    pub priority: u32,
}

impl CommissionRule {
    /// Active and inside its effective window at `at`.
    pub fn is_in_effect(&self, at: DateTime<Utc>) -> bool {
        in_effect(self.is_active, self.effective_from, self.effective_until, at)
    }

    /// Whether the rule's scope and windows admit `order`.
    pub fn matches(&self, order: &CommissionOrder<'_>) -> bool {
        let scope_ok = match self.rule_type {
            CommissionRuleKind::Vendor => self.vendor_id.as_deref() == Some(order.vendor_id),
            CommissionRuleKind::Category => {
                order.category_id.is_some() && self.category_id.as_deref() == order.category_id
            }
            CommissionRuleKind::Volume => self.covers(order.quantity),
            CommissionRuleKind::Default => true,
        };

        scope_ok
            && order.order_value >= self.order_value_min
            && self.order_value_max.map_or(true, |max| order.order_value <= max)
    }

    /// Whether this rule sets the vendor's base rate (everything but volume).
    fn is_base_rule_for(&self, vendor_id: &str, category_id: Option<&str>) -> bool {
        match self.rule_type {
            CommissionRuleKind::Vendor => self.vendor_id.as_deref() == Some(vendor_id),
            CommissionRuleKind::Category => {
                category_id.is_some() && self.category_id.as_deref() == category_id
            }
            CommissionRuleKind::Default => true,
            CommissionRuleKind::Volume => false,
        }
    }
}

/// Quantity window of a volume rule.
impl Band for CommissionRule {
    type Key = u32;

    fn lower(&self) -> u32 {
        self.order_quantity_min
    }

    fn upper(&self) -> Option<u32> {
        self.order_quantity_max
    }
}

/// A negotiated rate for one vendor that beats every rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VendorCommissionOverride {
    pub id: String,

    pub vendor_id: String,

    pub commission_percent: u8,

    #[serde(default)]
    pub reason: Option<String>,

    pub is_active: bool,

    #[ts(type = "string")]
    pub effective_from: DateTime<Utc>,

    #[serde(default)]
    #[ts(type = "string | null")]
    pub effective_until: Option<DateTime<Utc>>,
}

impl VendorCommissionOverride {
    pub fn is_in_effect(&self, at: DateTime<Utc>) -> bool {
        in_effect(self.is_active, self.effective_from, self.effective_until, at)
    }
}

fn in_effect(
    is_active: bool,
    from: DateTime<Utc>,
    until: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> bool {
    is_active && from <= at && until.map_or(true, |until| until > at)
}

// =============================================================================
// Order
// =============================================================================

/// The facts about an order that commission depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionOrder<'a> {
    pub order_value: Money,
    pub quantity: u32,
    pub vendor_id: &'a str,
    pub category_id: Option<&'a str>,
}

impl<'a> CommissionOrder<'a> {
    pub fn new(order_value: Money, quantity: u32, vendor_id: &'a str) -> Self {
        CommissionOrder {
            order_value,
            quantity,
            vendor_id,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: &'a str) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

// =============================================================================
// Book
// =============================================================================

/// Every commission rule and vendor override, as loaded from the admin
/// panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionBook {
    #[serde(default)]
    pub rules: Vec<CommissionRule>,
    #[serde(default)]
    pub overrides: Vec<VendorCommissionOverride>,
}

impl CommissionBook {
    pub fn new(rules: Vec<CommissionRule>, overrides: Vec<VendorCommissionOverride>) -> Self {
        CommissionBook { rules, overrides }
    }

    /// Runs rule validation.
    ///
    /// ## Errors
    /// [`CoreError::InvalidCommissionRules`] listing every problem.
    pub fn validate(&self) -> CoreResult<()> {
        let report = validate_commission_book(self);
        if report.is_valid() {
            Ok(())
        } else {
            Err(CoreError::InvalidCommissionRules(report.issues))
        }
    }

    /// The vendor's override in effect at `at`. When several are, the one
    /// that took effect last wins; ties go to the earlier entry.
    pub fn active_override(&self, vendor_id: &str, at: DateTime<Utc>) -> Option<&VendorCommissionOverride> {
        self.overrides
            .iter()
            .filter(|o| o.vendor_id == vendor_id && o.is_in_effect(at))
            .fold(None, |best: Option<&VendorCommissionOverride>, o| match best {
                Some(best) if best.effective_from >= o.effective_from => Some(best),
                _ => Some(o),
            })
    }

    /// The matching rule with the lowest priority number; ties go to the
    /// earlier entry.
    pub fn applicable_rule(&self, order: &CommissionOrder<'_>, at: DateTime<Utc>) -> Option<&CommissionRule> {
        self.rules
            .iter()
            .filter(|rule| rule.is_in_effect(at) && rule.matches(order))
            .min_by_key(|rule| rule.priority)
    }

    /// Splits an order between platform and vendor.
    pub fn calculate(&self, order: &CommissionOrder<'_>, at: DateTime<Utc>) -> CommissionCalculation {
        if let Some(o) = self.active_override(order.vendor_id, at) {
            let reason = o.reason.as_deref().unwrap_or("Custom rate");
            return CommissionCalculation::new(
                order.order_value,
                o.commission_percent,
                o.id.clone(),
                format!("Vendor Override: {reason}"),
            );
        }

        match self.applicable_rule(order, at) {
            Some(rule) => CommissionCalculation::new(
                order.order_value,
                rule.commission_percent,
                rule.id.clone(),
                rule.rule_name.clone(),
            ),
            None => CommissionCalculation::new(
                order.order_value,
                DEFAULT_COMMISSION_PERCENT,
                DEFAULT_COMMISSION_RULE_ID.to_string(),
                format!("Default Commission ({DEFAULT_COMMISSION_PERCENT}%)"),
            ),
        }
    }

    /// The rates a vendor sees on their dashboard: base rate plus every
    /// volume band, or just the override when one is in effect.
    ///
    /// The base rate ignores order-value windows; it is the rate of the
    /// best-priority vendor, category or default rule.
    pub fn effective_rate(
        &self,
        vendor_id: &str,
        category_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> EffectiveCommissionRate {
        if let Some(o) = self.active_override(vendor_id, at) {
            return EffectiveCommissionRate {
                base_rate: o.commission_percent,
                volume_rates: Vec::new(),
                has_override: true,
                override_rate: Some(o.commission_percent),
                override_reason: o.reason.clone(),
            };
        }

        let live: Vec<&CommissionRule> = self.rules.iter().filter(|rule| rule.is_in_effect(at)).collect();

        let base_rate = live
            .iter()
            .filter(|rule| rule.is_base_rule_for(vendor_id, category_id))
            .min_by_key(|rule| rule.priority)
            .map_or(DEFAULT_COMMISSION_PERCENT, |rule| rule.commission_percent);

        let mut volume: Vec<&CommissionRule> = live
            .into_iter()
            .filter(|rule| rule.rule_type == CommissionRuleKind::Volume)
            .collect();
        volume.sort_by_key(|rule| rule.order_quantity_min);

        EffectiveCommissionRate {
            base_rate,
            volume_rates: volume
                .into_iter()
                .map(|rule| VolumeRate {
                    min_quantity: rule.order_quantity_min,
                    max_quantity: rule.order_quantity_max,
                    rate: rule.commission_percent,
                })
                .collect(),
            has_override: false,
            override_rate: None,
            override_reason: None,
        }
    }

    /// Admin "what if" tool: calculation, display breakdown and the
    /// vendor's effective rates in one go.
    pub fn simulate(&self, order: &CommissionOrder<'_>, at: DateTime<Utc>) -> CommissionSimulation {
        let calculation = self.calculate(order, at);
        CommissionSimulation {
            breakdown: calculation.breakdown(),
            effective_rate: self.effective_rate(order.vendor_id, order.category_id, at),
            calculation,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Platform/vendor split for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionCalculation {
    pub order_value: Money,
    pub commission_amount: Money,
    pub commission_percent: u8,
    pub vendor_payout: Money,
    pub applied_rule_id: String,
    pub rule_name: String,
}

impl CommissionCalculation {
    fn new(order_value: Money, percent: u8, applied_rule_id: String, rule_name: String) -> Self {
        let commission_amount = order_value.scale_percent(u32::from(percent));
        CommissionCalculation {
            order_value,
            commission_amount,
            commission_percent: percent,
            vendor_payout: order_value - commission_amount,
            applied_rule_id,
            rule_name,
        }
    }

    /// Display strings for the admin view.
    pub fn breakdown(&self) -> CommissionBreakdown {
        CommissionBreakdown {
            order_value: self.order_value.to_string(),
            commission_percent: format!("{}%", self.commission_percent),
            commission_amount: self.commission_amount.to_string(),
            vendor_payout: self.vendor_payout.to_string(),
            rule_name: self.rule_name.clone(),
        }
    }
}

/// [`CommissionCalculation`] formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionBreakdown {
    pub order_value: String,
    pub commission_percent: String,
    pub commission_amount: String,
    pub vendor_payout: String,
    pub rule_name: String,
}

/// One volume band as shown to a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VolumeRate {
    pub min_quantity: u32,
    pub max_quantity: Option<u32>,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EffectiveCommissionRate {
    pub base_rate: u8,
    pub volume_rates: Vec<VolumeRate>,
    pub has_override: bool,
    pub override_rate: Option<u8>,
    pub override_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionSimulation {
    pub calculation: CommissionCalculation,
    pub breakdown: CommissionBreakdown,
    pub effective_rate: EffectiveCommissionRate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn rule(id: &str, kind: CommissionRuleKind, percent: u8, priority: u32) -> CommissionRule {
        CommissionRule {
            id: id.to_string(),
            rule_name: format!("{id} rule"),
            rule_type: kind,
            category_id: None,
            vendor_id: None,
            order_value_min: Money::zero(),
            order_value_max: None,
            order_quantity_min: 0,
            order_quantity_max: None,
            commission_percent: percent,
            is_active: true,
            effective_from: at(1),
            effective_until: None,
            priority,
        }
    }

    fn override_for(vendor: &str, percent: u8, from: u32) -> VendorCommissionOverride {
        VendorCommissionOverride {
            id: format!("ovr-{vendor}-{from}"),
            vendor_id: vendor.to_string(),
            commission_percent: percent,
            reason: Some("Launch partner".to_string()),
            is_active: true,
            effective_from: at(from),
            effective_until: None,
        }
    }

    fn book() -> CommissionBook {
        let mut vendor = rule("vendor", CommissionRuleKind::Vendor, 12, 1);
        vendor.vendor_id = Some("v-1".to_string());

        let mut volume = rule("bulk", CommissionRuleKind::Volume, 10, 2);
        volume.order_quantity_min = 50;

        let mut category = rule("mugs", CommissionRuleKind::Category, 15, 3);
        category.category_id = Some("mugs".to_string());

        CommissionBook::new(
            vec![rule("default", CommissionRuleKind::Default, 20, 10), category, volume, vendor],
            vec![],
        )
    }

    fn order(value: i64, quantity: u32, vendor: &str) -> CommissionOrder<'_> {
        CommissionOrder::new(Money::from_paise(value), quantity, vendor)
    }

    #[test]
    fn test_empty_book_falls_back_to_default() {
        let calc = CommissionBook::default().calculate(&order(250000, 1, "v-9"), at(5));
        assert_eq!(calc.commission_percent, 18);
        assert_eq!(calc.commission_amount, Money::from_paise(45000));
        assert_eq!(calc.vendor_payout, Money::from_paise(205000));
        assert_eq!(calc.applied_rule_id, "default-fallback");
        assert_eq!(calc.rule_name, "Default Commission (18%)");
    }

    #[test]
    fn test_rule_priority_chain() {
        let book = book();

        // Vendor rule beats volume and category
        let calc = book.calculate(&order(100000, 60, "v-1").with_category("mugs"), at(5));
        assert_eq!(calc.applied_rule_id, "vendor");
        assert_eq!(calc.commission_amount, Money::from_paise(12000));

        // Volume needs the quantity
        let calc = book.calculate(&order(100000, 60, "v-2").with_category("mugs"), at(5));
        assert_eq!(calc.applied_rule_id, "bulk");
        let calc = book.calculate(&order(100000, 10, "v-2").with_category("mugs"), at(5));
        assert_eq!(calc.applied_rule_id, "mugs");

        // Unknown category lands on the default rule
        let calc = book.calculate(&order(100000, 10, "v-2").with_category("diaries"), at(5));
        assert_eq!(calc.applied_rule_id, "default");
        assert_eq!(calc.commission_percent, 20);
    }

    #[test]
    fn test_override_beats_rules() {
        let mut book = book();
        book.overrides = vec![override_for("v-1", 5, 2), override_for("v-1", 8, 4)];

        let calc = book.calculate(&order(100000, 60, "v-1"), at(5));
        assert_eq!(calc.commission_percent, 8);
        assert_eq!(calc.applied_rule_id, "ovr-v-1-4");
        assert_eq!(calc.rule_name, "Vendor Override: Launch partner");

        // Before the later override starts, the earlier one applies
        assert_eq!(book.calculate(&order(100000, 60, "v-1"), at(3)).commission_percent, 5);
        // Other vendors are unaffected
        assert_eq!(book.calculate(&order(100000, 60, "v-2"), at(5)).applied_rule_id, "bulk");
    }

    #[test]
    fn test_effective_window_and_inactive() {
        let mut expired = rule("summer", CommissionRuleKind::Default, 5, 0);
        expired.effective_until = Some(at(10));
        let mut disabled = rule("off", CommissionRuleKind::Default, 1, 0);
        disabled.is_active = false;
        let book = CommissionBook::new(vec![expired, disabled], vec![]);

        assert_eq!(book.calculate(&order(1000, 1, "v"), at(9)).applied_rule_id, "summer");
        // effective_until is exclusive
        assert_eq!(book.calculate(&order(1000, 1, "v"), at(10)).applied_rule_id, "default-fallback");
    }

    #[test]
    fn test_order_value_window() {
        let mut big = rule("big", CommissionRuleKind::Default, 9, 1);
        big.order_value_min = Money::from_paise(1_000_000);
        big.order_value_max = Some(Money::from_paise(5_000_000));
        let book = CommissionBook::new(vec![big], vec![]);

        assert_eq!(book.calculate(&order(999_999, 1, "v"), at(5)).applied_rule_id, "default-fallback");
        assert_eq!(book.calculate(&order(5_000_000, 1, "v"), at(5)).applied_rule_id, "big");
        assert_eq!(book.calculate(&order(5_000_001, 1, "v"), at(5)).applied_rule_id, "default-fallback");
    }

    #[test]
    fn test_commission_rounds_half_up() {
        // 18% of 2499 paise = 449.82 → 450
        let calc = CommissionBook::default().calculate(&order(2499, 1, "v"), at(5));
        assert_eq!(calc.commission_amount, Money::from_paise(450));
        assert_eq!(calc.vendor_payout, Money::from_paise(2049));
    }

    #[test]
    fn test_effective_rate() {
        let mut book = book();
        let mut bigger = rule("bulk-100", CommissionRuleKind::Volume, 8, 2);
        bigger.order_quantity_min = 100;
        book.rules.insert(0, bigger);

        let rate = book.effective_rate("v-2", Some("mugs"), at(5));
        assert_eq!(rate.base_rate, 15);
        assert!(!rate.has_override);
        let mins: Vec<u32> = rate.volume_rates.iter().map(|v| v.min_quantity).collect();
        assert_eq!(mins, vec![50, 100]);

        assert_eq!(book.effective_rate("v-1", None, at(5)).base_rate, 12);
        assert_eq!(CommissionBook::default().effective_rate("v", None, at(5)).base_rate, 18);

        book.overrides.push(override_for("v-2", 7, 1));
        let rate = book.effective_rate("v-2", Some("mugs"), at(5));
        assert!(rate.has_override);
        assert_eq!(rate.base_rate, 7);
        assert_eq!(rate.override_rate, Some(7));
        assert_eq!(rate.override_reason.as_deref(), Some("Launch partner"));
        assert!(rate.volume_rates.is_empty());
    }

    #[test]
    fn test_simulate_breakdown() {
        let sim = book().simulate(&order(450000, 60, "v-3"), at(5));
        assert_eq!(sim.calculation.applied_rule_id, "bulk");
        assert_eq!(sim.breakdown.order_value, "₹4,500");
        assert_eq!(sim.breakdown.commission_percent, "10%");
        assert_eq!(sim.breakdown.commission_amount, "₹450");
        assert_eq!(sim.breakdown.vendor_payout, "₹4,050");
        assert_eq!(sim.breakdown.rule_name, "bulk rule");
        assert_eq!(sim.effective_rate.base_rate, 20);
    }

    #[test]
    fn test_book_from_json() {
        let book: CommissionBook = serde_json::from_str(
            r#"{"rules":[{"id":"d","ruleName":"Default","ruleType":"default",
                "commissionPercent":18,"isActive":true,
                "effectiveFrom":"2024-01-01T00:00:00Z","priority":100}]}"#,
        )
        .unwrap();
        assert!(book.overrides.is_empty());
        assert_eq!(book.rules[0].rule_type, CommissionRuleKind::Default);
        assert!(book.validate().is_ok());
    }
}
