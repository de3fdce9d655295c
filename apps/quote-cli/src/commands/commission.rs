//! `commission`: what the platform keeps from an order and what the vendor
//! is paid, from an admin commission book file.
//!
//! ## File Format
//! ```text
//! commission.json  {"rules":[{"id":"default","ruleName":"Default","ruleType":"default",
//!                    "commissionPercent":18,"isActive":true,
//!                    "effectiveFrom":"2024-01-01T00:00:00Z","priority":100}, ...],
//!                   "overrides":[...]}
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use wyshkit_core::commission::{CommissionOrder, CommissionSimulation};
use wyshkit_core::validation::validate_commission_book;
use wyshkit_core::{CommissionBook, Money};

use super::catalog::report;
use super::{print_json, read_json};
use crate::error::CliResult;

pub struct CommissionArgs<'a> {
    pub order_value: Money,
    pub quantity: u32,
    pub vendor_id: &'a str,
    pub category_id: Option<&'a str>,
    pub rules_file: &'a Path,
    pub at: DateTime<Utc>,
}

pub fn commission(args: CommissionArgs<'_>, json: bool) -> CliResult<()> {
    let book: CommissionBook = read_json(args.rules_file)?;
    if let Err(e) = book.validate() {
        // Calculation still works on a bad book; the admin sees why it may be off
        warn!(error = %e, "Commission book has issues");
    }

    let mut order = CommissionOrder::new(args.order_value, args.quantity, args.vendor_id);
    if let Some(category_id) = args.category_id {
        order = order.with_category(category_id);
    }

    let simulation = book.simulate(&order, args.at);
    info!(
        vendor_id = %args.vendor_id,
        rule = %simulation.calculation.applied_rule_id,
        percent = simulation.calculation.commission_percent,
        "Calculated commission"
    );

    if json {
        print_json(&simulation)
    } else {
        print!("{}", render_simulation(&simulation));
        Ok(())
    }
}

pub fn validate_commission(path: &Path, json: bool) -> CliResult<()> {
    let book: CommissionBook = read_json(path)?;
    report(validate_commission_book(&book), json)
}

fn render_simulation(simulation: &CommissionSimulation) -> String {
    let b = &simulation.breakdown;
    let mut out = format!(
        "Order value:   {}\nCommission:    {} ({})\nVendor payout: {}\nRule:          {}\n",
        b.order_value, b.commission_amount, b.commission_percent, b.vendor_payout, b.rule_name
    );

    let rate = &simulation.effective_rate;
    if rate.has_override {
        out.push_str(&format!("Vendor rate:   {}% (override)\n", rate.base_rate));
    } else {
        out.push_str(&format!("Vendor rate:   {}%\n", rate.base_rate));
        for band in &rate.volume_rates {
            let range = match band.max_quantity {
                Some(max) => format!("{}-{}", band.min_quantity, max),
                None => format!("{}+", band.min_quantity),
            };
            out.push_str(&format!("  {range} items: {}%\n", band.rate));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r#"{
        "rules": [
            {"id": "default", "ruleName": "Default", "ruleType": "default",
             "commissionPercent": 18, "isActive": true,
             "effectiveFrom": "2024-01-01T00:00:00Z", "priority": 100},
            {"id": "bulk", "ruleName": "Bulk 50+", "ruleType": "volume",
             "orderQuantityMin": 50, "commissionPercent": 12, "isActive": true,
             "effectiveFrom": "2024-01-01T00:00:00Z", "priority": 10}
        ]
    }"#;

    fn simulate(quantity: u32) -> CommissionSimulation {
        let book: CommissionBook = serde_json::from_str(BOOK).unwrap();
        let order = CommissionOrder::new(Money::from_paise(1_000_000), quantity, "v-1");
        let at = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z").unwrap().with_timezone(&Utc);
        book.simulate(&order, at)
    }

    #[test]
    fn test_render_simulation() {
        let text = render_simulation(&simulate(60));
        assert_eq!(
            text,
            "Order value:   ₹10,000\n\
             Commission:    ₹1,200 (12%)\n\
             Vendor payout: ₹8,800\n\
             Rule:          Bulk 50+\n\
             Vendor rate:   18%\n  \
             50+ items: 12%\n"
        );
    }

    #[test]
    fn test_small_order_uses_default_rule() {
        let simulation = simulate(5);
        assert_eq!(simulation.calculation.applied_rule_id, "default");
        assert_eq!(simulation.calculation.commission_amount, Money::from_paise(180_000));
    }

    #[test]
    fn test_validate_commission_reports_issues() {
        let path = std::env::temp_dir().join(format!("wyshkit-commission-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"rules": []}"#).unwrap();
        let result = validate_commission(&path, false);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(crate::error::CliError::ValidationFailed(1))));
    }
}
