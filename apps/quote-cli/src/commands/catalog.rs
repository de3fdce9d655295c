//! `validate` and `import`: checking and loading seller tier tables and the
//! admin delivery schedule from JSON files.
//!
//! ## File Formats
//! ```text
//! tiers.json      [{"minQty":1,"maxQty":9,"pricePerItem":1000,"discountPercent":0}, ...]
//! delivery.json   [{"id":"tier-1","ruleName":"Tier 1","orderValueMin":0,
//!                   "orderValueMax":99900,"feeAmount":8000,"distanceMinKm":null,
//!                   "distanceMaxKm":null,"distanceSurcharge":0,"isActive":true,
//!                   "priority":1}, ...]
//! ```

use std::fmt::Display;
use std::path::Path;

use serde::Serialize;
use tracing::info;
use wyshkit_core::validation::{validate_delivery_schedule, validate_pricing_tiers, ValidationReport};
use wyshkit_core::{DeliveryFeeTier, PricingTier};
use wyshkit_db::Database;

use super::{print_json, read_json};
use crate::error::{CliError, CliResult};

pub fn validate_tiers(path: &Path, json: bool) -> CliResult<()> {
    let tiers: Vec<PricingTier> = read_json(path)?;
    report(validate_pricing_tiers(&tiers), json)
}

pub fn validate_delivery(path: &Path, json: bool) -> CliResult<()> {
    let tiers: Vec<DeliveryFeeTier> = read_json(path)?;
    report(validate_delivery_schedule(&tiers), json)
}

pub async fn import_tiers(db: &Database, product_id: &str, path: &Path) -> CliResult<()> {
    let tiers: Vec<PricingTier> = read_json(path)?;
    let table = db.pricing_tiers().replace_tiers(product_id, &tiers).await?;

    info!(product_id = %product_id, tiers = table.len(), "Imported tier table");
    println!("✓ Imported {} tiers for {}", table.len(), product_id);
    Ok(())
}

pub async fn import_delivery(db: &Database, path: &Path) -> CliResult<()> {
    let tiers: Vec<DeliveryFeeTier> = read_json(path)?;
    db.delivery_fees().replace_all(&tiers).await?;

    info!(tiers = tiers.len(), "Imported delivery schedule");
    println!("✓ Imported {} delivery fee tiers", tiers.len());
    Ok(())
}

/// Prints a report; any issue makes the command fail.
pub(crate) fn report<I: Display + Serialize>(report: ValidationReport<I>, json: bool) -> CliResult<()> {
    if json {
        print_json(&report)?;
    } else {
        print!("{}", render_report(&report));
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::ValidationFailed(report.issues.len()))
    }
}

fn render_report<I: Display>(report: &ValidationReport<I>) -> String {
    if report.is_valid() {
        return "✓ Valid\n".to_string();
    }
    report
        .issues
        .iter()
        .map(|issue| format!("✗ {issue}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wyshkit_core::validation::TierIssue;

    #[test]
    fn test_render_report() {
        let valid: ValidationReport<TierIssue> = ValidationReport { issues: vec![] };
        assert_eq!(render_report(&valid), "✓ Valid\n");

        let invalid = ValidationReport {
            issues: vec![TierIssue::LastTierBounded, TierIssue::Gap { tier: 1 }],
        };
        assert_eq!(
            render_report(&invalid),
            "✗ Last tier must be open-ended (no max quantity)\n✗ Gap between tier 1 and tier 2\n"
        );
    }

    #[test]
    fn test_report_fails_on_issues() {
        let invalid = ValidationReport { issues: vec![TierIssue::Empty] };
        assert!(matches!(report(invalid, false), Err(CliError::ValidationFailed(1))));
    }
}
