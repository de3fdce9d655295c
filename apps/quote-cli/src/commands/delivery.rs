//! `delivery` and `threshold`.

use serde_json::json;
use tracing::{info, warn};
use wyshkit_core::delivery::{DeliveryBanner, DeliveryBreakdown};
use wyshkit_core::validation::validate_distance;
use wyshkit_core::{DeliveryFeeCalculation, DeliveryFeeSchedule, Money};
use wyshkit_db::Database;

use super::print_json;
use crate::config::QuoteConfig;
use crate::error::CliResult;

/// Catalog schedule with the operator's config layered on top.
pub async fn load_schedule(db: &Database, config: &QuoteConfig) -> CliResult<DeliveryFeeSchedule> {
    let schedule = db
        .delivery_fees()
        .schedule(config.delivery.fallback_fee())
        .await?;

    if schedule.tiers().is_empty() {
        warn!("Delivery schedule is empty; every order pays the fallback fee");
    }
    Ok(config.delivery.apply_to(schedule))
}

pub async fn delivery(
    db: &Database,
    config: &QuoteConfig,
    subtotal: Money,
    distance_km: f64,
    show_breakdown: bool,
    json: bool,
) -> CliResult<()> {
    validate_distance(distance_km)?;

    let schedule = load_schedule(db, config).await?;
    let calc = schedule.resolve(subtotal, distance_km);
    let banner = schedule.banner(&calc);
    let progress = schedule.progress_percent(subtotal);
    let breakdown = show_breakdown.then(|| schedule.breakdown(subtotal));

    info!(subtotal = %subtotal, fee = %calc.fee, "Resolved delivery fee");

    if json {
        return print_json(&json!({
            "calculation": calc,
            "banner": banner,
            "progressPercent": progress,
            "breakdown": breakdown,
        }));
    }

    print!("{}", render_delivery(subtotal, &calc, &banner, progress));
    if let Some(breakdown) = &breakdown {
        print!("{}", render_breakdown(breakdown));
    }
    Ok(())
}

/// Shows the threshold, or stores a new one when `set` is given.
pub async fn threshold(db: &Database, config: &QuoteConfig, set: Option<Money>, json: bool) -> CliResult<()> {
    let repo = db.delivery_fees();

    if let Some(value) = set {
        repo.set_free_threshold(value).await?;
        info!(threshold = %value, "Stored free delivery threshold");
    }

    let stored = repo.free_threshold().await?;
    let effective = config
        .delivery
        .free_threshold_paise
        .map_or(stored, Money::from_paise);

    if json {
        return print_json(&json!({ "stored": stored, "effective": effective }));
    }

    println!("Free delivery from {stored}");
    if effective != stored {
        println!("  Overridden by configuration: {effective}");
    }
    Ok(())
}

fn render_delivery(
    subtotal: Money,
    calc: &DeliveryFeeCalculation,
    banner: &DeliveryBanner,
    progress: u8,
) -> String {
    let mut out = format!("Cart subtotal {subtotal}\n");
    out.push_str(&format!("  Fee:       {}\n", calc.fee));
    if calc.distance_surcharge.is_positive() {
        out.push_str(&format!("  Distance:  +{}\n", calc.distance_surcharge));
    }
    if let Some(tier) = &calc.applied_tier_id {
        out.push_str(&format!("  Tier:      {tier}\n"));
    }
    out.push_str(&format!("  Progress:  {progress}%\n"));
    out.push_str(&format!("  {} {}\n", banner.icon, banner.message));
    out
}

fn render_breakdown(breakdown: &DeliveryBreakdown) -> String {
    let mut out = String::from("Tiers\n");
    for status in &breakdown.tiers {
        let marker = if status.is_current {
            "▶"
        } else if status.is_reached {
            "✓"
        } else {
            " "
        };
        out.push_str(&format!(
            "  {} {:<24} {}\n",
            marker, status.tier.rule_name, status.tier.fee_amount
        ));
    }
    if breakdown.amount_to_next_tier.is_positive() {
        out.push_str(&format!("  Next tier in {}\n", breakdown.amount_to_next_tier));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_delivery_close_to_free() {
        let schedule = DeliveryFeeSchedule::default();
        let subtotal = Money::from_paise(450000);
        let calc = schedule.resolve(subtotal, 0.0);
        let banner = schedule.banner(&calc);

        let out = render_delivery(subtotal, &calc, &banner, schedule.progress_percent(subtotal));
        assert!(out.starts_with("Cart subtotal ₹4,500\n"));
        assert!(out.contains("Fee:       ₹30"));
        assert!(out.contains("Tier:      tier-3"));
        assert!(out.contains("Progress:  90%"));
        assert!(!out.contains("Distance"));
    }

    #[test]
    fn test_render_breakdown_marks_current() {
        let schedule = DeliveryFeeSchedule::default();
        let out = render_breakdown(&schedule.breakdown(Money::from_paise(150000)));

        let current: Vec<&str> = out.lines().filter(|line| line.contains('▶')).collect();
        assert_eq!(current.len(), 1);
        assert!(current[0].contains("Tier 2"));
        assert!(out.lines().any(|line| line.contains('✓') && line.contains("Tier 1")));
    }
}
