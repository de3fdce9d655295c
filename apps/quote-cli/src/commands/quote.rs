//! `quote`: the full order summary for one product line.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};
use wyshkit_core::quote::{build_quote, OrderSummary, QuoteRequest};
use wyshkit_core::surge::{SurgeContext, Weather};
use wyshkit_core::validation::{validate_distance, validate_quantity};
use wyshkit_core::AddOn;
use wyshkit_db::Database;

use super::delivery::load_schedule;
use super::{print_json, read_json};
use crate::config::QuoteConfig;
use crate::error::{CliError, CliResult};

/// Everything `quote` needs besides the catalog.
#[derive(Debug, Clone, Default)]
pub struct QuoteArgs<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
    pub add_on_ids: Vec<String>,
    pub add_ons_file: Option<&'a Path>,
    pub distance_km: f64,
    pub at: Option<NaiveDateTime>,
    pub weather: Option<Weather>,
    pub demand: Option<u8>,
}

impl QuoteArgs<'_> {
    /// Surge is evaluated only when some surge input was given; a bare
    /// `--weather` or `--demand` uses the current local time.
    fn surge_context(&self) -> Option<SurgeContext> {
        if self.at.is_none() && self.weather.is_none() && self.demand.is_none() {
            return None;
        }

        let mut context = SurgeContext::new(self.at.unwrap_or_else(|| Local::now().naive_local()));
        if let Some(weather) = self.weather {
            context = context.with_weather(weather);
        }
        if let Some(demand) = self.demand {
            context = context.with_demand(demand);
        }
        Some(context)
    }

    fn request(&self) -> QuoteRequest {
        let request = QuoteRequest::new(self.quantity)
            .with_add_ons(self.add_on_ids.clone())
            .with_distance(self.distance_km);

        match self.surge_context() {
            Some(context) => request.with_surge(context),
            None => request,
        }
    }
}

pub async fn quote(db: &Database, config: &QuoteConfig, args: QuoteArgs<'_>, json: bool) -> CliResult<()> {
    validate_quantity(args.quantity)?;
    validate_distance(args.distance_km)?;

    let add_ons: Vec<AddOn> = match args.add_ons_file {
        Some(path) => {
            let add_ons: Vec<AddOn> = read_json(path)?;
            // Every selected id must exist in the file
            if let Some(id) = args.add_on_ids.iter().find(|id| !add_ons.iter().any(|a| &a.id == *id)) {
                return Err(CliError::InvalidArgument(format!(
                    "add-on '{id}' is not in {}",
                    path.display()
                )));
            }
            add_ons
        }
        None => {
            if !args.add_on_ids.is_empty() {
                warn!("--add-on given without --add-ons-file; add-ons will not be charged");
            }
            Vec::new()
        }
    };

    let table = db.pricing_tiers().get_table(args.product_id).await?;
    let schedule = load_schedule(db, config).await?;
    let summary = build_quote(&table, &schedule, &add_ons, &args.request());

    info!(
        product_id = %args.product_id,
        quantity = args.quantity,
        total = %summary.total,
        "Built order summary"
    );

    if json {
        return print_json(&summary);
    }
    print!("{}", render_summary(args.product_id, &summary));
    Ok(())
}

fn render_summary(product_id: &str, summary: &OrderSummary) -> String {
    let mut out = format!("{} × {}\n", product_id, summary.quantity);
    out.push_str(&format!(
        "  Items:      {} ({} each, {}% off)\n",
        summary.items_subtotal, summary.price_per_item, summary.discount_percent
    ));
    if summary.add_ons_total.is_positive() {
        out.push_str(&format!("  Add-ons:    {}\n", summary.add_ons_total));
    }
    out.push_str(&format!("  Delivery:   {}\n", summary.delivery_fee));
    if let Some(surge) = &summary.surge {
        let reason = surge.reason.as_deref().unwrap_or("Surge pricing applied");
        out.push_str(&format!("              {reason}\n"));
    }
    out.push_str(&format!("  Total:      {}\n", summary.total));
    out.push('\n');
    out.push_str(&format!("  {}\n", summary.delivery_message));
    for line in [&summary.savings_message, &summary.next_tier_message].into_iter().flatten() {
        out.push_str(&format!("  {line}\n"));
    }
    if let Some(warning) = &summary.customization_warning {
        out.push_str(&format!("  ⚠ {warning}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wyshkit_core::{DeliveryFeeSchedule, Money, PricingTier, TierTable};

    fn args(quantity: u32) -> QuoteArgs<'static> {
        QuoteArgs {
            product_id: "mug-classic",
            quantity,
            ..QuoteArgs::default()
        }
    }

    #[test]
    fn test_no_surge_without_inputs() {
        assert!(args(10).request().surge.is_none());
    }

    #[test]
    fn test_surge_context_from_inputs() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 13)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        let request = QuoteArgs {
            at: Some(at),
            weather: Some(Weather::Rain),
            ..args(10)
        }
        .request();

        let context = request.surge.unwrap();
        assert_eq!(context.at, at);
        assert_eq!(context.weather, Some(Weather::Rain));
        assert_eq!(context.demand, None);
    }

    #[test]
    fn test_render_summary() {
        let table = TierTable::new(vec![
            PricingTier::new(1, Some(9), Money::from_paise(50000), 0),
            PricingTier::new(10, None, Money::from_paise(45000), 10),
        ])
        .unwrap();
        let summary = build_quote(&table, &DeliveryFeeSchedule::default(), &[], &QuoteRequest::new(5));

        let out = render_summary("mug-classic", &summary);
        assert!(out.starts_with("mug-classic × 5\n"));
        assert!(out.contains("Items:      ₹2,500 (₹500 each, 0% off)"));
        assert!(out.contains("Delivery:   ₹30"));
        assert!(out.contains("Total:      ₹2,530"));
        assert!(out.contains("Add 5 more to save 10%"));
        assert!(!out.contains("Add-ons"));
        assert!(!out.contains('⚠'));
    }
}
