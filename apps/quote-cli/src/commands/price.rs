//! `price`, `next-tier` and `tiers`: read-only views of one product's
//! tier table.

use tracing::info;
use wyshkit_core::pricing::TierBreakpoint;
use wyshkit_core::{CalculatedPrice, NextTierInfo, TierTable};
use wyshkit_db::Database;

use super::print_json;
use crate::error::CliResult;

pub async fn price(db: &Database, product_id: &str, quantity: u32, json: bool) -> CliResult<()> {
    let table = db.pricing_tiers().get_table(product_id).await?;
    let price = table.resolve(quantity);
    info!(product_id = %product_id, quantity, subtotal = %price.subtotal, "Resolved price");

    if json {
        return print_json(&price);
    }
    print!("{}", render_price(product_id, &price));
    Ok(())
}

pub async fn next_tier(db: &Database, product_id: &str, quantity: u32, json: bool) -> CliResult<()> {
    let table = db.pricing_tiers().get_table(product_id).await?;
    let next = table.next_tier(quantity);

    if json {
        return print_json(&next);
    }
    println!("{}", render_next_tier(&next));
    Ok(())
}

pub async fn tiers(db: &Database, product_id: &str, json: bool) -> CliResult<()> {
    let table: TierTable = db.pricing_tiers().get_table(product_id).await?;
    let breakpoints = table.breakpoints();

    if json {
        return print_json(&breakpoints);
    }
    println!("{product_id}");
    print!("{}", render_breakpoints(&breakpoints));
    Ok(())
}

fn render_price(product_id: &str, price: &CalculatedPrice) -> String {
    let mut out = format!("{} × {}\n", product_id, price.quantity);
    out.push_str(&format!(
        "  Tier:        {} ({}% off)\n",
        price.applied_tier.range_label(),
        price.discount_percent
    ));
    out.push_str(&format!("  Unit price:  {}\n", price.price_per_item));
    out.push_str(&format!("  Subtotal:    {}\n", price.subtotal));
    if price.savings.is_positive() {
        out.push_str(&format!("  You save:    {}\n", price.savings));
    }
    out
}

fn render_next_tier(next: &NextTierInfo) -> String {
    match &next.message {
        Some(message) => message.clone(),
        None => "Best price already unlocked".to_string(),
    }
}

fn render_breakpoints(breakpoints: &[TierBreakpoint]) -> String {
    breakpoints
        .iter()
        .map(|row| {
            let line = format!(
                "  {:<10} {:>10}  {:>3}% off  {}",
                row.range_label,
                row.price_per_item.to_string(),
                row.discount_percent,
                row.savings_message.as_deref().unwrap_or("")
            );
            format!("{}\n", line.trim_end())
        })
        .collect()
}
