//! # Seed Data Generator
//!
//! Populates a catalog with sample gifting products and the standard
//! delivery schedule for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./wyshkit_dev.db
//! cargo run -p wyshkit-db --bin seed
//!
//! # Specify database path
//! cargo run -p wyshkit-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - One tier table per product: the standard four-band ladder
//!   (100% / 93% / 87% / 80% of the base price) unless the product below
//!   carries its own bands
//! - Delivery bands ₹0-999 → ₹80, ₹1000-2499 → ₹50, ₹2500-4999 → ₹30,
//!   ₹5000+ → free

use std::env;

use tracing_subscriber::EnvFilter;
use wyshkit_core::delivery::default_delivery_tiers;
use wyshkit_core::pricing::default_tiers;
use wyshkit_core::{Money, PricingTier};
use wyshkit_db::{Database, DbConfig};

/// (product id, base price in rupees)
const PRODUCTS: &[(&str, i64)] = &[
    ("mug-classic", 299),
    ("mug-magic", 449),
    ("diary-a5-leather", 599),
    ("pen-metal-engraved", 199),
    ("hamper-festive-small", 1499),
    ("hamper-festive-large", 2999),
    ("tshirt-cotton-printed", 399),
    ("bottle-steel-750", 549),
    ("keychain-wooden", 99),
    ("photo-frame-a4", 699),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./wyshkit_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Wyshkit Pricing Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./wyshkit_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Wyshkit Pricing Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.pricing_tiers().count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has tier tables for {} products", existing);
        println!("  Skipping seed to avoid overwriting seller data.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Writing tier tables...");

    let repo = db.pricing_tiers();
    for (product_id, base_rupees) in PRODUCTS {
        let base = Money::from_rupees(*base_rupees);
        let table = repo.replace_tiers(product_id, default_tiers(base).tiers()).await?;
        println!("  {:<24} {} tiers from {}", product_id, table.len(), base);
    }

    // A seller-defined three-band table, as used in the storefront demo
    let custom = [
        PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
        PricingTier::new(10, Some(49), Money::from_paise(900), 10),
        PricingTier::new(50, None, Money::from_paise(800), 20),
    ];
    repo.replace_tiers("sticker-pack-custom", &custom).await?;
    println!("  {:<24} {} tiers (custom)", "sticker-pack-custom", custom.len());

    println!();
    println!("Writing delivery schedule...");

    let fees = db.delivery_fees();
    let delivery_tiers = default_delivery_tiers();
    fees.replace_all(&delivery_tiers).await?;
    for tier in &delivery_tiers {
        println!("  {:<24} {}", tier.rule_name, tier.fee_amount);
    }
    println!("  Free delivery from {}", fees.free_threshold().await?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
