//! # wyshkit-quote
//!
//! Operator CLI for the Wyshkit tiered-pricing engine.
//!
//! ## Usage
//!
//! ```bash
//! # Price 25 mugs
//! wyshkit-quote price mug-classic 25
//!
//! # "Add 25 more to save 6%"
//! wyshkit-quote next-tier mug-classic 25
//!
//! # Bulk pricing panel
//! wyshkit-quote tiers mug-classic
//!
//! # Delivery fee for a ₹4,500 cart, 12 km away
//! wyshkit-quote delivery 4500 --distance 12 --breakdown
//!
//! # Full order summary with add-ons and surge inputs
//! wyshkit-quote quote mug-classic 60 --add-ons-file addons.json --add-on engrave \
//!     --at 2024-05-13T19:30 --weather rain
//!
//! # Check and load catalog files
//! wyshkit-quote validate tiers tiers.json
//! wyshkit-quote import tiers mug-classic tiers.json
//! wyshkit-quote import delivery delivery.json
//!
//! # Commission and vendor payout for a ₹10,000 order
//! wyshkit-quote commission 10000 --rules commission.json --vendor v-1 --quantity 60
//! wyshkit-quote validate commission commission.json
//!
//! # Show or change the free-delivery threshold
//! wyshkit-quote threshold --set 4000
//! ```
//!
//! Every command accepts `--json` for machine-readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use chrono::{NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wyshkit_core::surge::Weather;
use wyshkit_core::Money;
use wyshkit_db::Database;

use crate::commands::commission::CommissionArgs;
use crate::commands::quote::QuoteArgs;
use crate::commands::{catalog, commission, delivery, parse_local_time, parse_rupees, price};
use crate::config::QuoteConfig;
use crate::error::CliResult;

#[derive(Parser)]
#[command(name = "wyshkit-quote")]
#[command(author, version, about = "Wyshkit tiered pricing and delivery quotes")]
struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database file, overrides the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unit price, subtotal and savings for a quantity
    Price { product: String, quantity: u32 },

    /// How many more items unlock the next discount
    NextTier { product: String, quantity: u32 },

    /// Every tier of a product with its label and savings line
    Tiers { product: String },

    /// Delivery fee for a cart subtotal in rupees
    Delivery {
        #[arg(value_parser = parse_rupees)]
        subtotal: Money,

        /// Delivery distance in km (0 = unknown)
        #[arg(long, default_value_t = 0.0)]
        distance: f64,

        /// Also list every delivery tier
        #[arg(long)]
        breakdown: bool,
    },

    /// Full order summary: items, add-ons, delivery and total
    Quote {
        product: String,
        quantity: u32,

        /// Selected add-on id (repeatable)
        #[arg(long = "add-on")]
        add_ons: Vec<String>,

        /// JSON array of the product's add-ons
        #[arg(long)]
        add_ons_file: Option<PathBuf>,

        /// Delivery distance in km (0 = unknown)
        #[arg(long, default_value_t = 0.0)]
        distance: f64,

        /// Local order time for surge, e.g. 2024-05-13T19:30
        #[arg(long, value_parser = parse_local_time)]
        at: Option<NaiveDateTime>,

        /// Weather for surge: clear, rain, extreme_heat
        #[arg(long)]
        weather: Option<Weather>,

        /// Demand index 0-100 for surge
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        demand: Option<u8>,
    },

    /// Platform commission and vendor payout for an order in rupees
    Commission(CommissionCommand),

    /// Check a tier table, delivery schedule or commission book without importing it
    Validate {
        #[command(subcommand)]
        target: CatalogFile,
    },

    /// Validate and store a tier table or delivery schedule file
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },

    /// Show the free-delivery threshold, or set it in rupees
    Threshold {
        #[arg(long, value_parser = parse_rupees)]
        set: Option<Money>,
    },
}

#[derive(Args)]
struct CommissionCommand {
    #[arg(value_parser = parse_rupees)]
    order_value: Money,

    /// JSON commission book (rules and vendor overrides)
    #[arg(long)]
    rules: PathBuf,

    #[arg(long)]
    vendor: String,

    #[arg(long)]
    category: Option<String>,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// UTC time the rules are evaluated at (default: now)
    #[arg(long, value_parser = parse_local_time)]
    at: Option<NaiveDateTime>,
}

impl CommissionCommand {
    fn run(&self, json: bool) -> CliResult<()> {
        let args = CommissionArgs {
            order_value: self.order_value,
            quantity: self.quantity,
            vendor_id: &self.vendor,
            category_id: self.category.as_deref(),
            rules_file: &self.rules,
            at: self.at.map_or_else(Utc::now, |at| Utc.from_utc_datetime(&at)),
        };
        commission::commission(args, json)
    }
}

#[derive(Subcommand)]
enum CatalogFile {
    /// JSON array of pricing tiers
    Tiers { file: PathBuf },
    /// JSON array of delivery fee tiers
    Delivery { file: PathBuf },
    /// JSON commission book
    Commission { file: PathBuf },
}

#[derive(Subcommand)]
enum ImportTarget {
    /// Replace a product's tier table
    Tiers { product: String, file: PathBuf },
    /// Replace the whole delivery schedule
    Delivery { file: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> CliResult<QuoteConfig> {
    let mut config = QuoteConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

async fn run(cli: Cli, config: QuoteConfig) -> CliResult<()> {
    let json = cli.json;

    match cli.command {
        // File checks need no catalog
        Commands::Validate { target } => validate(&target, json),
        Commands::Commission(command) => command.run(json),
        command => {
            let db = commands::open_database(&config).await?;
            let result = run_with_catalog(&db, &config, command, json).await;
            db.close().await;
            result
        }
    }
}

fn validate(target: &CatalogFile, json: bool) -> CliResult<()> {
    match target {
        CatalogFile::Tiers { file } => catalog::validate_tiers(file, json),
        CatalogFile::Delivery { file } => catalog::validate_delivery(file, json),
        CatalogFile::Commission { file } => commission::validate_commission(file, json),
    }
}

async fn run_with_catalog(db: &Database, config: &QuoteConfig, command: Commands, json: bool) -> CliResult<()> {
    match command {
        Commands::Price { product, quantity } => price::price(db, &product, quantity, json).await,
        Commands::NextTier { product, quantity } => price::next_tier(db, &product, quantity, json).await,
        Commands::Tiers { product } => price::tiers(db, &product, json).await,
        Commands::Delivery {
            subtotal,
            distance,
            breakdown,
        } => delivery::delivery(db, config, subtotal, distance, breakdown, json).await,
        Commands::Quote {
            product,
            quantity,
            add_ons,
            add_ons_file,
            distance,
            at,
            weather,
            demand,
        } => {
            let args = QuoteArgs {
                product_id: &product,
                quantity,
                add_on_ids: add_ons,
                add_ons_file: add_ons_file.as_deref(),
                distance_km: distance,
                at,
                weather,
                demand,
            };
            commands::quote::quote(db, config, args, json).await
        }
        Commands::Import { target } => match target {
            ImportTarget::Tiers { product, file } => catalog::import_tiers(db, &product, &file).await,
            ImportTarget::Delivery { file } => catalog::import_delivery(db, &file).await,
        },
        Commands::Threshold { set } => delivery::threshold(db, config, set, json).await,
        Commands::Validate { target } => validate(&target, json),
        Commands::Commission(command) => command.run(json),
    }
}
