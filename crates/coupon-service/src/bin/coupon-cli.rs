//! # coupon-cli
//!
//! Command-line front end for the coupon engine.
//!
//! ```text
//! coupon-cli price p-1 p-7 --card GCARD-0042 --total 150000
//! coupon-cli price p-1 --date 2024-02-10 --catalog fixtures/coupons.json
//! coupon-cli check fixtures/coupons.json
//! ```
//!
//! `price` prints the pricing result as JSON on stdout. `check` prints one
//! line per catalog entry that would be rejected. Failures are printed to
//! stderr as `{ "code": ..., "message": ... }` and exit with status 1.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use coupon_core::validation::validate_coupon;
use coupon_core::Money;
use coupon_service::config::ServiceConfig;
use coupon_service::error::{Collaborator, ErrorCode, ErrorReport, ServiceError, ServiceResult};
use coupon_service::memory::{parse_catalog, InMemoryCouponCatalog, InMemoryProductDirectory};
use coupon_service::service::{PricingRequest, PricingService};
use coupon_service::telemetry::init_tracing;
use coupon_service::RequestContext;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "coupon-cli", about = "Coupon discount resolution", long_about = None)]
struct Cli {
    /// Path to coupon.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "COUPON_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cart and print the applied discounts
    Price(PriceArgs),
    /// Report catalog entries that would be rejected
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct PriceArgs {
    /// Product ids, one per unit bought
    #[arg(required = true)]
    product_ids: Vec<String>,

    /// Loyalty card number
    #[arg(long)]
    card: Option<String>,

    /// Caller-computed cart total, used instead of the sum of prices
    #[arg(long)]
    total: Option<Money>,

    /// Business date to price on (YYYY-MM-DD), instead of today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Product file, overrides the configured one
    #[arg(long)]
    products: Option<PathBuf>,

    /// Coupon catalog file, overrides the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Coupon catalog file, defaults to the configured one
    catalog: Option<PathBuf>,
}

/// What a successful command produced.
enum Outcome {
    Clean,
    ProblemsFound,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ServiceConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing(coupon_service::telemetry::DEFAULT_LOG_FILTER);
            return report(&ServiceError::from(err));
        }
    };
    init_tracing(&config.logging.filter);
    debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Price(args) => run_price(&config, args).await,
        Commands::Check(args) => run_check(&config, args),
    };

    match result {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::ProblemsFound) => ExitCode::FAILURE,
        Err(err) => report(&err),
    }
}

fn report(err: &ServiceError) -> ExitCode {
    let report = ErrorReport::from(err);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{}: {}", report.code, report.message),
    }
    ExitCode::FAILURE
}

// =============================================================================
// price
// =============================================================================

async fn run_price(config: &ServiceConfig, args: PriceArgs) -> ServiceResult<Outcome> {
    let products_path = required_path(args.products, &config.sources.products_path, "products")?;
    let catalog_path = required_path(args.catalog, &config.sources.catalog_path, "catalog")?;

    let products = InMemoryProductDirectory::from_json_file(&products_path)
        .map_err(|e| ServiceError::upstream(Collaborator::ProductDirectory, e))?;
    let catalog = InMemoryCouponCatalog::from_json_file(&catalog_path)
        .map_err(|e| ServiceError::upstream(Collaborator::CouponCatalog, e))?;

    let service = PricingService::from_config(config, Arc::new(products), Arc::new(catalog))?;

    let mut request = PricingRequest::new(args.product_ids);
    request.total_amount = args.total;
    request.card_number = args.card;

    let now = match args.date {
        Some(date) => instant_on(config, date)?,
        None => Utc::now(),
    };

    let ctx = RequestContext::new();
    info!(request_id = %ctx.request_id, "Pricing from command line");
    let result = service.apply_at(&ctx, &request, now).await?;

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| ServiceError::InvalidRequest(format!("cannot render result: {e}")))?;
    println!("{json}");

    Ok(Outcome::Clean)
}

/// Noon of `date` in the store time zone, as a UTC instant.
fn instant_on(config: &ServiceConfig, date: NaiveDate) -> ServiceResult<DateTime<Utc>> {
    let offset = config.utc_offset()?;
    NaiveTime::from_hms_opt(12, 0, 0)
        .and_then(|noon| offset.from_local_datetime(&date.and_time(noon)).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ServiceError::InvalidRequest(format!("date out of range: {date}")))
}

fn required_path(
    flag: Option<PathBuf>,
    configured: &Option<PathBuf>,
    what: &str,
) -> ServiceResult<PathBuf> {
    flag.or_else(|| configured.clone()).ok_or_else(|| {
        ServiceError::InvalidRequest(format!(
            "no {what} file given: pass --{what} or set it in coupon.toml"
        ))
    })
}

// =============================================================================
// check
// =============================================================================

fn run_check(config: &ServiceConfig, args: CheckArgs) -> ServiceResult<Outcome> {
    let path = required_path(args.catalog, &config.sources.catalog_path, "catalog")?;
    let contents = read_catalog(&path)?;
    let file = parse_catalog(&contents)
        .map_err(|e| ServiceError::upstream(Collaborator::CouponCatalog, e))?;

    let mut problems = 0usize;

    for rejected in &file.rejected {
        problems += 1;
        println!(
            "entry {} ({}): {}: {}",
            rejected.index,
            rejected.id.as_deref().unwrap_or("no id"),
            ErrorCode::InvalidRequest,
            rejected.reason
        );
    }

    for coupon in &file.coupons {
        if let Err(err) = validate_coupon(coupon) {
            problems += 1;
            let report = ErrorReport::from(&err);
            println!("{} ({}): {}: {}", coupon.id, coupon.name, report.code, report.message);
        }
    }

    println!(
        "{} coupons checked, {} problems",
        file.coupons.len() + file.rejected.len(),
        problems
    );

    Ok(if problems == 0 {
        Outcome::Clean
    } else {
        Outcome::ProblemsFound
    })
}

fn read_catalog(path: &Path) -> ServiceResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ServiceError::upstream(Collaborator::CouponCatalog, e.into()))
}
