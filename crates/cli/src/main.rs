//! Storefront CLI - browse the product catalog and manage the cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # List electronics, cheapest first, second page
//! storefront products --category electronics --sort price-asc --page 2
//!
//! # Show a product by ID or slug
//! storefront product mens-cotton-jacket-3
//!
//! # Add two of product 3 to the cart
//! storefront cart add 3 --qty 2
//!
//! # Move a saved product into the cart
//! storefront wishlist move 5
//! ```
//!
//! Cart and wishlist are persisted under `STOREFRONT_DATA_DIR` and survive
//! between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use storefront::catalog::SortOrder;
use storefront::{AppError, AppState, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Browse the catalog and manage your cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products(ListArgs),
    /// Show one product by ID or slug
    Product {
        /// Product ID or slug (e.g. `mens-cotton-jacket-3`)
        reference: String,
    },
    /// List categories
    Categories,
    /// Search product titles and descriptions
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// Minimum price (inclusive)
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price (inclusive)
    #[arg(long)]
    max_price: Option<Decimal>,

    /// featured, price-asc, price-desc, title or rating
    #[arg(long, default_value = "featured")]
    sort: SortOrder,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Override `STOREFRONT_PAGE_SIZE`
    #[arg(long)]
    per_page: Option<usize>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a product
    Add {
        id: i64,

        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        id: i64,

        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a product
    Remove { id: i64 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { id: i64 },
    /// Remove a saved product
    Remove { id: i64 },
    /// Save or unsave a product
    Toggle { id: i64 },
    /// Move a saved product into the cart
    Move { id: i64 },
    /// Remove every saved product
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront=info,storefront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            AppError::from(e).report();
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        e.report();
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut state = AppState::from_config(config)?;

    match cli.command {
        Commands::Products(args) => {
            let query = commands::products::ListQuery {
                filter: storefront::catalog::ProductFilter {
                    category: args.category,
                    min_price: args.min_price,
                    max_price: args.max_price,
                },
                sort: args.sort,
                page: args.page,
                per_page: args.per_page,
            };
            commands::products::list(&state, query).await?;
        }
        Commands::Product { reference } => commands::products::show(&state, &reference).await?,
        Commands::Categories => commands::products::categories(&state).await?,
        Commands::Search { query, page } => commands::products::search(&state, &query, page).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, qty } => commands::cart::add(&mut state, id, qty).await?,
            CartAction::Update { id, qty } => commands::cart::update(&mut state, id, qty)?,
            CartAction::Remove { id } => commands::cart::remove(&mut state, id)?,
            CartAction::Clear => commands::cart::clear(&mut state),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&state),
            WishlistAction::Add { id } => commands::wishlist::add(&mut state, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&mut state, id)?,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&mut state, id).await?,
            WishlistAction::Move { id } => commands::wishlist::move_to_cart(&mut state, id)?,
            WishlistAction::Clear => commands::wishlist::clear(&mut state),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_products_flags() {
        let cli = Cli::try_parse_from([
            "storefront",
            "products",
            "--category",
            "jewelery",
            "--min-price",
            "10.5",
            "--sort",
            "price-desc",
            "--page",
            "2",
        ])
        .ok();

        let Some(Cli {
            command: Commands::Products(args),
        }) = cli
        else {
            panic!("expected products command");
        };
        assert_eq!(args.category.as_deref(), Some("jewelery"));
        assert_eq!(args.min_price, Some(Decimal::new(105, 1)));
        assert_eq!(args.sort, SortOrder::PriceDescending);
        assert_eq!(args.page, 2);
    }

    #[test]
    fn test_parse_negative_cart_quantity() {
        let cli = Cli::try_parse_from(["storefront", "cart", "update", "3", "-1"]).ok();
        assert!(matches!(
            cli,
            Some(Cli {
                command: Commands::Cart {
                    action: CartAction::Update { id: 3, qty: -1 }
                }
            })
        ));
    }
}
