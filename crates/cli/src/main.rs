//! Lumina CLI - browse the catalogue, manage the cart and check out from a
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! lumina products list
//! lumina products search "lip balm"
//!
//! # Cart
//! lumina cart add COSM24001 --qty 2
//! lumina cart add COSM24001 --qty -1
//! lumina cart list
//!
//! # Checkout
//! lumina login -e shopper@example.com
//! lumina checkout --phone 0771234567 --address "12 Palm Grove" --payment card
//! ```
//!
//! # Environment Variables
//!
//! - `LUMINA_API_URL` - Backend base URL (required)
//! - `LUMINA_DATA_DIR` - Local storage profile directory (default: `.lumina`)
//! - `LUMINA_PASSWORD` - Password for `login` / `register` when not passed
//! - `RUST_LOG` - Log filter (default: `lumina_storefront=info,lumina_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use lumina_core::{OrderId, PaymentMethod, ProductId, ReviewId};
use lumina_storefront::error::AppError;
use lumina_storefront::orders::StatusFilter;
use lumina_storefront::reviews::ReviewSort;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "lumina")]
#[command(author, version, about = "Lumina Beauty storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View and change the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the catalogue
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Read and write product reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Sign in with email and password, or a Google access token
    Login {
        /// Account email address
        #[arg(short, long, required_unless_present = "google_token")]
        email: Option<String>,

        /// Account password
        #[arg(short, long, env = "LUMINA_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Google OAuth access token to exchange instead of a password
        #[arg(long, conflicts_with = "email")]
        google_token: Option<String>,
    },
    /// Forget the stored sign-in
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "LUMINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Delivery address
        #[arg(long)]
        address: String,

        /// Payment method (cash, card, bank)
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },
    /// View and manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show line items and totals
    List,
    /// Add units of a product (negative quantity takes units away)
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a product's line item
    Remove { product_id: ProductId },
    /// Empty the cart
    Clear,
    /// Print the cart total
    Total,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List every product
    List,
    /// Show one product
    Show { product_id: ProductId },
    /// Search products by name
    Search { query: String },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List a product's reviews
    List {
        product_id: ProductId,

        /// Sort order (newest, highest, lowest)
        #[arg(long, default_value = "newest")]
        sort: ReviewSort,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Review a product
    Add {
        product_id: ProductId,

        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: String,

        /// Name shown on the review
        #[arg(long)]
        name: String,

        /// Email recorded with the review
        #[arg(long)]
        email: String,
    },
    /// Vote a review helpful or not helpful
    Vote {
        review_id: ReviewId,

        /// Mark the review as not helpful
        #[arg(long)]
        not_helpful: bool,
    },
    /// Delete a review (author or admin)
    Delete { review_id: ReviewId },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        /// Only show orders with this status (or `all`)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Change an order's status (admin)
    SetStatus {
        order_id: OrderId,
        status: lumina_core::OrderStatus,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumina_storefront=info,lumina_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        commands::report_error(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let ctx = Context::load()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&ctx),
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&ctx, &product_id, qty).await?;
            }
            CartAction::Remove { product_id } => commands::cart::remove(&ctx, &product_id),
            CartAction::Clear => commands::cart::clear(&ctx),
            CartAction::Total => commands::cart::total(&ctx),
        },
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&ctx).await?,
            ProductAction::Show { product_id } => {
                commands::products::show(&ctx, &product_id).await?;
            }
            ProductAction::Search { query } => commands::products::search(&ctx, &query).await?,
        },
        Commands::Reviews { action } => match action {
            ReviewAction::List {
                product_id,
                sort,
                page,
            } => commands::reviews::list(&ctx, &product_id, sort, page).await?,
            ReviewAction::Add {
                product_id,
                rating,
                comment,
                name,
                email,
            } => {
                let author = commands::reviews::Author {
                    name: &name,
                    email: &email,
                };
                commands::reviews::add(&ctx, product_id, rating, comment, &author).await?;
            }
            ReviewAction::Vote {
                review_id,
                not_helpful,
            } => commands::reviews::vote(&ctx, &review_id, !not_helpful).await?,
            ReviewAction::Delete { review_id } => {
                commands::reviews::delete(&ctx, &review_id).await?;
            }
        },
        Commands::Login {
            email,
            password,
            google_token,
        } => match (email, google_token) {
            (_, Some(token)) => commands::account::login_with_google(&ctx, token).await?,
            (Some(email), None) => {
                let password = password.ok_or_else(|| {
                    AppError::BadRequest("A password is required (--password)".to_string())
                })?;
                commands::account::login(&ctx, &email, password).await?;
            }
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Pass --email or --google-token".to_string(),
                ));
            }
        },
        Commands::Logout => commands::account::logout(&ctx)?,
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
        } => commands::account::register(&ctx, first_name, last_name, &email, password).await?,
        Commands::Checkout {
            phone,
            address,
            payment,
        } => commands::orders::checkout(&ctx, phone, address, payment).await?,
        Commands::Orders { action } => match action {
            OrderAction::List { status } => commands::orders::list(&ctx, status).await?,
            OrderAction::SetStatus { order_id, status } => {
                commands::orders::set_status(&ctx, &order_id, status).await?;
            }
        },
    }
    Ok(())
}
