//! Orchard CLI - wholesale product management against the Shopify Admin API.
//!
//! # Usage
//!
//! ```bash
//! # Create a product
//! orchard product create -t "Custom cider crate" --vendor Orchard --product-type Cider
//!
//! # Set a variant's price and shipping weight
//! orchard variant update -p 1234 -v 5678 --price 42.50 --weight 12 --unit lb
//!
//! # Tag a product
//! orchard tags add -i 1234 wholesale bulk
//! ```
//!
//! IDs may be numeric or full `gid://shopify/...` global IDs.
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE`, `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - store credentials
//! - `SHOPIFY_ADMIN_TOKEN` - Admin API access token (required)
//! - `SHOPIFY_ADMIN_ENDPOINT` - Admin GraphQL URL override

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orchard")]
#[command(author, version, about = "Orchard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage product variants
    Variant {
        #[command(subcommand)]
        action: VariantAction,
    },
    /// Manage tags
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a new product
    Create {
        /// Product title
        #[arg(short, long)]
        title: String,

        /// Vendor name
        #[arg(long)]
        vendor: Option<String>,

        /// Product type
        #[arg(long)]
        product_type: Option<String>,

        /// Tags to apply on creation
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
}

#[derive(Subcommand)]
enum VariantAction {
    /// Update a variant's price and/or shipping weight
    Update {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Variant ID
        #[arg(short, long)]
        variant: String,

        /// New price (e.g. 42.50)
        #[arg(long)]
        price: Option<String>,

        /// Shipping weight
        #[arg(long)]
        weight: Option<f64>,

        /// Weight unit (`lb`, `oz`, `kg`, `g`)
        #[arg(long, default_value = "lb")]
        unit: String,
    },
}

#[derive(Subcommand)]
enum TagsAction {
    /// Add tags to a product
    Add {
        /// Product ID
        #[arg(short, long)]
        id: String,

        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::Create {
                title,
                vendor,
                product_type,
                tags,
            } => commands::product::create(title, vendor, product_type, tags).await,
        },
        Commands::Variant { action } => match action {
            VariantAction::Update {
                product,
                variant,
                price,
                weight,
                unit,
            } => {
                commands::variant::update(&product, &variant, price.as_deref(), weight, &unit)
                    .await
            }
        },
        Commands::Tags { action } => match action {
            TagsAction::Add { id, tags } => commands::tags::add(&id, &tags).await,
        },
    }
}
