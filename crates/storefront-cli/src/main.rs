mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::parse_option_pair;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Browse a Shopify storefront catalog from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the category labels present in the catalog
    Categories,
    /// List products, optionally filtered by category label
    Products {
        /// Category label, e.g. "clothing" or "graphics cards"
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a product with its option picker and resolved variant
    Show {
        handle: String,
        /// Option choice as Name=Value; repeat for several options
        #[arg(long = "option", value_parser = parse_option_pair)]
        options: Vec<(String, String)>,
    },
    /// Add the resolved variant of a product to a new cart
    Add {
        handle: String,
        /// Option choice as Name=Value; repeat for several options
        #[arg(long = "option", value_parser = parse_option_pair)]
        options: Vec<(String, String)>,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = storefront_client::StorefrontClient::from_config(&config)?;

    match cli.command {
        Commands::Categories => commands::catalog::run_categories(&client).await?,
        Commands::Products { category } => {
            commands::catalog::run_products(&client, category.as_deref()).await?;
        }
        Commands::Show { handle, options } => {
            commands::catalog::run_show(&client, &handle, &options).await?;
        }
        Commands::Add {
            handle,
            options,
            quantity,
        } => commands::bag::run_add(&client, &handle, &options, quantity).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
