//! Furnish CLI - browse the FurnishAI storefront from a terminal.
//!
//! Commands:
//! - `furnish catalog` - List and show products
//! - `furnish wishlist` - Manage the local wishlist
//! - `furnish assist` - Ask the AI shopping assistant
//! - `furnish ask` - Ask a question about one product
//! - `furnish config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AskArgs, AssistArgs, CatalogArgs, ConfigArgs, WishlistArgs};

/// Furnish CLI - the FurnishAI storefront in your terminal
#[derive(Parser)]
#[command(name = "furnish")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Manage your wishlist
    Wishlist(WishlistArgs),

    /// Get product recommendations from the AI assistant
    Assist(AssistArgs),

    /// Ask a question about a product
    Ask(AskArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Assist(args) => commands::assist::run(args, &ctx).await,
        Commands::Ask(args) => commands::ask::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
