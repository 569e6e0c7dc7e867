//! CLI command implementations.

pub mod ask;
pub mod assist;
pub mod catalog;
pub mod config;
pub mod wishlist;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products, one page at a time when unfiltered.
    List {
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Products per page.
        #[arg(long)]
        page_size: Option<usize>,

        /// Only products whose name contains this text.
        #[arg(short, long)]
        query: Option<String>,

        /// Only products in this category (Sofas, Chairs, Tables, Beds).
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product with its reviews.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// List wishlisted products.
    List,
    /// Add a product.
    Add {
        /// Product ID.
        id: String,
    },
    /// Remove a product.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Add a product, or remove it if already wishlisted.
    Toggle {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the assist command.
#[derive(Args)]
pub struct AssistArgs {
    /// What you are looking for.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Product ID.
    pub id: String,

    /// Your question about the product.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
