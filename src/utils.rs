//! Utils

use std::path::PathBuf;

use clap::Parser;

/// Arguments for the basket example
#[derive(Debug, Parser)]
pub struct ExampleBasketArgs {
    /// SKUs to price, one character per item (e.g. "AAABEE")
    pub skus: String,

    /// Fixture set to use for the catalog & promotions
    #[clap(short, long, default_value = "supermarket")]
    pub fixture: String,

    /// Directory holding the `products/` and `promotions/` fixture files
    #[clap(short = 'p', long)]
    pub fixtures: Option<PathBuf>,
}
