//! Basket Example
//!
//! Prices a SKU string against a fixture set and prints the receipt.
//!
//! Use `-f` to load a fixture set by name (default `supermarket`)
//! Use `-p` to read fixture files from another directory
//! Set `RUST_LOG=debug` to see which promotions fired

use std::{io, time::Instant};

use anyhow::Result;

use basket_pricing::{
    checkout::Checkout, fixtures::Fixture, pricing::round_to_major_units, receipt::Receipt,
    utils::ExampleBasketArgs,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Basket Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("warn")),
        )
        .init();

    let args = ExampleBasketArgs::parse();

    let mut fixture = match args.fixtures {
        Some(path) => Fixture::with_base_path(path),
        None => Fixture::new(),
    };

    fixture.load_set(&args.fixture)?;

    let checkout = Checkout::from_fixture(fixture)?;

    let start = Instant::now();

    let mut basket = checkout.basket(&args.skus)?;
    let result = checkout.solve(&mut basket);

    let elapsed = start.elapsed().as_secs_f32();

    let receipt = Receipt::from_basket(&basket)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(
        &mut handle,
        &basket,
        checkout.catalog(),
        checkout.promotion_meta(),
    )?;

    println!("\nPromotions fired: {}", result.firings.len());

    if let Some(total) = round_to_major_units(&receipt.total()) {
        println!("Checkout total: {total}");
    }

    println!("Solution: {elapsed}s");

    Ok(())
}
