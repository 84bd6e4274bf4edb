//! Checkout Example
//!
//! Scans a cart against a rule table fixture and prints an itemised receipt.
//!
//! Use `-f` to load a rule table by name from `fixtures/rules`
//! Use `-c` to give the cart as whitespace-separated SKUs, or as single-letter SKUs run together
//! (e.g. `-c AAABBD`)

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally::{checkout::Checkout, fixtures::Fixture, sku::Sku};

/// Arguments for the checkout example
#[derive(Debug, Parser)]
struct CheckoutArgs {
    /// Rule table fixture to price the cart with
    #[clap(short, long, default_value = "example")]
    fixture: String,

    /// Items to scan
    #[clap(short, long, default_value = "")]
    cart: String,
}

/// Checkout Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = CheckoutArgs::parse();

    let rules = Fixture::from_set(&args.fixture)?;
    let mut checkout = Checkout::new(&rules);

    if args.cart.contains(char::is_whitespace) {
        checkout.scan_all(args.cart.split_whitespace().map(Sku::from));
    } else {
        checkout.scan_all(args.cart.chars());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    checkout.receipt()?.write_to(&mut handle)?;

    Ok(())
}
