//! Priced Cart Receipt Demo
//!
//! Loads a fixture set, finds the cheapest promotion order and prints a receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of items
//! Use `-s` to change the receipt order
//! Use `--sequential` to apply promotions in registration order only
//!
//! Set `RUST_LOG=checkout=debug` to see every evaluated order.

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::EnvFilter;

use checkout::{
    fixtures::Fixture,
    receipt::Receipt,
    solvers::{permutation::PermutationSolver, sequential::SequentialSolver},
    utils::ExampleBasketArgs,
};

/// Priced Cart Receipt Demo
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = ExampleBasketArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut cart = fixture.cart(args.n)?;

    cart.set_sort_order(args.sort);

    let start = Instant::now();

    if args.sequential {
        cart.calculate_total_with::<SequentialSolver>()?;
    } else {
        cart.calculate_total_with::<PermutationSolver>()?;
    }

    let elapsed = start.elapsed();

    let receipt = Receipt::from_cart(&cart)?;
    let trials = cart.last_result().map_or(0, |result| result.trials);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, fixture.promotion_meta_map())?;

    writeln!(
        handle,
        " {trials} order(s) in {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
