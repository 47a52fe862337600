//! Utils

use clap::Parser;

use crate::items::SortOrder;

/// Arguments for the basket demo
#[derive(Debug, Parser)]
pub struct ExampleBasketArgs {
    /// Number of items to add to the basket
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the basket & promotions
    #[clap(short, long, default_value = "electronics")]
    pub fixture: String,

    /// Order of the receipt lines
    #[clap(short, long, value_enum, default_value_t = SortOrder::PriceDesc)]
    pub sort: SortOrder,

    /// Apply promotions once in registration order instead of searching every order
    #[clap(long)]
    pub sequential: bool,
}
