//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A catalog price. Catalog amounts are always US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Symbol prefixed to every displayed amount.
    pub const SYMBOL: &'static str = "$";

    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount in dollars, not cents.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Format for display with two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", Self::SYMBOL)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format a catalog amount as a display price.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::new(amount).display()
}
