use std::fmt::Display;

use colored::Colorize;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::trade::{PriceQuote, TradeRecord};

/// Purchase totals for one asset, valued at the current quote.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Summary {
    pub total_quantity: Decimal,
    pub total_fiat_spent: Decimal,
    pub current_holdings_value: Decimal,
}

impl Summary {
    /// Sums the buy side of `trades`. Sells are skipped, not netted out.
    pub fn aggregate<'a, T>(trades: T, quote: &PriceQuote) -> Self
    where
        T: IntoIterator<Item = &'a TradeRecord>,
    {
        let (total_quantity, total_fiat_spent) = trades
            .into_iter()
            .filter(|trade| trade.is_buy())
            .fold((dec!(0), dec!(0)), |(quantity, spent), trade| {
                (quantity + trade.quantity, spent + trade.fiat_amount)
            });

        Self {
            total_quantity,
            total_fiat_spent,
            current_holdings_value: total_quantity * quote.fiat_per_unit,
        }
    }

    pub fn delta(&self) -> Decimal {
        self.current_holdings_value - self.total_fiat_spent
    }

    pub fn is_gain(&self) -> bool {
        self.total_fiat_spent < self.current_holdings_value
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let delta = self.delta().round_dp(2).to_string();
        let delta = if self.is_gain() {
            delta.green()
        } else {
            delta.red()
        };
        write!(
            f,
            "{} held ~{} (spent {}, delta {})",
            self.total_quantity.to_string().purple(),
            self.current_holdings_value.round_dp(2).to_string().yellow(),
            self.total_fiat_spent.round_dp(2),
            delta
        )
    }
}
