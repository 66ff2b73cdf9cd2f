use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Copy, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Side {
    Buy,
    Sell,
}

/// One fill from the account's trade history.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeRecord {
    pub quantity: Decimal,
    pub fiat_amount: Decimal,
    pub side: Side,
    pub timestamp: DateTime<Utc>,
}

impl TradeRecord {
    pub fn is_buy(&self) -> bool {
        matches!(self.side, Side::Buy)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceQuote {
    pub asset: String,
    pub fiat_per_unit: Decimal,
    pub timestamp: DateTime<Utc>,
}
