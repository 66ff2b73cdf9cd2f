use crate::error::Result;
use crate::secrets::ExchangeCredentials;
use crate::ticker::Ticker;
use crate::trade::{PriceQuote, TradeRecord};

pub mod gemini;

/// Authenticated access to the account's fills.
pub trait TradeHistory {
    /// Buy-side fills for `ticker`, in no particular order.
    async fn list_buy_trades(
        &self,
        credentials: &ExchangeCredentials,
        ticker: &Ticker,
    ) -> Result<Vec<TradeRecord>>;
}

pub trait PriceFeed {
    async fn current_price(&self, ticker: &Ticker) -> Result<PriceQuote>;
}
