use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, StatsError};
use crate::marketplace::gemini::Gemini;
use crate::marketplace::PriceFeed;
use crate::ticker::Ticker;
use crate::trade::PriceQuote;

const PRICE_FEED_PATH: &str = "/v1/pricefeed";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeedEntry {
    pub pair: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default)]
    pub percent_change24h: Option<String>,
}

pub fn find_quote(feed: &[PriceFeedEntry], ticker: &Ticker) -> Result<PriceQuote> {
    feed.iter()
        .find(|entry| ticker.matches(&entry.pair))
        .map(|entry| PriceQuote {
            asset: ticker.to_string(),
            fiat_per_unit: entry.price,
            timestamp: Utc::now(),
        })
        .ok_or_else(|| StatsError::Exchange(format!("No price quoted for {}", ticker)))
}

impl PriceFeed for Gemini {
    async fn current_price(&self, ticker: &Ticker) -> Result<PriceQuote> {
        let feed: Vec<PriceFeedEntry> = self.public_get(PRICE_FEED_PATH).await?;
        let quote = find_quote(&feed, ticker)?;

        info!("{} is quoted at {}", ticker, quote.fiat_per_unit);

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn feed() -> Vec<PriceFeedEntry> {
        serde_json::from_value(json!([
            {"pair": "BTCUSD", "price": "9500.00", "percentChange24h": "5.23"},
            {"pair": "ETHUSD", "price": "257.82", "percentChange24h": "-0.0110"},
            {"pair": "ETHBTC", "price": "0.02713"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_price_feed_from_json() {
        let feed = feed();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].percent_change24h.as_deref(), Some("5.23"));
        assert_eq!(feed[2].percent_change24h, None);
    }

    #[test]
    fn test_find_quote() {
        let quote = find_quote(&feed(), &Ticker::new("eth", "usd")).unwrap();
        assert_eq!(quote.asset, "ETHUSD");
        assert_eq!(quote.fiat_per_unit, dec!(257.82));
    }

    #[test]
    fn test_find_quote_missing_pair() {
        let err = find_quote(&feed(), &Ticker::new("DOGE", "USD")).unwrap_err();
        assert!(matches!(err, StatsError::Exchange(_)));
    }
}
