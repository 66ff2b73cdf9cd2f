use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map};
use tracing::{debug, info, warn};

use crate::error::{Result, StatsError};
use crate::marketplace::gemini::Gemini;
use crate::marketplace::TradeHistory;
use crate::secrets::ExchangeCredentials;
use crate::ticker::Ticker;
use crate::trade::{Side, TradeRecord};

const MY_TRADES_PATH: &str = "/v1/mytrades";

#[derive(Deserialize, Debug, Clone)]
pub struct GeminiTrade {
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub timestampms: i64,
    #[serde(rename = "type")]
    pub side: Side,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub tid: Option<u64>,
}

impl TryFrom<&GeminiTrade> for TradeRecord {
    type Error = StatsError;

    fn try_from(value: &GeminiTrade) -> Result<Self> {
        let timestamp = DateTime::from_timestamp_millis(value.timestampms).ok_or_else(|| {
            StatsError::Exchange(format!("Invalid trade timestamp {}", value.timestampms))
        })?;

        Ok(TradeRecord {
            quantity: value.amount,
            fiat_amount: value.price * value.amount,
            side: value.side,
            timestamp,
        })
    }
}

/// Keeps buy fills of `ticker`; fills without a symbol are assumed to match.
pub fn buy_trades(trades: &[GeminiTrade], ticker: &Ticker) -> Result<Vec<TradeRecord>> {
    trades
        .iter()
        .filter(|trade| matches!(trade.side, Side::Buy))
        .filter(|trade| trade.symbol.as_deref().is_none_or(|symbol| ticker.matches(symbol)))
        .map(TradeRecord::try_from)
        .collect()
}

impl Gemini {
    /// A full page means older fills may have been left out.
    fn page_is_full(&self, fetched: usize) -> bool {
        fetched >= self.limit_trades as usize
    }
}

impl TradeHistory for Gemini {
    async fn list_buy_trades(
        &self,
        credentials: &ExchangeCredentials,
        ticker: &Ticker,
    ) -> Result<Vec<TradeRecord>> {
        let mut params = Map::new();
        params.insert("symbol".to_string(), json!(ticker.symbol()));
        params.insert("limit_trades".to_string(), json!(self.limit_trades));
        params.insert("account".to_string(), json!(self.account));

        let trades: Vec<GeminiTrade> = self
            .private_post(credentials, MY_TRADES_PATH, params)
            .await?;

        debug!("Gemini {} trades : {}", ticker, trades.len());

        if self.page_is_full(trades.len()) {
            warn!(
                "Fetched a full page of {} trades for {}, older fills are not counted",
                trades.len(),
                ticker
            );
        }

        let buys = buy_trades(&trades, ticker)?;

        info!("Fetched {} buy trades for {}", buys.len(), ticker);

        Ok(buys)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::marketplace::gemini::{DEFAULT_ACCOUNT, ENDPOINT};

    fn trades() -> Vec<GeminiTrade> {
        let json = json!([
            {
                "price": "3648.09",
                "amount": "0.0027343246",
                "timestamp": 1547232911,
                "timestampms": 1547232911423_i64,
                "type": "Buy",
                "aggressor": true,
                "fee_currency": "USD",
                "fee_amount": "0.024937655575035",
                "tid": 107317526,
                "order_id": "107317524",
                "exchange": "gemini",
                "is_auction_fill": false,
                "symbol": "BTCUSD"
            },
            {
                "price": "4000.00",
                "amount": "0.5",
                "timestampms": 1547232912000_i64,
                "type": "Sell",
                "symbol": "BTCUSD"
            },
            {
                "price": "120.50",
                "amount": "2",
                "timestampms": 1547232913000_i64,
                "type": "Buy",
                "symbol": "ETHUSD"
            }
        ]);
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_trade_from_json() {
        let trades = trades();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].price, dec!(3648.09));
        assert_eq!(trades[0].amount, dec!(0.0027343246));
        assert_eq!(trades[0].side, Side::Buy);
        assert_eq!(trades[0].tid, Some(107317526));
        assert_eq!(trades[1].side, Side::Sell);
    }

    #[test]
    fn test_trade_record_conversion() {
        let record = TradeRecord::try_from(&trades()[0]).unwrap();
        assert_eq!(record.quantity, dec!(0.0027343246));
        assert_eq!(record.fiat_amount, dec!(3648.09) * dec!(0.0027343246));
        assert_eq!(record.timestamp.timestamp_millis(), 1547232911423);
        assert!(record.is_buy());
    }

    #[test]
    fn test_buy_trades_filters_side_and_symbol() {
        let ticker = Ticker::new("BTC", "USD");
        let buys = buy_trades(&trades(), &ticker).unwrap();
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0].quantity, dec!(0.0027343246));

        let ticker = Ticker::new("ETH", "USD");
        let buys = buy_trades(&trades(), &ticker).unwrap();
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0].fiat_amount, dec!(241));
    }

    #[test]
    fn test_buy_trades_empty() {
        let buys = buy_trades(&[], &Ticker::new("BTC", "USD")).unwrap();
        assert!(buys.is_empty());
    }

    #[test]
    fn test_unknown_side_is_rejected() {
        let json = json!([{"price": "1", "amount": "1", "timestampms": 0, "type": "Hold"}]);
        assert!(serde_json::from_value::<Vec<GeminiTrade>>(json).is_err());
    }

    #[test]
    fn test_page_is_full() {
        let gemini = Gemini::new(ENDPOINT, DEFAULT_ACCOUNT, 3);
        assert!(!gemini.page_is_full(2));
        assert!(gemini.page_is_full(trades().len()));

        let gemini = Gemini::new(ENDPOINT, DEFAULT_ACCOUNT, 500);
        assert!(!gemini.page_is_full(trades().len()));
    }
}
