use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Fiat codes the exchange quotes spot pairs in.
pub const FIAT_QUOTES: [&str; 7] = ["USD", "EUR", "GBP", "SGD", "CAD", "AUD", "HKD"];

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ticker {
    pub base: String,
    pub quote: String,
}

impl Ticker {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }

    /// Lowercase form used in exchange request payloads, e.g. `btcusd`.
    pub fn symbol(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn matches(&self, symbol: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(symbol)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().to_uppercase();
        FIAT_QUOTES
            .iter()
            .find_map(|quote| {
                value
                    .strip_suffix(quote)
                    .filter(|base| {
                        !base.is_empty() && base.chars().all(|c| c.is_ascii_alphanumeric())
                    })
                    .map(|base| Ticker::new(base, quote))
            })
            .ok_or_else(|| format!("Could not convert {} to ticker", value))
    }
}

impl TryFrom<&String> for Ticker {
    type Error = String;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}
