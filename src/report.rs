use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use strum::{Display, EnumString};

use crate::portfolio::Summary;
use crate::ticker::Ticker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    Text,
    #[default]
    Html,
}

/// Largest display precision that still fits amounts up to ~7.9e10.
pub const MAX_PRECISION: u32 = 18;

/// Number of decimals shown for each kind of amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    pub quantity: u32,
    pub fiat: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            quantity: 8,
            fiat: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Report<'a> {
    pub ticker: &'a Ticker,
    pub summary: &'a Summary,
    pub precision: Precision,
}

const HTML_STYLE: &str = "<style> td { text-align: center; vertical-align: middle; }</style>";
const HTML_HEADER: &str =
    "<tr> <th>Symbol</th> <th>Quantity</th> <th>Delta</th> <th>Spent</th> <th>Value</th> </tr>";

pub fn subject(date: NaiveDate) -> String {
    format!("Gemini Trading Account Stats - {}", date.format("%Y-%m-%d"))
}

/// Rounds half away from zero and pads to exactly `dp` decimals.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(dp);
    value.to_string()
}

impl<'a> Report<'a> {
    pub fn new(ticker: &'a Ticker, summary: &'a Summary, precision: Precision) -> Self {
        Self {
            ticker,
            summary,
            precision,
        }
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Html => self.render_html(),
        }
    }

    fn quantity(&self) -> String {
        fixed(self.summary.total_quantity, self.precision.quantity)
    }

    fn fiat(&self, value: Decimal) -> String {
        fixed(value, self.precision.fiat)
    }

    fn signed_delta(&self) -> String {
        let delta = self.fiat(self.summary.delta());
        if self.summary.is_gain() {
            format!("+{delta}")
        } else {
            delta
        }
    }

    pub fn render_text(&self) -> String {
        let base = &self.ticker.base;
        let quote = &self.ticker.quote;
        let mut lines = vec![format!("Gemini holdings summary for {base}")];
        lines.push(format!("Quantity purchased: {} {base}", self.quantity()));
        lines.push(format!(
            "Fiat spent:         {} {quote}",
            self.fiat(self.summary.total_fiat_spent)
        ));
        lines.push(format!(
            "Holdings value:     {} {quote}",
            self.fiat(self.summary.current_holdings_value)
        ));
        lines.push(format!("Delta:              {} {quote}", self.signed_delta()));
        lines.join("\n") + "\n"
    }

    pub fn render_html(&self) -> String {
        let color = if self.summary.is_gain() { "green" } else { "red" };
        let row = format!(
            "<tr> <td>{}</td> <td>{}</td> <td><b style='color:{}'>{}</b></td> <td>{}</td> <td>{}</td> </tr>",
            self.ticker.base,
            self.quantity(),
            color,
            self.fiat(self.summary.delta()),
            self.fiat(self.summary.total_fiat_spent),
            self.fiat(self.summary.current_holdings_value),
        );
        format!(
            "{HTML_STYLE}<table style=\"width:100%; border: 1px solid black;\">{HTML_HEADER}{row}</table>"
        )
    }
}
