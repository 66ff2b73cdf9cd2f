use clap::Args;

use crate::error::{Result, StatsError};
use crate::marketplace::gemini::{DEFAULT_ACCOUNT, ENDPOINT, MAX_LIMIT_TRADES};
use crate::mailer::{SMTP_HOST, SMTP_PORT};
use crate::report::{Precision, ReportFormat, MAX_PRECISION};
use crate::ticker::Ticker;

/// Raw options as read from flags or the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    #[arg(long, global = true, env = "REGION_NAME")]
    pub region_name: Option<String>,
    #[arg(long, global = true, env = "SECRET_NAME")]
    pub secret_name: Option<String>,
    #[arg(long, global = true, env = "SENDER_GMAIL_ADDRESS")]
    pub sender: Option<String>,
    #[arg(long, global = true, env = "RECIPIENT_GMAIL_ADDRESS")]
    pub recipient: Option<String>,

    #[arg(long, global = true, env = "GEMINI_ENDPOINT", default_value = ENDPOINT)]
    pub endpoint: String,
    #[arg(long, global = true, env = "GEMINI_ACCOUNT", default_value = DEFAULT_ACCOUNT)]
    pub account: String,
    #[arg(long, global = true, env = "GEMINI_SYMBOL", default_value = "BTCUSD")]
    pub symbol: String,
    #[arg(long, global = true, env = "GEMINI_LIMIT_TRADES", default_value_t = MAX_LIMIT_TRADES)]
    pub limit_trades: u32,

    #[arg(long, global = true, env = "SMTP_HOST", default_value = SMTP_HOST)]
    pub smtp_host: String,
    #[arg(long, global = true, env = "SMTP_PORT", default_value_t = SMTP_PORT)]
    pub smtp_port: u16,

    #[arg(long, global = true, env = "REPORT_FORMAT", default_value = "html")]
    pub format: String,
    #[arg(long, global = true, env = "QUANTITY_PRECISION", default_value_t = 8)]
    pub quantity_precision: u32,
    #[arg(long, global = true, env = "FIAT_PRECISION", default_value_t = 2)]
    pub fiat_precision: u32,
}

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub region_name: String,
    pub secret_name: String,
    pub sender: String,
    pub recipient: String,
    pub endpoint: String,
    pub account: String,
    pub ticker: Ticker,
    pub limit_trades: u32,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub format: ReportFormat,
    pub precision: Precision,
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StatsError::Configuration(format!("{key} is not set")))
}

impl TryFrom<SettingsArgs> for Settings {
    type Error = StatsError;

    fn try_from(args: SettingsArgs) -> Result<Self> {
        let ticker = Ticker::try_from(&args.symbol)
            .map_err(|err| StatsError::Configuration(format!("GEMINI_SYMBOL: {err}")))?;

        if !(1..=MAX_LIMIT_TRADES).contains(&args.limit_trades) {
            return Err(StatsError::Configuration(format!(
                "GEMINI_LIMIT_TRADES must be between 1 and {MAX_LIMIT_TRADES}"
            )));
        }

        let format = args
            .format
            .parse::<ReportFormat>()
            .map_err(|_| StatsError::Configuration(format!("Unknown REPORT_FORMAT {}", args.format)))?;

        if args.quantity_precision > MAX_PRECISION || args.fiat_precision > MAX_PRECISION {
            return Err(StatsError::Configuration(format!(
                "Display precision must be at most {MAX_PRECISION}"
            )));
        }

        Ok(Self {
            region_name: required(args.region_name, "REGION_NAME")?,
            secret_name: required(args.secret_name, "SECRET_NAME")?,
            sender: required(args.sender, "SENDER_GMAIL_ADDRESS")?,
            recipient: required(args.recipient, "RECIPIENT_GMAIL_ADDRESS")?,
            endpoint: args.endpoint,
            account: args.account,
            ticker,
            limit_trades: args.limit_trades,
            smtp_host: args.smtp_host,
            smtp_port: args.smtp_port,
            format,
            precision: Precision {
                quantity: args.quantity_precision,
                fiat: args.fiat_precision,
            },
        })
    }
}
