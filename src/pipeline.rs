use chrono::Utc;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::mailer::{Email, MailLogin, Mailer};
use crate::marketplace::{PriceFeed, TradeHistory};
use crate::portfolio::Summary;
use crate::report::{self, Report};
use crate::secrets::{SecretBundle, SecretStore};

/// Result of one invocation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub summary: Summary,
    pub email: Email,
}

/// The collaborators of one invocation. Built per run and dropped with it.
pub struct Pipeline<'a, S, X, M> {
    pub settings: &'a Settings,
    pub secrets: &'a S,
    pub exchange: &'a X,
    pub mailer: &'a M,
}

impl<'a, S, X, M> Pipeline<'a, S, X, M>
where
    S: SecretStore,
    X: TradeHistory + PriceFeed,
    M: Mailer,
{
    pub fn new(settings: &'a Settings, secrets: &'a S, exchange: &'a X, mailer: &'a M) -> Self {
        Self {
            settings,
            secrets,
            exchange,
            mailer,
        }
    }

    /// Loads credentials, fetches trades and price, and renders the report.
    pub async fn prepare(&self) -> Result<(SecretBundle, Outcome)> {
        let settings = self.settings;

        let bundle = self.secrets.get_secret(&settings.secret_name).await?;
        let bundle = SecretBundle::try_from(bundle)?;
        info!("Loaded credentials from {}", settings.secret_name);

        let trades = self
            .exchange
            .list_buy_trades(&bundle.exchange, &settings.ticker)
            .await?;
        let quote = self.exchange.current_price(&settings.ticker).await?;

        let summary = Summary::aggregate(&trades, &quote);
        info!("{}", summary);

        let body = Report::new(&settings.ticker, &summary, settings.precision).render(settings.format);
        let email = Email {
            from: settings.sender.clone(),
            to: settings.recipient.clone(),
            subject: report::subject(Utc::now().date_naive()),
            body,
            format: settings.format,
        };

        Ok((bundle, Outcome { summary, email }))
    }

    /// Runs the whole chain and mails the report.
    pub async fn run(&self) -> Result<Outcome> {
        let (bundle, outcome) = self.prepare().await?;

        let login = MailLogin {
            username: self.settings.sender.clone(),
            password: bundle.mail_app_password,
        };
        self.mailer.send(&login, &outcome.email).await?;

        Ok(outcome)
    }
}
