use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::Code;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::error::{Result, StatsError};
use crate::report::ReportFormat;

pub const SMTP_HOST: &str = "smtp.gmail.com";
pub const SMTP_PORT: u16 = 465;
pub const SENDER_NAME: &str = "Gemini Trading API";

/// SMTP reply codes meaning the login was refused.
const AUTH_CODES: [&str; 3] = ["530", "534", "535"];

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub format: ReportFormat,
}

#[derive(Clone)]
pub struct MailLogin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for MailLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailLogin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub trait Mailer {
    async fn send(&self, login: &MailLogin, email: &Email) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new(SMTP_HOST, SMTP_PORT)
    }
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_owned(),
            port,
        }
    }
}

impl Email {
    pub fn to_message(&self) -> Result<Message> {
        let from: Mailbox = format!("{} <{}>", SENDER_NAME, self.from)
            .parse()
            .map_err(|err| StatsError::Configuration(format!("Invalid sender address: {err}")))?;
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|err| StatsError::Configuration(format!("Invalid recipient address: {err}")))?;
        let content_type = match self.format {
            ReportFormat::Html => ContentType::TEXT_HTML,
            ReportFormat::Text => ContentType::TEXT_PLAIN,
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.as_str())
            .header(content_type)
            .body(self.body.clone())
            .map_err(|err| StatsError::Delivery(format!("Could not build message: {err}")))
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, login: &MailLogin, email: &Email) -> Result<()> {
        let message = email.to_message()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(classify)?
            .port(self.port)
            .credentials(Credentials::new(
                login.username.clone(),
                login.password.clone(),
            ))
            .build();

        transport.send(message).await.map_err(classify)?;

        info!("Report sent to {}", email.to);

        Ok(())
    }
}

fn classify(err: SmtpError) -> StatsError {
    classify_status(err.status(), err.to_string())
}

fn classify_status(status: Option<Code>, detail: String) -> StatsError {
    match status {
        Some(code) if AUTH_CODES.contains(&code.to_string().as_str()) => {
            StatsError::Auth(format!("SMTP login refused: {detail}"))
        }
        _ => StatsError::Delivery(detail),
    }
}
