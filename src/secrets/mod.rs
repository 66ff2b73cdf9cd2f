use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{Result, StatsError};

pub mod aws;

pub const GMAIL_APP_PASSWORD: &str = "gmail_app_password";
pub const GEMINI_API_KEY: &str = "gemini_api_key";
pub const GEMINI_API_SECRET: &str = "gemini_api_secret";

/// Source of named secret bundles.
pub trait SecretStore {
    async fn get_secret(&self, secret_name: &str) -> Result<HashMap<String, String>>;
}

#[derive(Clone)]
pub struct ExchangeCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Validated content of the secret bundle.
#[derive(Clone)]
pub struct SecretBundle {
    pub exchange: ExchangeCredentials,
    pub mail_app_password: String,
}

impl Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("exchange", &self.exchange)
            .field("mail_app_password", &"<redacted>")
            .finish()
    }
}

impl TryFrom<HashMap<String, String>> for SecretBundle {
    type Error = StatsError;

    fn try_from(mut value: HashMap<String, String>) -> Result<Self> {
        let mut take = |field: &str| {
            value
                .remove(field)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    StatsError::Configuration(format!("Secret bundle is missing `{field}`"))
                })
        };

        Ok(Self {
            exchange: ExchangeCredentials {
                api_key: take(GEMINI_API_KEY)?,
                api_secret: take(GEMINI_API_SECRET)?,
            },
            mail_app_password: take(GMAIL_APP_PASSWORD)?,
        })
    }
}
