use base64::prelude::*;
use chrono::Utc;
use hex::encode;
use hmac::{Hmac, Mac};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha384;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::secrets::ExchangeCredentials;

mod market_data_api;
mod trade_api;

pub use market_data_api::PriceFeedEntry;
pub use trade_api::GeminiTrade;

pub const ENDPOINT: &str = "https://api.gemini.com";
pub const DEFAULT_ACCOUNT: &str = "Primary";
pub const MAX_LIMIT_TRADES: u32 = 500;

const AUTH_REASONS: [&str; 9] = [
    "InvalidSignature",
    "InvalidApiKey",
    "MissingApikeyHeader",
    "MissingPayloadHeader",
    "MissingSignatureHeader",
    "MissingRole",
    "InvalidNonce",
    "AccountNotFound",
    "ApiKeyExpired",
];

#[derive(Debug, Clone)]
pub struct Gemini {
    client: Client,
    endpoint: String,
    account: String,
    limit_trades: u32,
}

/// Error document returned by the exchange on non-2xx responses.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// Headers of a signed private request.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedPayload {
    pub payload: String,
    pub signature: String,
}

impl Default for Gemini {
    fn default() -> Self {
        Self::new(ENDPOINT, DEFAULT_ACCOUNT, MAX_LIMIT_TRADES)
    }
}

impl Gemini {
    pub fn new(endpoint: &str, account: &str, limit_trades: u32) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            account: account.to_owned(),
            limit_trades: limit_trades.clamp(1, MAX_LIMIT_TRADES),
        }
    }

    async fn private_post<T: DeserializeOwned>(
        &self,
        credentials: &ExchangeCredentials,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T> {
        let nonce = Utc::now().timestamp_millis();
        let signed = sign_payload(&credentials.api_secret, nonce, path, params)?;

        let res = self
            .client
            .post(format!("{}{}", self.endpoint, path))
            .header("Content-Type", "text/plain")
            .header("X-GEMINI-APIKEY", &credentials.api_key)
            .header("X-GEMINI-PAYLOAD", signed.payload)
            .header("X-GEMINI-SIGNATURE", signed.signature)
            .header("Cache-Control", "no-cache")
            .body("")
            .send()
            .await?;

        parse_response(path, res).await
    }

    async fn public_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self
            .client
            .get(format!("{}{}", self.endpoint, path))
            .send()
            .await?;

        parse_response(path, res).await
    }
}

/// Encodes the request payload and signs it with HMAC-SHA384.
pub fn sign_payload(
    api_secret: &str,
    nonce: i64,
    path: &str,
    params: Map<String, Value>,
) -> Result<SignedPayload> {
    let mut payload = Map::new();
    payload.insert("nonce".to_string(), Value::String(nonce.to_string()));
    payload.insert("request".to_string(), Value::String(path.to_string()));
    payload.extend(params);

    let payload = BASE64_STANDARD.encode(serde_json::to_vec(&Value::Object(payload))?);

    let mut mac: Hmac<Sha384> = Hmac::new_from_slice(api_secret.as_bytes())
        .map_err(|err| StatsError::Configuration(format!("Invalid API secret: {err}")))?;
    mac.update(payload.as_bytes());
    let signature = encode(mac.finalize().into_bytes());

    Ok(SignedPayload { payload, signature })
}

async fn parse_response<T: DeserializeOwned>(path: &str, res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text().await?;

    debug!("Gemini {} responded {} ({} bytes)", path, status, body.len());

    if !status.is_success() {
        return Err(classify_error(status, &body));
    }

    Ok(serde_json::de::from_str(body.as_str())?)
}

/// Maps a failed response onto the error taxonomy.
pub fn classify_error(status: StatusCode, body: &str) -> StatsError {
    let error: ErrorResponse = serde_json::de::from_str(body).unwrap_or_default();
    let detail = if error.reason.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("{} ({})", error.reason, error.message)
    };

    if status == StatusCode::TOO_MANY_REQUESTS || error.reason == "RateLimited" {
        StatsError::RateLimit(detail)
    } else if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || AUTH_REASONS.contains(&error.reason.as_str())
    {
        StatsError::Auth(detail)
    } else if status.is_server_error() {
        StatsError::TransientNetwork(detail)
    } else {
        StatsError::Exchange(detail)
    }
}
