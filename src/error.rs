#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    TransientNetwork(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unexpected exchange response: {0}")]
    Exchange(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            StatsError::Configuration(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            StatsError::TransientNetwork(err.to_string())
        } else {
            StatsError::Exchange(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Exchange(format!("JSON error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_reqwest_bad_url() {
        let err = reqwest::Client::new().get("not a url").send().await.unwrap_err();
        assert!(matches!(StatsError::from(err), StatsError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_from_reqwest_connection_refused() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(StatsError::from(err), StatsError::TransientNetwork(_)));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        assert!(matches!(StatsError::from(err), StatsError::Exchange(_)));
    }
}
