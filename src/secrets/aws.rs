use std::collections::HashMap;

use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::secrets::SecretStore;

/// Secret bundles stored as JSON objects in AWS Secrets Manager.
#[derive(Debug, Clone)]
pub struct AwsSecretsManager {
    client: Client,
}

impl AwsSecretsManager {
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
        }
    }
}

impl SecretStore for AwsSecretsManager {
    async fn get_secret(&self, secret_name: &str) -> Result<HashMap<String, String>> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|err| classify(secret_name, err))?;

        let secret = output.secret_string().ok_or_else(|| {
            StatsError::Configuration(format!("Secret {secret_name} has no string value"))
        })?;

        let bundle: HashMap<String, String> = serde_json::from_str(secret).map_err(|err| {
            StatsError::Configuration(format!("Secret {secret_name} is not a JSON object: {err}"))
        })?;

        debug!("Loaded secret {} with {} fields", secret_name, bundle.len());

        Ok(bundle)
    }
}

fn classify<R>(secret_name: &str, err: SdkError<GetSecretValueError, R>) -> StatsError {
    match err {
        SdkError::ServiceError(context) => {
            let err = context.err();
            if err.is_resource_not_found_exception() {
                StatsError::SecretNotFound(secret_name.to_owned())
            } else if err.code() == Some("AccessDeniedException") {
                StatsError::AccessDenied(secret_name.to_owned())
            } else {
                StatsError::Configuration(format!(
                    "Failed to read secret {secret_name}: {}",
                    err.message().unwrap_or("unknown error")
                ))
            }
        }
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            StatsError::TransientNetwork(format!("Secrets Manager unreachable for {secret_name}"))
        }
        _ => StatsError::Configuration(format!("Failed to build request for secret {secret_name}")),
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_secretsmanager::error::ErrorMetadata;
    use aws_sdk_secretsmanager::types::error::ResourceNotFoundException;

    use super::*;

    const SECRET: &str = "gemini_stats_emailer";

    fn service_error(err: GetSecretValueError) -> SdkError<GetSecretValueError, ()> {
        SdkError::service_error(err, ())
    }

    fn generic(code: &str) -> GetSecretValueError {
        GetSecretValueError::generic(ErrorMetadata::builder().code(code).message("denied").build())
    }

    #[test]
    fn test_classify_missing_secret() {
        let missing = GetSecretValueError::ResourceNotFoundException(
            ResourceNotFoundException::builder().message("gone").build(),
        );
        match classify(SECRET, service_error(missing)) {
            StatsError::SecretNotFound(name) => assert_eq!(name, SECRET),
            other => panic!("expected missing secret, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_access_denied() {
        match classify(SECRET, service_error(generic("AccessDeniedException"))) {
            StatsError::AccessDenied(name) => assert_eq!(name, SECRET),
            other => panic!("expected access denied, got {:?}", other),
        }
        assert!(matches!(
            classify(SECRET, service_error(generic("ThrottlingException"))),
            StatsError::Configuration(_)
        ));
    }

    #[test]
    fn test_classify_timeout() {
        let err = SdkError::<GetSecretValueError, ()>::timeout_error("read timed out");
        assert!(matches!(classify(SECRET, err), StatsError::TransientNetwork(_)));
    }
}
